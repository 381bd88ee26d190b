use testoloji_layout::*;

#[test]
fn test_default_options_are_valid() {
    let options = LayoutOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.columns, ColumnCount::Two);
    assert_eq!(options.template, Template::Classic);
    assert_eq!(options.question_spacing_mm, 20.0);
}

#[test]
fn test_validation_spacing() {
    let mut options = LayoutOptions::default();

    options.question_spacing_mm = -1.0;
    match options.validate() {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("non-negative")),
        _ => panic!("Expected Config error"),
    }

    options.question_spacing_mm = f32::NAN;
    assert!(options.validate().is_err());

    options.question_spacing_mm = 150.0;
    assert!(options.validate().is_err());

    options.question_spacing_mm = 0.0;
    assert!(options.validate().is_ok());
}

#[test]
fn test_validation_answers_need_bubbles() {
    let mut options = LayoutOptions::default();
    options.show_answers = true;
    assert!(options.validate().is_err());

    options.show_answer_bubbles = true;
    assert!(options.validate().is_ok());
}

#[test]
fn test_pagination_config_follows_options() {
    let mut options = LayoutOptions::default();
    options.columns = ColumnCount::One;
    options.question_spacing_mm = 12.5;
    options.template = Template::Compact;

    let config = options.pagination_config();
    assert_eq!(config.columns, ColumnCount::One);
    assert_eq!(config.spacing_mm, 12.5);
    assert_eq!(
        config,
        PaginationConfig::for_template(Template::Compact, ColumnCount::One, 12.5)
    );
}

#[test]
fn test_template_parsing() {
    assert_eq!("osym".parse::<Template>().unwrap(), Template::Osym);
    assert_eq!("Modern".parse::<Template>().unwrap(), Template::Modern);
    assert!("fancy".parse::<Template>().is_err());
}

#[test]
fn test_answer_letter_and_difficulty_parsing() {
    assert_eq!("c".parse::<AnswerLetter>().unwrap(), AnswerLetter::C);
    assert!("F".parse::<AnswerLetter>().is_err());

    assert_eq!(Difficulty::new(7).unwrap().value(), 7);
    assert!(Difficulty::new(0).is_err());
    assert!(Difficulty::new(11).is_err());
    assert!(Difficulty::try_from(10u8).is_ok());
}

#[tokio::test]
async fn test_options_save_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");

    let options = LayoutOptions {
        columns: ColumnCount::One,
        template: Template::Exam,
        title: "Deneme Sınavı".to_string(),
        subtitle: Some("Matematik".to_string()),
        show_answer_bubbles: true,
        show_answers: true,
        divider_watermark: Some("TASLAK".to_string()),
        ..Default::default()
    };

    options.save(&path).await.unwrap();
    let loaded = LayoutOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_options_load_fills_defaults_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");

    tokio::fs::write(&path, r#"{ "columns": 1, "template": "modern" }"#)
        .await
        .unwrap();
    let loaded = LayoutOptions::load(&path).await.unwrap();
    assert_eq!(loaded.columns, ColumnCount::One);
    assert_eq!(loaded.template, Template::Modern);
    assert!(loaded.show_answer_key);

    tokio::fs::write(&path, r#"{ "question_spacing_mm": -5 }"#)
        .await
        .unwrap();
    assert!(matches!(
        LayoutOptions::load(&path).await,
        Err(LayoutError::Config(_))
    ));

    tokio::fs::write(&path, "not json").await.unwrap();
    assert!(matches!(
        LayoutOptions::load(&path).await,
        Err(LayoutError::Config(_))
    ));
}

#[tokio::test]
async fn test_manifest_resolves_relative_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questions.json");

    let manifest = QuestionManifest {
        title: Some("Bank".to_string()),
        questions: vec![
            Question::new("q1", "images/q1.png").with_answer(AnswerLetter::B),
            Question::new("q2", "https://cdn.example.com/q2.png"),
        ],
    };
    manifest.save(&path).await.unwrap();

    let loaded = QuestionManifest::load(&path).await.unwrap();
    assert_eq!(loaded.title.as_deref(), Some("Bank"));
    assert_eq!(
        loaded.questions[0].image,
        dir.path().join("images/q1.png").to_string_lossy()
    );
    assert_eq!(loaded.questions[0].correct_answer, Some(AnswerLetter::B));
    assert_eq!(loaded.questions[1].image, "https://cdn.example.com/q2.png");
    assert!(loaded.contains("q2"));
}

#[test]
fn test_manifest_rejects_duplicate_ids() {
    let manifest = QuestionManifest {
        title: None,
        questions: vec![Question::new("a", "a.png"), Question::new("a", "b.png")],
    };
    assert!(matches!(manifest.validate(), Err(LayoutError::Config(_))));
}

#[test]
fn test_manifest_rejects_bad_question_spacing() {
    let manifest = QuestionManifest {
        title: None,
        questions: vec![
            Question::new("a", "a.png").with_size(800, 600).with_spacing(-300.0),
            Question::new("b", "b.png").with_size(800, 600),
        ],
    };
    assert!(matches!(manifest.validate(), Err(LayoutError::Config(_))));

    let manifest = QuestionManifest {
        title: None,
        questions: vec![Question::new("a", "a.png").with_spacing(f32::NAN)],
    };
    assert!(matches!(manifest.validate(), Err(LayoutError::Config(_))));

    let manifest = QuestionManifest {
        title: None,
        questions: vec![Question::new("a", "a.png").with_spacing(0.0)],
    };
    assert!(manifest.validate().is_ok());
}
