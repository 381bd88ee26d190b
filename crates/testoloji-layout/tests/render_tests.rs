use image::{Rgb, RgbImage};
use lopdf::Document;
use std::path::Path;
use testoloji_layout::*;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> String {
    let path = dir.join(name);
    let image = RgbImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb([20, 20, 20])
        } else {
            Rgb([250, 250, 250])
        }
    });
    image.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

fn bank(dir: &Path, count: usize, width: u32, height: u32) -> Vec<Question> {
    (0..count)
        .map(|i| {
            let image = write_png(dir, &format!("q{i}.png"), width, height);
            Question::new(format!("q{i}"), image).with_answer(AnswerLetter::ALL[i % 5])
        })
        .collect()
}

fn page_content(doc: &Document, page_number: u32) -> String {
    let pages = doc.get_pages();
    let page_id = pages[&page_number];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

#[tokio::test]
async fn test_render_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let questions = bank(dir.path(), 6, 80, 60);
    let options = LayoutOptions {
        title: "Deneme".to_string(),
        show_answer_bubbles: true,
        show_answers: true,
        ..Default::default()
    };

    let doc = render_pdf(&questions, &options).await.unwrap();
    let out = dir.path().join("out.pdf");
    save_pdf(doc, &out).await.unwrap();

    let reloaded = Document::load(&out).unwrap();
    let expected_pages = paginate(&questions, &options.pagination_config()).len();
    assert_eq!(reloaded.get_pages().len(), expected_pages);

    let first = page_content(&reloaded, 1);
    assert!(first.contains("(Deneme) Tj"));
    assert!(first.contains("/Im0 Do"));
    let last = page_content(&reloaded, expected_pages as u32);
    assert!(last.contains("(Answer Key) Tj"));
}

#[tokio::test]
async fn test_render_pdf_rejects_empty_input() {
    let result = render_pdf(&[], &LayoutOptions::default()).await;
    assert!(matches!(result, Err(LayoutError::NoQuestions)));
}

#[tokio::test]
async fn test_render_pdf_missing_image_is_an_error() {
    let questions = vec![Question::new("gone", "/nonexistent/gone.png")];
    let result = render_pdf(&questions, &LayoutOptions::default()).await;
    assert!(matches!(result, Err(LayoutError::Io(_))));
}

#[tokio::test]
async fn test_images_embedded_once_per_question() {
    let dir = tempfile::tempdir().unwrap();
    let questions = bank(dir.path(), 3, 40, 30);
    let images = load_images(&questions).await.unwrap();
    assert_eq!(images.len(), 3);

    let mut questions = questions;
    images.fill_missing_dimensions(&mut questions);
    assert_eq!(questions[0].width, Some(40));

    let options = LayoutOptions::default();
    let pages = paginate(&questions, &options.pagination_config());
    let doc = render_document(&pages, &options, &images).unwrap();

    let image_count = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|v| v.as_name())
                .is_ok_and(|n| n == b"Image")
        })
        .count();
    assert_eq!(image_count, 3);
}

#[test]
fn test_render_without_images_draws_placeholder() {
    let questions = vec![Question::new("a", "a.png").with_size(800, 600)];
    let options = LayoutOptions::default();
    let pages = paginate(&questions, &options.pagination_config());
    let doc = render_document(&pages, &options, &ImageStore::new()).unwrap();

    let content = page_content(&doc, 1);
    assert!(content.contains("(image unavailable) Tj"));
    assert!(!content.contains(" Do "));
}

#[test]
fn test_turkish_title_survives_in_document_info() {
    let questions = vec![Question::new("a", "a.png").with_size(800, 600)];
    let options = LayoutOptions {
        title: "Türkçe Deneme Sınavı".to_string(),
        ..Default::default()
    };
    let pages = paginate(&questions, &options.pagination_config());
    let mut doc = render_document(&pages, &options, &ImageStore::new()).unwrap();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    let reloaded = Document::load_mem(&bytes).unwrap();

    let info_id = reloaded.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = reloaded.get_object(info_id).unwrap().as_dict().unwrap();
    let title = info.get(b"Title").unwrap().as_str().unwrap();

    assert_eq!(&title[..2], &[0xFE, 0xFF]);
    let units: Vec<u16> = title[2..]
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    assert_eq!(String::from_utf16(&units).unwrap(), "Türkçe Deneme Sınavı");
}

#[test]
fn test_answer_key_moves_to_extra_page_when_full() {
    // One question taller than the usable height fills the only page
    let questions = vec![
        Question::new("big", "big.png")
            .with_size(800, 1000)
            .with_answer(AnswerLetter::D),
    ];
    let mut options = LayoutOptions {
        columns: ColumnCount::One,
        ..Default::default()
    };
    let pages = paginate(&questions, &options.pagination_config());
    assert_eq!(pages.len(), 1);

    let doc = render_document(&pages, &options, &ImageStore::new()).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
    assert!(page_content(&doc, 2).contains("(1. D) Tj"));

    options.show_answer_key = false;
    let doc = render_document(&pages, &options, &ImageStore::new()).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_every_template_renders() {
    let questions: Vec<_> = (0..4)
        .map(|i| {
            Question::new(format!("q{i}"), "q.png")
                .with_size(800, 600)
                .with_difficulty(Difficulty::new(5).unwrap())
                .with_project(i / 2)
        })
        .collect();

    for template in Template::ALL {
        let options = LayoutOptions {
            template,
            title: "Sınav".to_string(),
            subtitle: Some("Fizik".to_string()),
            show_answer_bubbles: true,
            show_difficulty: true,
            divider_watermark: Some("KOPYA".to_string()),
            brand_watermark: true,
            ..Default::default()
        };
        let pages = paginate(&questions, &options.pagination_config());
        let doc = render_document(&pages, &options, &ImageStore::new()).unwrap();
        let content = page_content(&doc, 1);

        assert!(content.contains("(TEST 1) Tj"), "{template} has no test label");
        assert!(content.contains("(5/10) Tj"), "{template} has no difficulty badge");
        assert!(content.contains("(testoloji) Tj"), "{template} has no brand watermark");
        assert!(content.contains("/GS1 gs"));
    }
}

#[test]
fn test_render_document_rejects_no_pages() {
    let result = render_document(&[], &LayoutOptions::default(), &ImageStore::new());
    assert!(matches!(result, Err(LayoutError::NoQuestions)));
}

#[tokio::test]
async fn test_answer_key_csv() {
    let questions = vec![
        Question::new("a", "a.png").with_answer(AnswerLetter::C).with_project(0),
        Question::new("b", "b.png").with_project(1),
    ];
    let pages = paginate(&questions, &LayoutOptions::default().pagination_config());
    let entries = answer_key(&pages);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].number, 1);
    assert_eq!(entries[0].answer, Some(AnswerLetter::C));

    let mut buffer = Vec::new();
    write_answer_key_csv(&entries, &mut buffer).unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "number,answer,test\n1,C,1\n2,,2\n"
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("key.csv");
    save_answer_key_csv(&entries, &path).await.unwrap();
    assert!(tokio::fs::read_to_string(&path).await.unwrap().starts_with("number,answer,test"));
}
