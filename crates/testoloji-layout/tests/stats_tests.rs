use testoloji_layout::*;

fn config(columns: ColumnCount) -> PaginationConfig {
    PaginationConfig {
        columns,
        spacing_mm: 0.0,
        usable_height: 815.0,
        col_width_single: 560.0,
        col_width_double: 280.0,
    }
}

#[test]
fn test_statistics_counts() {
    let questions = vec![
        Question::new("a", "a.png")
            .with_size(800, 600)
            .with_answer(AnswerLetter::A)
            .with_difficulty(Difficulty::new(4).unwrap())
            .with_project(0),
        Question::new("b", "b.png")
            .with_size(800, 600)
            .with_difficulty(Difficulty::new(8).unwrap())
            .with_project(1),
        Question::new("c", "c.png").with_size(800, 5000).with_project(1),
    ];
    let cfg = config(ColumnCount::One);
    let pages = paginate(&questions, &cfg);
    let stats = calculate_statistics(&pages, &cfg);

    assert_eq!(stats.question_count, 3);
    assert_eq!(stats.page_count, pages.len());
    assert_eq!(stats.test_count, 2);
    assert_eq!(stats.answered_count, 1);
    assert_eq!(stats.average_difficulty, Some(6.0));
    assert_eq!(stats.oversized_count, 1);
    assert!(stats.fill_ratio > 0.0 && stats.fill_ratio <= 1.0);
}

#[test]
fn test_statistics_empty() {
    let cfg = config(ColumnCount::Two);
    let stats = calculate_statistics(&[], &cfg);

    assert_eq!(stats.question_count, 0);
    assert_eq!(stats.page_count, 0);
    assert_eq!(stats.average_difficulty, None);
    assert_eq!(stats.fill_ratio, 0.0);
}

#[test]
fn test_fill_ratio_two_columns() {
    // Each question is 140 + 15 = 155pt tall at 280pt wide
    let questions: Vec<_> = (0..2)
        .map(|i| Question::new(format!("q{i}"), "q.png").with_size(800, 400))
        .collect();
    let cfg = config(ColumnCount::Two);
    let pages = paginate(&questions, &cfg);
    let stats = calculate_statistics(&pages, &cfg);

    let expected = 310.0 / (2.0 * 815.0);
    assert!((stats.fill_ratio - expected).abs() < 1e-4);
}
