use testoloji_layout::*;

fn config(columns: ColumnCount, spacing_mm: f32, usable_height: f32) -> PaginationConfig {
    PaginationConfig {
        columns,
        spacing_mm,
        usable_height,
        col_width_single: 560.0,
        col_width_double: 280.0,
    }
}

fn questions(count: usize, width: u32, height: u32) -> Vec<Question> {
    (0..count)
        .map(|i| Question::new(format!("q{}", i + 1), format!("q{}.png", i + 1)).with_size(width, height))
        .collect()
}

/// Deterministic mix of heights, some of them taller than a column
fn mixed_questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| {
            let height = 100 + ((i * 379) % 1700) as u32;
            let mut q = Question::new(format!("m{i}"), format!("m{i}.png")).with_size(800, height);
            if i % 4 == 0 {
                q = q.with_spacing((i % 7) as f32 * 3.0);
            }
            q
        })
        .collect()
}

fn ids(placed: &[PlacedQuestion]) -> Vec<&str> {
    placed.iter().map(|p| p.question.id.as_str()).collect()
}

#[test]
fn test_single_column_one_question_per_page() {
    let qs = questions(5, 800, 600);
    let pages = paginate(&qs, &config(ColumnCount::One, 20.0, 815.0));

    assert_eq!(pages.len(), 5);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.left.len(), 1);
        assert!(page.right.is_empty());
        assert_eq!(page.left[0].question.id.as_str(), format!("q{}", i + 1));
        assert!((page.left[0].rendered_height - 420.0).abs() < 0.01);
        assert!((page.left[0].total_height - 491.6).abs() < 0.01);
    }
}

#[test]
fn test_two_column_both_fit_left() {
    // 280x200 at 280pt wide renders at 200pt; spacing chosen for 20pt of overhead
    let spacing_mm = 5.0 / constants::SPACING_PT_PER_MM;
    let qs = questions(2, 280, 200);
    let pages = paginate(&qs, &config(ColumnCount::Two, spacing_mm, 815.0));

    assert_eq!(pages.len(), 1);
    assert_eq!(ids(&pages[0].left), vec!["q1", "q2"]);
    assert!(pages[0].right.is_empty());
    assert!((pages[0].left[0].total_height - 220.0).abs() < 0.01);
}

#[test]
fn test_two_column_fills_right_then_next_page() {
    // 800x600 at 280pt wide renders at 210pt; total 210 + 56.6 + 15 = 281.6
    let qs = questions(7, 800, 600);
    let pages = paginate(&qs, &config(ColumnCount::Two, 20.0, 815.0));

    assert_eq!(pages.len(), 2);
    assert_eq!(ids(&pages[0].left), vec!["q1", "q2"]);
    assert_eq!(ids(&pages[0].right), vec!["q3", "q4"]);
    assert_eq!(ids(&pages[1].left), vec!["q5", "q6"]);
    assert_eq!(ids(&pages[1].right), vec!["q7"]);
}

#[test]
fn test_left_column_never_reopens() {
    let mut qs = questions(1, 800, 1600); // 560pt + overhead
    qs.push(Question::new("tall", "tall.png").with_size(800, 1400)); // 490pt + overhead
    qs.push(Question::new("small", "small.png").with_size(800, 100));
    let pages = paginate(&qs, &config(ColumnCount::Two, 0.0, 815.0));

    assert_eq!(pages.len(), 1);
    assert_eq!(ids(&pages[0].left), vec!["q1"]);
    // "small" would fit under q1 but the cursor already moved right
    assert_eq!(ids(&pages[0].right), vec!["tall", "small"]);
}

#[test]
fn test_zero_questions_zero_pages() {
    for columns in [ColumnCount::One, ColumnCount::Two] {
        assert!(paginate(&[], &config(columns, 20.0, 815.0)).is_empty());
    }
}

#[test]
fn test_oversized_question_gets_its_own_column() {
    let mut qs = questions(1, 800, 100);
    qs.push(Question::new("huge", "huge.png").with_size(800, 5000));
    qs.push(Question::new("after", "after.png").with_size(800, 100));

    let pages = paginate(&qs, &config(ColumnCount::One, 20.0, 815.0));
    assert_eq!(pages.len(), 3);
    assert_eq!(ids(&pages[1].left), vec!["huge"]);
    assert!(pages[1].left[0].total_height > 815.0);

    let pages = paginate(&qs, &config(ColumnCount::Two, 20.0, 815.0));
    // Too tall for the right column, so it opens a page and sits alone on the left
    assert_eq!(pages.len(), 2);
    assert_eq!(ids(&pages[0].left), vec!["q1"]);
    assert!(pages[0].right.is_empty());
    assert_eq!(ids(&pages[1].left), vec!["huge"]);
    assert_eq!(ids(&pages[1].right), vec!["after"]);
}

#[test]
fn test_negative_spacing_cannot_overfill_a_column() {
    let qs = vec![
        Question::new("a", "a.png").with_size(800, 600).with_spacing(-300.0),
        Question::new("b", "b.png").with_size(800, 600),
    ];

    let pages = paginate(&qs, &config(ColumnCount::One, 20.0, 815.0));
    assert_eq!(pages.len(), 2);
    assert!(pages[0].left[0].total_height >= pages[0].left[0].rendered_height);
    for page in &pages {
        let rendered: f32 = page.left.iter().map(|q| q.rendered_height).sum();
        assert!(rendered <= 815.0);
    }
}

#[test]
fn test_order_and_completeness_preserved() {
    let qs = mixed_questions(60);
    for columns in [ColumnCount::One, ColumnCount::Two] {
        let pages = paginate(&qs, &config(columns, 12.0, 815.0));
        let flattened: Vec<_> = pages.iter().flat_map(Page::questions).collect();

        assert_eq!(flattened.len(), qs.len());
        for (i, placed) in flattened.iter().enumerate() {
            assert_eq!(placed.auto_index, i);
            assert_eq!(placed.number(), i + 1);
            assert_eq!(placed.question, qs[i]);
        }
        assert!(pages.iter().all(|p| !p.is_empty()));
    }
}

#[test]
fn test_columns_only_overflow_with_single_item() {
    let qs = mixed_questions(80);
    for columns in [ColumnCount::One, ColumnCount::Two] {
        let pages = paginate(&qs, &config(columns, 8.0, 700.0));
        for page in &pages {
            for column in [Column::Left, Column::Right] {
                let items = page.column(column);
                if items.len() > 1 {
                    assert!(page.column_height(column) <= 700.0 + 1e-3);
                }
            }
        }
    }
}

#[test]
fn test_pagination_is_deterministic() {
    let qs = mixed_questions(40);
    let cfg = config(ColumnCount::Two, 15.0, 815.0);
    assert_eq!(paginate(&qs, &cfg), paginate(&qs, &cfg));
}

#[test]
fn test_adding_questions_never_reduces_pages() {
    let qs = mixed_questions(50);
    for columns in [ColumnCount::One, ColumnCount::Two] {
        let cfg = config(columns, 20.0, 815.0);
        let mut previous = 0;
        for n in 0..=qs.len() {
            let count = paginate(&qs[..n], &cfg).len();
            assert!(count >= previous, "{n} questions gave {count} pages, fewer than {previous}");
            previous = count;
        }
    }
}

#[test]
fn test_missing_dimensions_use_default_aspect() {
    let qs = vec![Question::new("nodims", "nodims.png")];
    let pages = paginate(&qs, &config(ColumnCount::One, 0.0, 815.0));
    assert!((pages[0].left[0].rendered_height - 420.0).abs() < 0.01);
}

#[test]
fn test_page_project_index_from_first_question() {
    let qs = vec![
        Question::new("a", "a.png").with_size(800, 1500).with_project(2),
        Question::new("b", "b.png").with_size(800, 1500).with_project(3),
    ];
    let pages = paginate(&qs, &config(ColumnCount::One, 20.0, 815.0));
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].project_index, Some(2));
    assert_eq!(pages[1].project_index, Some(3));
}

#[test]
fn test_template_config_uses_skin_geometry() {
    let classic = PaginationConfig::for_template(Template::Classic, ColumnCount::Two, 20.0);
    let geometry = PageGeometry::a4(Template::Classic.skin());
    assert_eq!(classic.usable_height, geometry.usable_height());
    assert_eq!(classic.col_width_double, geometry.col_width_double);
    assert_eq!(classic.column_width(), geometry.col_width_double);

    let single = PaginationConfig::for_template(Template::Classic, ColumnCount::One, 20.0);
    assert_eq!(single.column_width(), geometry.col_width_single);
}

#[test]
fn test_cache_recomputes_on_change() {
    let mut cache = PaginationCache::new();
    let mut qs = questions(3, 800, 600);
    let cfg = config(ColumnCount::One, 20.0, 815.0);

    assert_eq!(cache.pages(&qs, &cfg).len(), 3);
    assert_eq!(cache.pages(&qs, &cfg).len(), 3);

    qs.pop();
    assert_eq!(cache.pages(&qs, &cfg).len(), 2);

    let two = config(ColumnCount::Two, 20.0, 815.0);
    assert_eq!(cache.pages(&qs, &two).len(), 1);

    cache.invalidate();
    assert_eq!(cache.pages(&qs, &two).len(), 1);
}
