use crate::paginate::{Column, Page, PaginationConfig};
use std::collections::BTreeSet;

/// Summary of a paginated document
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStatistics {
    pub question_count: usize,
    pub page_count: usize,
    /// Number of distinct tests (project indices) in the document
    pub test_count: usize,
    /// Questions that have a correct answer recorded
    pub answered_count: usize,
    pub average_difficulty: Option<f32>,
    /// Questions taller than a whole column
    pub oversized_count: usize,
    /// Used column height divided by available column height, over all pages
    pub fill_ratio: f32,
}

/// Calculate statistics for a pagination result
pub fn calculate_statistics(pages: &[Page], config: &PaginationConfig) -> LayoutStatistics {
    let mut question_count = 0;
    let mut answered_count = 0;
    let mut oversized_count = 0;
    let mut difficulty_sum = 0u32;
    let mut difficulty_count = 0u32;
    let mut projects = BTreeSet::new();

    for placed in pages.iter().flat_map(Page::questions) {
        question_count += 1;
        if placed.question.correct_answer.is_some() {
            answered_count += 1;
        }
        if let Some(difficulty) = placed.question.difficulty {
            difficulty_sum += u32::from(difficulty.value());
            difficulty_count += 1;
        }
        if let Some(project) = placed.question.project_index {
            projects.insert(project);
        }
        if placed.total_height > config.usable_height {
            oversized_count += 1;
        }
    }

    let columns_per_page = config.columns.count() as f32;
    let available = pages.len() as f32 * columns_per_page * config.usable_height;
    let used: f32 = pages
        .iter()
        .map(|p| {
            p.column_height(Column::Left).min(config.usable_height)
                + p.column_height(Column::Right).min(config.usable_height)
        })
        .sum();

    LayoutStatistics {
        question_count,
        page_count: pages.len(),
        test_count: projects.len(),
        answered_count,
        average_difficulty: (difficulty_count > 0)
            .then(|| difficulty_sum as f32 / difficulty_count as f32),
        oversized_count,
        fill_ratio: if available > 0.0 { used / available } else { 0.0 },
    }
}
