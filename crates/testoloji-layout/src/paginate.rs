//! Question pagination
//!
//! Flows an ordered list of questions into fixed-height pages with one or
//! two columns. Packing is first-fit and order preserving:
//! - a question is never split across pages or columns
//! - questions are never reordered
//! - once a page has moved on to its right column, the left column is closed
//!
//! A question taller than the usable height is still placed, alone in its
//! column.

use crate::constants::{QUESTION_LABEL_BAND_PT, SPACING_PT_PER_MM};
use crate::skin::{PageGeometry, Template};
use crate::types::{ColumnCount, Question};

/// Inputs of the packing algorithm, all in points except spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationConfig {
    pub columns: ColumnCount,
    /// Default spacing below each question (mm)
    pub spacing_mm: f32,
    /// Height available to a column on one page
    pub usable_height: f32,
    /// Column width in single-column layout
    pub col_width_single: f32,
    /// Column width in two-column layout
    pub col_width_double: f32,
}

impl PaginationConfig {
    /// Derive the column geometry from a template's A4 page layout
    pub fn for_template(template: Template, columns: ColumnCount, spacing_mm: f32) -> Self {
        let geometry = PageGeometry::a4(template.skin());
        Self {
            columns,
            spacing_mm,
            usable_height: geometry.usable_height(),
            col_width_single: geometry.col_width_single,
            col_width_double: geometry.col_width_double,
        }
    }

    pub fn column_width(&self) -> f32 {
        match self.columns {
            ColumnCount::One => self.col_width_single,
            ColumnCount::Two => self.col_width_double,
        }
    }
}

/// Column of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

/// A question with its position in the input and its measured height
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedQuestion {
    /// Position in the input list; displayed as `auto_index + 1`
    pub auto_index: usize,
    pub question: Question,
    /// Image height once scaled to the column width
    pub rendered_height: f32,
    /// Rendered height plus spacing and the label band
    pub total_height: f32,
}

impl PlacedQuestion {
    /// Number printed next to the question
    pub fn number(&self) -> usize {
        self.auto_index + 1
    }
}

/// One printable page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub left: Vec<PlacedQuestion>,
    /// Always empty in single-column layout
    pub right: Vec<PlacedQuestion>,
    /// Project of the first question placed on the page
    pub project_index: Option<u32>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Questions in reading order: left column, then right column
    pub fn questions(&self) -> impl Iterator<Item = &PlacedQuestion> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn column(&self, column: Column) -> &[PlacedQuestion] {
        match column {
            Column::Left => &self.left,
            Column::Right => &self.right,
        }
    }

    /// Sum of the total heights in a column
    pub fn column_height(&self, column: Column) -> f32 {
        self.column(column).iter().map(|q| q.total_height).sum()
    }

    fn place(&mut self, column: Column, item: PlacedQuestion) {
        if self.is_empty() {
            self.project_index = item.question.project_index;
        }
        match column {
            Column::Left => self.left.push(item),
            Column::Right => self.right.push(item),
        }
    }
}

/// Measure a question for the configured column width
pub fn measure(question: &Question, auto_index: usize, config: &PaginationConfig) -> PlacedQuestion {
    let (width, height) = question.intrinsic_size();
    let rendered_height = (config.column_width() / width) * height;
    // Negative spacing would let a column hold more than it can show
    let spacing_mm = question.bottom_spacing_mm.unwrap_or(config.spacing_mm).max(0.0);
    let total_height = rendered_height + spacing_mm * SPACING_PT_PER_MM + QUESTION_LABEL_BAND_PT;

    PlacedQuestion {
        auto_index,
        question: question.clone(),
        rendered_height,
        total_height,
    }
}

/// Lay questions out into pages.
///
/// Returns no pages for no questions.
pub fn paginate(questions: &[Question], config: &PaginationConfig) -> Vec<Page> {
    let placed = questions
        .iter()
        .enumerate()
        .map(|(index, question)| measure(question, index, config));

    let pages = match config.columns {
        ColumnCount::One => paginate_single(placed, config.usable_height),
        ColumnCount::Two => paginate_double(placed, config.usable_height),
    };

    log::debug!(
        "Paginated {} questions into {} pages ({} columns)",
        questions.len(),
        pages.len(),
        config.columns.count()
    );

    pages
}

fn paginate_single(
    placed: impl Iterator<Item = PlacedQuestion>,
    usable_height: f32,
) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut column_height = 0.0;

    for item in placed {
        if !current.left.is_empty() && column_height + item.total_height > usable_height {
            pages.push(std::mem::take(&mut current));
            column_height = 0.0;
        }

        column_height += item.total_height;
        current.place(Column::Left, item);
    }

    if !current.is_empty() {
        pages.push(current);
    }

    pages
}

fn paginate_double(
    placed: impl Iterator<Item = PlacedQuestion>,
    usable_height: f32,
) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut left_height = 0.0;
    let mut right_height = 0.0;
    let mut cursor = Column::Left;

    for item in placed {
        let height = item.total_height;

        if cursor == Column::Left {
            if current.left.is_empty() || left_height + height <= usable_height {
                left_height += height;
                current.place(Column::Left, item);
                continue;
            }
            cursor = Column::Right;
        }

        if right_height + height <= usable_height {
            right_height += height;
            current.place(Column::Right, item);
            continue;
        }

        // Neither column of this page can take it
        pages.push(std::mem::take(&mut current));
        right_height = 0.0;
        cursor = Column::Left;
        left_height = height;
        current.place(Column::Left, item);
    }

    if !current.is_empty() {
        pages.push(current);
    }

    pages
}

/// Remembers the last pagination and recomputes only when the questions or
/// the configuration change
#[derive(Debug, Default)]
pub struct PaginationCache {
    key: Option<(Vec<Question>, PaginationConfig)>,
    pages: Vec<Page>,
}

impl PaginationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&mut self, questions: &[Question], config: &PaginationConfig) -> &[Page] {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(cached, cached_config)| cached.as_slice() == questions && cached_config == config);

        if !fresh {
            self.pages = paginate(questions, config);
            self.key = Some((questions.to_vec(), *config));
        }

        &self.pages
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.pages.clear();
    }
}
