//! Page content rendering
//!
//! A single renderer draws every template. All per-template differences come
//! from the [`Skin`] row: margins, colours, label and header styles.

use crate::answer_key::AnswerKeyEntry;
use crate::constants::*;
use crate::options::LayoutOptions;
use crate::paginate::{Column, Page, PlacedQuestion};
use crate::skin::{HeaderStyle, LabelStyle, PageGeometry, Rgb, Skin};
use crate::types::{AnswerLetter, ColumnCount, QuestionId};

use super::images::ImageStore;
use super::shapes::*;
use super::text::*;

/// Resource name of the translucent graphics state used by watermarks
pub const WATERMARK_GSTATE: &str = "GS1";

const MUTED: Rgb = Rgb(0.55, 0.55, 0.55);

/// Content stream of one page plus the images it references
#[derive(Debug, Default)]
pub struct PageContent {
    pub ops: String,
    /// (resource name, question) pairs for every image drawn
    pub images: Vec<(String, QuestionId)>,
}

/// Where the answer key goes on a page
#[derive(Debug, Clone, Copy)]
pub struct AnswerKeyPlacement<'a> {
    pub entries: &'a [AnswerKeyEntry],
    /// Top edge of the key
    pub top: f32,
}

pub struct PageRenderer<'a> {
    options: &'a LayoutOptions,
    skin: &'static Skin,
    geometry: PageGeometry,
    images: &'a ImageStore,
}

impl<'a> PageRenderer<'a> {
    pub fn new(options: &'a LayoutOptions, images: &'a ImageStore) -> Self {
        let skin = options.template.skin();
        Self {
            options,
            skin,
            geometry: PageGeometry::a4(skin),
            images,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Height the answer key needs for `count` entries
    pub fn answer_key_height(count: usize) -> f32 {
        let rows = count.div_ceil(ANSWER_KEY_COLUMNS);
        ANSWER_KEY_TITLE_HEIGHT + rows as f32 * ANSWER_KEY_ROW_HEIGHT
    }

    /// Render one page. `number` is 1-based.
    pub fn render(
        &self,
        page: &Page,
        number: usize,
        count: usize,
        answer_key: Option<AnswerKeyPlacement<'_>>,
    ) -> PageContent {
        let mut content = PageContent::default();

        if self.options.brand_watermark {
            content.ops.push_str(&self.brand_watermark());
        }

        content.ops.push_str(&self.header(page));

        for column in [Column::Left, Column::Right] {
            let questions = page.column(column);
            if !questions.is_empty() {
                self.column(questions, column, &mut content);
            }
        }

        if self.options.columns == ColumnCount::Two {
            content.ops.push_str(&self.divider());
        }

        if let Some(key) = answer_key {
            content.ops.push_str(&self.answer_key(key));
        }

        content.ops.push_str(&self.footer(number, count));
        content
    }

    // =========================================================================
    // Header
    // =========================================================================

    fn header(&self, page: &Page) -> String {
        let g = &self.geometry;
        let skin = self.skin;
        let title = self.options.title.as_str();
        let subtitle = self.options.subtitle.as_deref().unwrap_or("");
        let center_x = (g.content_left + g.content_right) / 2.0;
        let title_y = g.header_top - skin.title_font_size;
        let mut ops = String::from("q\n");
        let mut label_color = skin.accent;

        match skin.header_style {
            HeaderStyle::Centered | HeaderStyle::Ruled | HeaderStyle::ExamForm => {
                ops.push_str(&skin.text.fill_op());
                ops.push_str(&text_centered(FONT_BOLD, skin.title_font_size, center_x, title_y, title));
                if !subtitle.is_empty() {
                    ops.push_str(&text_centered(
                        FONT_REGULAR,
                        SUBTITLE_FONT_SIZE,
                        center_x,
                        title_y - SUBTITLE_FONT_SIZE - 4.0,
                        subtitle,
                    ));
                }
            }
            HeaderStyle::Banner => {
                let banner_bottom = g.content_top + 8.0;
                ops.push_str(&skin.accent.fill_op());
                ops.push_str(&fill_rect(
                    g.content_left,
                    banner_bottom,
                    g.content_width(),
                    g.header_top - banner_bottom,
                ));
                ops.push_str(&Rgb::WHITE.fill_op());
                let text_y = banner_bottom + (g.header_top - banner_bottom - skin.title_font_size) / 2.0 + 3.0;
                ops.push_str(&text_at(FONT_BOLD, skin.title_font_size, g.content_left + 10.0, text_y, title));
                if !subtitle.is_empty() {
                    ops.push_str(&text_at(
                        FONT_REGULAR,
                        SUBTITLE_FONT_SIZE,
                        g.content_left + 10.0,
                        text_y - SUBTITLE_FONT_SIZE - 3.0,
                        subtitle,
                    ));
                }
                label_color = Rgb::WHITE;
            }
            HeaderStyle::Minimal => {
                ops.push_str(&skin.text.fill_op());
                let line = if subtitle.is_empty() {
                    title.to_string()
                } else {
                    format!("{title} - {subtitle}")
                };
                ops.push_str(&text_at(FONT_BOLD, skin.title_font_size, g.content_left, title_y, &line));
            }
            HeaderStyle::Booklet => {
                ops.push_str(&skin.accent.stroke_op());
                ops.push_str(&line_width(skin.divider_width));
                ops.push_str(&stroke_rect(
                    g.content_left,
                    g.content_top + 6.0,
                    g.content_width(),
                    g.header_top - g.content_top - 6.0,
                ));
                ops.push_str(&skin.text.fill_op());
                ops.push_str(&text_centered(FONT_BOLD, skin.title_font_size, center_x, title_y - 4.0, title));
                if !subtitle.is_empty() {
                    ops.push_str(&text_centered(
                        FONT_REGULAR,
                        SUBTITLE_FONT_SIZE,
                        center_x,
                        title_y - SUBTITLE_FONT_SIZE - 8.0,
                        subtitle,
                    ));
                }
            }
        }

        // Rules and form fields
        match skin.header_style {
            HeaderStyle::Centered | HeaderStyle::Minimal => {
                ops.push_str(&skin.accent.stroke_op());
                ops.push_str(&line_width(skin.divider_width));
                ops.push_str(&line(g.content_left, g.content_top + 6.0, g.content_right, g.content_top + 6.0));
            }
            HeaderStyle::Ruled => {
                ops.push_str(&skin.accent.stroke_op());
                ops.push_str(&line_width(skin.divider_width));
                ops.push_str(&line(g.content_left, g.header_top + 2.0, g.content_right, g.header_top + 2.0));
                ops.push_str(&line(g.content_left, g.content_top + 6.0, g.content_right, g.content_top + 6.0));
            }
            HeaderStyle::ExamForm | HeaderStyle::Booklet => {
                ops.push_str(&self.form_fields(g.content_top + 12.0));
            }
            HeaderStyle::Banner => {}
        }

        if let Some(project) = page.project_index {
            ops.push_str(&label_color.fill_op());
            let label = format!("TEST {}", project + 1);
            ops.push_str(&text_right(FONT_BOLD, 10.0, g.content_right - 6.0, g.header_top - 12.0, &label));
        }

        ops.push_str("Q\n");
        ops
    }

    /// Name / class / number boxes for a student to fill in
    fn form_fields(&self, y: f32) -> String {
        let g = &self.geometry;
        let fields = [("Name:", 0.5), ("Class:", 0.25), ("No:", 0.25)];
        let mut ops = String::new();
        let mut x = g.content_left + 6.0;
        let total = g.content_width() - 12.0;

        ops.push_str(&self.skin.text.fill_op());
        ops.push_str(&Rgb::BLACK.stroke_op());
        ops.push_str(&line_width(0.5));
        for (label, share) in fields {
            let width = total * share;
            ops.push_str(&text_at(FONT_REGULAR, 8.0, x, y, label));
            let line_start = x + text_width(label, 8.0) + 4.0;
            ops.push_str(&line(line_start, y - 1.0, x + width - 8.0, y - 1.0));
            x += width;
        }
        ops
    }

    // =========================================================================
    // Questions
    // =========================================================================

    fn column(&self, questions: &[PlacedQuestion], column: Column, content: &mut PageContent) {
        let x = self.geometry.column_x(self.options.columns, column);
        let width = self.geometry.column_width(self.options.columns);
        let mut top = self.geometry.content_top;

        for placed in questions {
            self.question_block(placed, x, top, width, content);
            top -= placed.total_height;
        }
    }

    fn question_block(
        &self,
        placed: &PlacedQuestion,
        x: f32,
        top: f32,
        width: f32,
        content: &mut PageContent,
    ) {
        let ops = &mut content.ops;
        ops.push_str("q\n");
        ops.push_str(&self.label(placed.number(), x, top));

        let mut right = x + width;
        if self.options.show_answer_bubbles {
            ops.push_str(&self.bubbles(placed.question.correct_answer, right, top));
            right -= AnswerLetter::ALL.len() as f32 * BUBBLE_SPACING + 6.0;
        }
        if self.options.show_difficulty {
            if let Some(difficulty) = placed.question.difficulty {
                ops.push_str(&self.difficulty_badge(difficulty.value(), right, top));
            }
        }

        let image_y = top - QUESTION_LABEL_BAND_PT - placed.rendered_height;
        if self.images.contains(&placed.question.id) {
            let name = format!("Im{}", content.images.len());
            ops.push_str(&format!(
                "q {} 0 0 {} {} {} cm /{} Do Q\n",
                width, placed.rendered_height, x, image_y, name
            ));
            content.images.push((name, placed.question.id.clone()));
        } else {
            log::warn!("No image loaded for question {}", placed.question.id);
            ops.push_str(&MUTED.stroke_op());
            ops.push_str(&line_width(0.5));
            ops.push_str(&stroke_rect(x, image_y, width, placed.rendered_height));
            ops.push_str(&MUTED.fill_op());
            ops.push_str(&text_centered(
                FONT_REGULAR,
                8.0,
                x + width / 2.0,
                image_y + placed.rendered_height / 2.0,
                "image unavailable",
            ));
        }
        ops.push_str("Q\n");
    }

    fn label(&self, number: usize, x: f32, top: f32) -> String {
        let text = number.to_string();
        let baseline = top - 11.0;
        let mut ops = String::new();

        match self.skin.label_style {
            LabelStyle::Plain => {
                ops.push_str(&self.skin.text.fill_op());
                ops.push_str(&text_at(FONT_BOLD, LABEL_FONT_SIZE, x, baseline, &format!("{text}.")));
            }
            LabelStyle::Boxed => {
                let box_width = text_width(&text, LABEL_FONT_SIZE).max(10.0) + 8.0;
                ops.push_str(&self.skin.accent.fill_op());
                ops.push_str(&fill_rect(x, top - 13.0, box_width, 12.0));
                ops.push_str(&Rgb::WHITE.fill_op());
                ops.push_str(&text_centered(FONT_BOLD, LABEL_FONT_SIZE, x + box_width / 2.0, baseline + 1.0, &text));
            }
            LabelStyle::Circled => {
                let r = 6.5;
                ops.push_str(&self.skin.accent.stroke_op());
                ops.push_str(&line_width(0.75));
                ops.push_str(&stroke_circle(x + r, top - 7.5, r));
                ops.push_str(&self.skin.text.fill_op());
                ops.push_str(&text_centered(FONT_BOLD, LABEL_FONT_SIZE - 2.0, x + r, top - 10.0, &text));
            }
        }
        ops
    }

    /// Answer bubbles A-E, right aligned at `right`
    fn bubbles(&self, correct: Option<AnswerLetter>, right: f32, top: f32) -> String {
        let cy = top - QUESTION_LABEL_BAND_PT / 2.0;
        let first_cx = right - BUBBLE_RADIUS - (AnswerLetter::ALL.len() - 1) as f32 * BUBBLE_SPACING;
        let mut ops = String::new();
        ops.push_str(&line_width(0.5));

        for (i, letter) in AnswerLetter::ALL.into_iter().enumerate() {
            let cx = first_cx + i as f32 * BUBBLE_SPACING;
            let filled = self.options.show_answers && correct == Some(letter);
            if filled {
                ops.push_str(&self.skin.accent.fill_op());
                ops.push_str(&fill_circle(cx, cy, BUBBLE_RADIUS));
                ops.push_str(&Rgb::WHITE.fill_op());
            } else {
                ops.push_str(&self.skin.text.stroke_op());
                ops.push_str(&stroke_circle(cx, cy, BUBBLE_RADIUS));
                ops.push_str(&self.skin.text.fill_op());
            }
            ops.push_str(&text_centered(
                FONT_BOLD,
                BUBBLE_FONT_SIZE,
                cx,
                cy - BUBBLE_FONT_SIZE / 3.0,
                &letter.to_string(),
            ));
        }
        ops
    }

    fn difficulty_badge(&self, difficulty: u8, right: f32, top: f32) -> String {
        let x = right - DIFFICULTY_BADGE_WIDTH;
        let mut ops = String::new();
        ops.push_str(&self.skin.accent.stroke_op());
        ops.push_str(&line_width(0.5));
        ops.push_str(&stroke_rect(x, top - 13.0, DIFFICULTY_BADGE_WIDTH, 11.0));
        ops.push_str(&self.skin.accent.fill_op());
        ops.push_str(&text_centered(
            FONT_BOLD,
            6.5,
            x + DIFFICULTY_BADGE_WIDTH / 2.0,
            top - 10.0,
            &format!("{difficulty}/10"),
        ));
        ops
    }

    // =========================================================================
    // Divider, footer and watermarks
    // =========================================================================

    fn divider(&self) -> String {
        let g = &self.geometry;
        let x = g.divider_x();
        let mut ops = String::from("q\n");
        ops.push_str(&self.skin.accent.stroke_op());
        ops.push_str(&line_width(self.skin.divider_width));
        ops.push_str(&line(x, g.content_top, x, g.content_bottom));

        if let Some(text) = self.options.divider_watermark.as_deref().filter(|t| !t.is_empty()) {
            let size = DIVIDER_WATERMARK_FONT_SIZE;
            let center_y = (g.content_top + g.content_bottom) / 2.0;
            ops.push_str(&format!("/{} gs\n", WATERMARK_GSTATE));
            ops.push_str(&MUTED.fill_op());
            ops.push_str(&text_rotated(
                FONT_BOLD,
                size,
                x + size * 0.35,
                center_y - text_width(text, size) / 2.0,
                90.0,
                text,
            ));
        }

        ops.push_str("Q\n");
        ops
    }

    fn footer(&self, number: usize, count: usize) -> String {
        let g = &self.geometry;
        let text = match self.skin.header_style {
            HeaderStyle::Booklet => format!("{number} / {count}"),
            _ => number.to_string(),
        };
        let mut ops = String::from("q\n");
        ops.push_str(&self.skin.text.fill_op());
        ops.push_str(&text_centered(
            FONT_REGULAR,
            FOOTER_FONT_SIZE,
            (g.content_left + g.content_right) / 2.0,
            self.skin.margin_bottom_pt + 4.0,
            &text,
        ));
        ops.push_str("Q\n");
        ops
    }

    fn brand_watermark(&self) -> String {
        let g = &self.geometry;
        let mut ops = String::from("q\n");
        ops.push_str(&format!("/{} gs\n", WATERMARK_GSTATE));
        ops.push_str(&MUTED.fill_op());

        let mut y = 0.0;
        while y < g.page_height {
            let mut x = -BRAND_WATERMARK_STEP / 3.0;
            while x < g.page_width {
                ops.push_str(&text_rotated(
                    FONT_BOLD,
                    BRAND_WATERMARK_FONT_SIZE,
                    x,
                    y,
                    45.0,
                    BRAND_WATERMARK_TEXT,
                ));
                x += BRAND_WATERMARK_STEP;
            }
            y += BRAND_WATERMARK_STEP;
        }

        ops.push_str("Q\n");
        ops
    }

    // =========================================================================
    // Answer key
    // =========================================================================

    fn answer_key(&self, key: AnswerKeyPlacement<'_>) -> String {
        let g = &self.geometry;
        let cell_width = g.content_width() / ANSWER_KEY_COLUMNS as f32;
        let grid_top = key.top - ANSWER_KEY_TITLE_HEIGHT;
        let mut ops = String::from("q\n");

        ops.push_str(&self.skin.text.fill_op());
        ops.push_str(&text_at(FONT_BOLD, 11.0, g.content_left, key.top - 14.0, "Answer Key"));
        ops.push_str(&self.skin.accent.stroke_op());
        ops.push_str(&line_width(0.5));

        for (i, entry) in key.entries.iter().enumerate() {
            let row = i / ANSWER_KEY_COLUMNS;
            let col = i % ANSWER_KEY_COLUMNS;
            let x = g.content_left + col as f32 * cell_width;
            let y = grid_top - (row + 1) as f32 * ANSWER_KEY_ROW_HEIGHT;
            let answer = entry.answer.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());

            ops.push_str(&stroke_rect(x, y, cell_width, ANSWER_KEY_ROW_HEIGHT));
            ops.push_str(&text_centered(
                FONT_REGULAR,
                ANSWER_KEY_FONT_SIZE,
                x + cell_width / 2.0,
                y + 5.0,
                &format!("{}. {}", entry.number, answer),
            ));
        }

        ops.push_str("Q\n");
        ops
    }
}
