//! Visual templates
//!
//! Every template is a row of layout constants in [`SKINS`]. The renderer
//! reads the row for the selected template; no template has its own
//! drawing code.

use crate::constants::{A4_HEIGHT_PT, A4_WIDTH_PT};
use crate::paginate::Column;
use crate::types::ColumnCount;
use crate::{LayoutError, Result};
use std::fmt;
use std::str::FromStr;

/// Named visual style of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Template {
    #[default]
    Classic,
    Modern,
    Compact,
    Elegant,
    Exam,
    Osym,
}

impl Template {
    pub const ALL: [Template; 6] = [
        Template::Classic,
        Template::Modern,
        Template::Compact,
        Template::Elegant,
        Template::Exam,
        Template::Osym,
    ];

    pub fn name(self) -> &'static str {
        self.skin().name
    }

    pub fn skin(self) -> &'static Skin {
        &SKINS[self as usize]
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Template {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Template::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| LayoutError::InvalidValue(format!("Unknown template '{s}'")))
    }
}

/// RGB colour with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

    /// Content stream operator setting the fill colour
    pub fn fill_op(self) -> String {
        format!("{} {} {} rg\n", self.0, self.1, self.2)
    }

    /// Content stream operator setting the stroke colour
    pub fn stroke_op(self) -> String {
        format!("{} {} {} RG\n", self.0, self.1, self.2)
    }
}

/// How question numbers are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// "12."
    Plain,
    /// Number inside a filled box
    Boxed,
    /// Number inside a circle
    Circled,
}

/// Arrangement of the header band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Centered title with a rule underneath
    Centered,
    /// Title on a filled accent banner
    Banner,
    /// Single small title line
    Minimal,
    /// Title between two thin rules
    Ruled,
    /// Title plus name/class/number fields
    ExamForm,
    /// Booklet title block with framed fields, centralized exam style
    Booklet,
}

/// Layout constants of one template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skin {
    pub name: &'static str,
    pub margin_top_pt: f32,
    pub margin_bottom_pt: f32,
    pub margin_side_pt: f32,
    pub header_height_pt: f32,
    pub footer_height_pt: f32,
    pub column_gutter_pt: f32,
    pub title_font_size: f32,
    pub accent: Rgb,
    pub text: Rgb,
    pub label_style: LabelStyle,
    pub header_style: HeaderStyle,
    pub divider_width: f32,
}

/// Indexed by `Template as usize`
pub static SKINS: [Skin; 6] = [
    Skin {
        name: "classic",
        margin_top_pt: 28.0,
        margin_bottom_pt: 24.0,
        margin_side_pt: 30.0,
        header_height_pt: 50.0,
        footer_height_pt: 20.0,
        column_gutter_pt: 20.0,
        title_font_size: 14.0,
        accent: Rgb(0.0, 0.0, 0.0),
        text: Rgb::BLACK,
        label_style: LabelStyle::Plain,
        header_style: HeaderStyle::Centered,
        divider_width: 0.75,
    },
    Skin {
        name: "modern",
        margin_top_pt: 24.0,
        margin_bottom_pt: 24.0,
        margin_side_pt: 28.0,
        header_height_pt: 56.0,
        footer_height_pt: 20.0,
        column_gutter_pt: 22.0,
        title_font_size: 16.0,
        accent: Rgb(0.15, 0.39, 0.92),
        text: Rgb(0.12, 0.16, 0.22),
        label_style: LabelStyle::Boxed,
        header_style: HeaderStyle::Banner,
        divider_width: 0.5,
    },
    Skin {
        name: "compact",
        margin_top_pt: 18.0,
        margin_bottom_pt: 16.0,
        margin_side_pt: 20.0,
        header_height_pt: 26.0,
        footer_height_pt: 14.0,
        column_gutter_pt: 14.0,
        title_font_size: 11.0,
        accent: Rgb(0.3, 0.3, 0.3),
        text: Rgb::BLACK,
        label_style: LabelStyle::Plain,
        header_style: HeaderStyle::Minimal,
        divider_width: 0.5,
    },
    Skin {
        name: "elegant",
        margin_top_pt: 34.0,
        margin_bottom_pt: 30.0,
        margin_side_pt: 36.0,
        header_height_pt: 54.0,
        footer_height_pt: 22.0,
        column_gutter_pt: 24.0,
        title_font_size: 15.0,
        accent: Rgb(0.55, 0.42, 0.2),
        text: Rgb(0.15, 0.12, 0.1),
        label_style: LabelStyle::Circled,
        header_style: HeaderStyle::Ruled,
        divider_width: 0.4,
    },
    Skin {
        name: "exam",
        margin_top_pt: 24.0,
        margin_bottom_pt: 24.0,
        margin_side_pt: 28.0,
        header_height_pt: 70.0,
        footer_height_pt: 20.0,
        column_gutter_pt: 20.0,
        title_font_size: 13.0,
        accent: Rgb(0.75, 0.1, 0.1),
        text: Rgb::BLACK,
        label_style: LabelStyle::Boxed,
        header_style: HeaderStyle::ExamForm,
        divider_width: 1.0,
    },
    Skin {
        name: "osym",
        margin_top_pt: 22.0,
        margin_bottom_pt: 22.0,
        margin_side_pt: 26.0,
        header_height_pt: 64.0,
        footer_height_pt: 20.0,
        column_gutter_pt: 18.0,
        title_font_size: 12.0,
        accent: Rgb(0.1, 0.1, 0.1),
        text: Rgb::BLACK,
        label_style: LabelStyle::Plain,
        header_style: HeaderStyle::Booklet,
        divider_width: 1.2,
    },
];

/// Page regions in PDF points (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub content_left: f32,
    pub content_right: f32,
    /// Top edge of the question area, below the header
    pub content_top: f32,
    /// Bottom edge of the question area, above the footer
    pub content_bottom: f32,
    /// Top edge of the header band
    pub header_top: f32,
    pub col_width_single: f32,
    pub col_width_double: f32,
    pub gutter: f32,
}

impl PageGeometry {
    pub fn a4(skin: &Skin) -> Self {
        Self::new(A4_WIDTH_PT, A4_HEIGHT_PT, skin)
    }

    pub fn new(page_width: f32, page_height: f32, skin: &Skin) -> Self {
        let content_left = skin.margin_side_pt;
        let content_right = page_width - skin.margin_side_pt;
        let content_width = content_right - content_left;
        let header_top = page_height - skin.margin_top_pt;

        Self {
            page_width,
            page_height,
            content_left,
            content_right,
            content_top: header_top - skin.header_height_pt,
            content_bottom: skin.margin_bottom_pt + skin.footer_height_pt,
            header_top,
            col_width_single: content_width,
            col_width_double: (content_width - skin.column_gutter_pt) / 2.0,
            gutter: skin.column_gutter_pt,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.content_right - self.content_left
    }

    pub fn usable_height(&self) -> f32 {
        self.content_top - self.content_bottom
    }

    pub fn column_width(&self, columns: ColumnCount) -> f32 {
        match columns {
            ColumnCount::One => self.col_width_single,
            ColumnCount::Two => self.col_width_double,
        }
    }

    /// Left edge of a column
    pub fn column_x(&self, columns: ColumnCount, column: Column) -> f32 {
        match (columns, column) {
            (ColumnCount::Two, Column::Right) => {
                self.content_left + self.col_width_double + self.gutter
            }
            _ => self.content_left,
        }
    }

    /// x of the divider between the two columns
    pub fn divider_x(&self) -> f32 {
        self.content_left + self.col_width_double + self.gutter / 2.0
    }
}
