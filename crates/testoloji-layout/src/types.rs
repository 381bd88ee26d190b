use crate::constants::{DEFAULT_IMAGE_HEIGHT_PX, DEFAULT_IMAGE_WIDTH_PX};
use crate::{LayoutError, Result};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a question
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answer choice of a multiple-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
    E,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 5] = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
        AnswerLetter::E,
    ];

    pub fn as_char(self) -> char {
        match self {
            AnswerLetter::A => 'A',
            AnswerLetter::B => 'B',
            AnswerLetter::C => 'C',
            AnswerLetter::D => 'D',
            AnswerLetter::E => 'E',
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for AnswerLetter {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AnswerLetter::A),
            "B" => Ok(AnswerLetter::B),
            "C" => Ok(AnswerLetter::C),
            "D" => Ok(AnswerLetter::D),
            "E" => Ok(AnswerLetter::E),
            other => Err(LayoutError::InvalidValue(format!(
                "Answer must be one of A-E, got '{other}'"
            ))),
        }
    }
}

/// Difficulty score between 1 and 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LayoutError::InvalidValue(format!(
                "Difficulty must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self> {
        Difficulty::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Difficulty {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| LayoutError::InvalidValue(format!("Difficulty '{s}' is not a number")))?;
        Difficulty::new(value)
    }
}

/// A single exam question: an image plus its metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    pub id: QuestionId,
    /// Path or URL of the question image
    pub image: String,
    /// Intrinsic image width in pixels
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub width: Option<u32>,
    /// Intrinsic image height in pixels
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub height: Option<u32>,
    /// Spacing below this question, overriding the document default
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub bottom_spacing_mm: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub difficulty: Option<Difficulty>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub correct_answer: Option<AnswerLetter>,
    /// Groups questions into numbered tests within one document
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub project_index: Option<u32>,
}

impl Question {
    pub fn new(id: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(id),
            image: image.into(),
            width: None,
            height: None,
            bottom_spacing_mm: None,
            difficulty: None,
            correct_answer: None,
            project_index: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_spacing(mut self, bottom_spacing_mm: f32) -> Self {
        self.bottom_spacing_mm = Some(bottom_spacing_mm);
        self
    }

    pub fn with_answer(mut self, answer: AnswerLetter) -> Self {
        self.correct_answer = Some(answer);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_project(mut self, project_index: u32) -> Self {
        self.project_index = Some(project_index);
        self
    }

    /// Intrinsic size in pixels, falling back to 800x600 when unknown
    pub fn intrinsic_size(&self) -> (f32, f32) {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w as f32, h as f32),
            _ => (DEFAULT_IMAGE_WIDTH_PX, DEFAULT_IMAGE_HEIGHT_PX),
        }
    }

    pub fn has_dimensions(&self) -> bool {
        matches!((self.width, self.height), (Some(w), Some(h)) if w > 0 && h > 0)
    }
}

/// Number of question columns per page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum ColumnCount {
    One,
    #[default]
    Two,
}

impl ColumnCount {
    pub fn count(self) -> usize {
        match self {
            ColumnCount::One => 1,
            ColumnCount::Two => 2,
        }
    }
}

impl TryFrom<u8> for ColumnCount {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(ColumnCount::One),
            2 => Ok(ColumnCount::Two),
            n => Err(LayoutError::InvalidValue(format!(
                "Column count must be 1 or 2, got {n}"
            ))),
        }
    }
}

impl From<ColumnCount> for u8 {
    fn from(c: ColumnCount) -> u8 {
        c.count() as u8
    }
}
