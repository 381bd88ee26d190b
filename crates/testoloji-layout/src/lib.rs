pub mod constants;
mod answer_key;
#[cfg(feature = "serde")]
mod manifest;
mod options;
mod paginate;
pub mod render;
mod skin;
mod stats;
mod types;

pub use answer_key::{AnswerKeyEntry, answer_key, save_answer_key_csv, write_answer_key_csv};
#[cfg(feature = "serde")]
pub use manifest::QuestionManifest;
pub use options::*;
pub use paginate::*;
pub use render::{ImageStore, load_images, render_document, render_pdf, save_pdf};
pub use skin::*;
pub use stats::{LayoutStatistics, calculate_statistics};
pub use types::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No questions to lay out")]
    NoQuestions,
}

pub type Result<T> = std::result::Result<T, LayoutError>;
