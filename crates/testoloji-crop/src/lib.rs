//! Cropping questions out of rendered exam pages
//!
//! A [`CropSession`] turns pointer input over a page raster into a queue of
//! [`PendingQuestion`]s in source pixels, with optional magnet snapping and
//! region detection, and hands the queue to a [`QuestionUploader`].

mod detect;
mod geometry;
mod options;
mod queue;
mod session;
mod snap;
mod upload;

pub use detect::{DetectError, RectDetector, WhitespaceDetector};
pub use geometry::*;
pub use options::*;
pub use queue::{PendingId, PendingQueue, PendingQuestion};
pub use session::*;
pub use snap::snap_to_content;
#[cfg(feature = "serde")]
pub use upload::DirectoryUploader;
pub use upload::QuestionUploader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("No page is open")]
    NoPage,
    #[error("Nothing is selected")]
    NoSelection,
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Detection error: {0}")]
    Detect(#[from] DetectError),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CropError>;
