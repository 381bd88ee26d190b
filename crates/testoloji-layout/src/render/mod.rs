//! PDF rendering of paginated questions
//!
//! - Encoding question images as image XObjects
//! - Drawing headers, labels, bubbles and footers per template skin
//! - Assembling pages, fonts and the answer key into a document

mod document;
mod images;
mod page;
mod shapes;
mod text;

pub use document::{render_document, render_pdf, save_pdf};
pub use images::{EmbeddedImage, ImageStore, load_images};
pub use page::{AnswerKeyPlacement, PageContent, PageRenderer, WATERMARK_GSTATE};
pub use text::pdf_string;
