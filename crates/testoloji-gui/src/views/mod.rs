pub mod crop;
pub mod layout;

pub use crop::{CropViewState, show_crop};
pub use layout::{LayoutViewState, show_layout};
