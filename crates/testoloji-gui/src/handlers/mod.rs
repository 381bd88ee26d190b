pub mod crop;
pub mod layout;
pub mod pages;
