pub mod import;
pub mod info;
pub mod render;
