pub mod error;
pub mod image;
pub mod view;
pub mod mask;
pub mod layer;
pub mod store;
pub mod paint;
pub mod render;
pub mod io;
pub mod session;
pub mod workspace;
