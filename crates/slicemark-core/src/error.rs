use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlicemarkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid layer name: {0}")]
    InvalidName(String),

    #[error("Layer name already in use: {0}")]
    DuplicateName(String),

    #[error("No layer named: {0}")]
    UnknownLayer(String),

    #[error("No base image loaded")]
    MissingBaseImage,

    #[error("Layer file not found: {}", .0.display())]
    LayerFileNotFound(PathBuf),

    #[error("Workspace metadata error: {0}")]
    MetadataParse(String),

    #[error("Image codec error: {0}")]
    Codec(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pixel spacing must be positive, got {0} x {1}")]
    InvalidSpacing(f64, f64),

    #[error("Window width must be positive, got {0}")]
    InvalidWindow(f64),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, SlicemarkError>;
