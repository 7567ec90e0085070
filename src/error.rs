use std::path::PathBuf;

use thiserror::Error;

use crate::quality::QUALITY_NAMES;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid quality level '{0}'. Choose from {names:?}", names = QUALITY_NAMES)]
    InvalidQuality(String),

    #[error("Maximum part size must be greater than zero")]
    InvalidPartSize,

    #[error("Ghostscript ({}) not found. Please install it first.", .0.display())]
    MissingDependency(PathBuf),

    #[error("Ghostscript compression failed: {0}")]
    ExternalTool(String),

    #[error("Input file '{}' not found.", .0.display())]
    InputNotFound(PathBuf),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
