//! Compress PDFs through Ghostscript, or split them into parts that each stay
//! under a byte budget.

pub mod compress;
pub mod error;
pub mod ghostscript;
pub mod pages;
pub mod quality;
pub mod split;

pub use compress::{compress, Compressor};
pub use error::{Error, Result};
pub use ghostscript::Ghostscript;
pub use quality::{preset_for, resolve, Preset, QualityProfile, QUALITY_NAMES};
pub use split::{split, Part, PartBuilder};
