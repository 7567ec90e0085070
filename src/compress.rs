use std::path::{Path, PathBuf};

use lopdf::Document;
use tempfile::TempDir;

use crate::error::Result;
use crate::ghostscript::Ghostscript;
use crate::pages::PageExtractor;
use crate::quality::{self, QualityProfile};

const SCRATCH_PREFIX: &str = "pdf-slim-";
const INTERMEDIATE_NAME: &str = "intermediate.pdf";

/// Rebuilds a PDF through lopdf, then hands it to Ghostscript for the actual
/// size reduction.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    engine: Ghostscript,
    scratch_root: Option<PathBuf>,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: Ghostscript) -> Self {
        self.engine = engine;
        self
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Compress `input` into `output` at the named quality level.
    ///
    /// The quality name is checked before anything touches the filesystem.
    /// The scratch directory holding the intermediate document is removed
    /// whether or not Ghostscript succeeds.
    pub fn compress(&self, input: &Path, output: &Path, quality: &str) -> Result<()> {
        let profile = quality::resolve(quality)?;

        let scratch = self.scratch_dir()?;
        log::debug!("Scratch directory: {}", scratch.path().display());

        let outcome = self.compress_in(scratch.path(), input, output, profile);
        let cleanup = scratch.close();
        outcome?;
        cleanup?;
        Ok(())
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn compress_in(
        &self,
        scratch: &Path,
        input: &Path,
        output: &Path,
        profile: QualityProfile,
    ) -> Result<()> {
        let source = Document::load(input)?;
        let extractor = PageExtractor::new(&source);
        let mut rebuilt = extractor.extract(&extractor.page_numbers());

        let intermediate = scratch.join(INTERMEDIATE_NAME);
        rebuilt.save(&intermediate)?;
        log::debug!(
            "Rebuilt {} pages into {}",
            rebuilt.get_pages().len(),
            intermediate.display()
        );

        let preset = profile.preset();
        log::info!(
            "Compressing with {} quality ({} dpi, {}%) using preset /{}",
            profile.name,
            profile.target_dpi,
            profile.target_quality_percent,
            preset
        );
        self.engine.run(&intermediate, output, preset)
    }
}

/// Compress with the default engine (`gs` on `PATH`).
pub fn compress(input: &Path, output: &Path, quality: &str) -> Result<()> {
    Compressor::new().compress(input, output, quality)
}
