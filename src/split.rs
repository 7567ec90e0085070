//! Size-bounded splitting.
//!
//! Each page's size is estimated by saving it alone to a throwaway file.
//! The estimate over-counts shared resources and per-document overhead, so
//! the budget is approximate; a page larger than the budget still gets a
//! part of its own.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::mem;
use std::path::{Path, PathBuf};

use lopdf::Document;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::pages::PageExtractor;

/// Pages accumulated for one output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    pub pages: Vec<u32>,
    pub estimated_bytes: u64,
}

impl Part {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Greedy accumulation of pages into parts.
#[derive(Debug)]
pub struct PartBuilder {
    max_bytes: u64,
    current: Part,
}

impl PartBuilder {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            current: Part::default(),
        }
    }

    /// Add a page. Returns the previous part if this page did not fit in it.
    pub fn push(&mut self, page: u32, estimated_bytes: u64) -> Option<Part> {
        let overflows = self
            .current
            .estimated_bytes
            .saturating_add(estimated_bytes)
            > self.max_bytes;
        let sealed = if !self.current.is_empty() && overflows {
            Some(mem::take(&mut self.current))
        } else {
            None
        };

        self.current.pages.push(page);
        self.current.estimated_bytes = self.current.estimated_bytes.saturating_add(estimated_bytes);
        sealed
    }

    /// The last part, if it holds any pages.
    pub fn finish(self) -> Option<Part> {
        (!self.current.is_empty()).then_some(self.current)
    }
}

/// `input` without its extension, e.g. `scans/report.pdf` -> `scans/report`.
pub fn default_prefix(input: &Path) -> PathBuf {
    input.with_extension("")
}

/// `{prefix}_part{n}.pdf`
pub fn part_path(prefix: &Path, n: usize) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("_part{n}.pdf"));
    PathBuf::from(name)
}

/// Split `input` into files of roughly at most `max_part_size` bytes.
///
/// Returns `[input]` untouched when the file already fits. Otherwise returns
/// the written part paths in page order. Parts sealed before a failure stay
/// on disk.
pub fn split(input: &Path, max_part_size: u64, prefix: Option<&Path>) -> Result<Vec<PathBuf>> {
    if max_part_size == 0 {
        return Err(Error::InvalidPartSize);
    }
    let prefix = prefix.map_or_else(|| default_prefix(input), Path::to_path_buf);

    let input_size = fs::metadata(input)?.len();
    if input_size <= max_part_size {
        log::info!("Input PDF is smaller than specified size. No splitting needed.");
        return Ok(vec![input.to_path_buf()]);
    }

    let doc = Document::load(input)?;
    let extractor = PageExtractor::new(&doc);
    let pages = extractor.page_numbers();
    log::info!(
        "Splitting {} pages ({} bytes) into parts of at most {} bytes",
        pages.len(),
        input_size,
        max_part_size
    );

    let mut builder = PartBuilder::new(max_part_size);
    let mut written = Vec::new();

    for page in pages {
        let estimate = estimate_page_size(&extractor, page)?;
        log::debug!("Page {page}: ~{estimate} bytes");

        if let Some(part) = builder.push(page, estimate) {
            written.push(write_part(&extractor, &part, &prefix, written.len() + 1)?);
        }
    }
    if let Some(part) = builder.finish() {
        written.push(write_part(&extractor, &part, &prefix, written.len() + 1)?);
    }

    Ok(written)
}

fn estimate_page_size(extractor: &PageExtractor, page: u32) -> Result<u64> {
    let mut single = extractor.extract(&[page]);
    let mut scratch = NamedTempFile::new()?;
    single.save_to(&mut scratch)?;
    scratch.flush()?;
    Ok(scratch.as_file().metadata()?.len())
}

fn write_part(extractor: &PageExtractor, part: &Part, prefix: &Path, n: usize) -> Result<PathBuf> {
    let path = part_path(prefix, n);
    let mut out = extractor.extract(&part.pages);
    out.save(&path)?;
    log::info!(
        "Wrote {} (pages {}-{}, ~{} bytes)",
        path.display(),
        part.pages.first().copied().unwrap_or_default(),
        part.pages.last().copied().unwrap_or_default(),
        part.estimated_bytes
    );
    Ok(path)
}
