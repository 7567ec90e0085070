//! Ghostscript invocation.
//!
//! The engine is run as a blocking child process with a fixed argument
//! vector. There is no timeout: a hung `gs` blocks the caller.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::quality::Preset;

pub const DEFAULT_PROGRAM: &str = "gs";

#[derive(Debug, Clone)]
pub struct Ghostscript {
    program: PathBuf,
}

impl Default for Ghostscript {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Ghostscript {
    /// `program` is either a bare name searched on `PATH` or a path to the
    /// executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the executable, failing with `MissingDependency` if absent.
    pub fn locate(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|e| {
            log::debug!("{} lookup failed: {e}", self.program.display());
            Error::MissingDependency(self.program.clone())
        })
    }

    /// Re-encode `input` into `output` using `preset`.
    pub fn run(&self, input: &Path, output: &Path, preset: Preset) -> Result<()> {
        let executable = self.locate()?;
        let args = pdfwrite_args(input, output, preset);
        log::debug!("Running {} {:?}", executable.display(), args);

        let result = Command::new(&executable).args(&args).output()?;
        if !result.stdout.is_empty() {
            log::debug!("gs stdout: {}", String::from_utf8_lossy(&result.stdout).trim());
        }

        if result.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(Error::ExternalTool(format!(
                "{} exited with {}: {}",
                executable.display(),
                result
                    .status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| format!("status {c}")),
                stderr.trim()
            )))
        }
    }
}

/// Arguments for a `pdfwrite` pass at compatibility level 1.4.
pub fn pdfwrite_args(input: &Path, output: &Path, preset: Preset) -> Vec<OsString> {
    let mut output_flag = OsString::from("-sOutputFile=");
    output_flag.push(output);

    vec![
        "-sFONTPATH=/tmp".into(),
        "-sDEVICE=pdfwrite".into(),
        "-dCompatibilityLevel=1.4".into(),
        format!("-dPDFSETTINGS=/{preset}").into(),
        "-dNOPAUSE".into(),
        "-dQUIET".into(),
        "-dBATCH".into(),
        output_flag,
        input.as_os_str().to_owned(),
    ]
}
