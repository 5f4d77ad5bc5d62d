//! The three files exchanged with the enumerator, owned by a single computation.
//!
//! Files are removed when the [`TransientFiles`] value is dropped, on success
//! and on every error path alike, unless retention was requested.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct TransientFiles {
    input: PathBuf,
    output: PathBuf,
    sizes: PathBuf,
    keep: bool,
}

impl TransientFiles {
    /// Creates (or truncates) the input, output and sizes files. Paths not set
    /// explicitly in `config` become fresh files in the temp directory, named
    /// after `run_id`.
    pub fn create(config: &Config, run_id: Uuid) -> Result<Self> {
        let temp_dir = config
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);

        let make = |explicit: &Option<PathBuf>, suffix: &str| -> Result<PathBuf> {
            match explicit {
                Some(path) => {
                    std::fs::File::create(path).map_err(Error::io(path))?;
                    Ok(path.clone())
                }
                None => tempfile::Builder::new()
                    .prefix(&format!("bicliques-{run_id}-"))
                    .suffix(suffix)
                    .tempfile_in(&temp_dir)
                    .map_err(Error::io(&temp_dir))?
                    .into_temp_path()
                    .keep()
                    .map_err(|e| Error::io(&temp_dir)(e.error)),
            }
        };

        // construct incrementally so already created files get cleaned up if a
        // later one fails
        let mut files = Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            sizes: PathBuf::new(),
            keep: config.store_temps,
        };

        files.input = make(&config.input_path, ".edges")?;
        files.output = make(&config.output_path, ".bicliques")?;
        files.sizes = make(&config.sizes_path, ".sizes")?;

        debug!(
            "Transient files: input={:?} output={:?} sizes={:?}",
            files.input, files.output, files.sizes
        );

        Ok(files)
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn sizes(&self) -> &Path {
        &self.sizes
    }

    pub fn keeps_files(&self) -> bool {
        self.keep
    }

    /// Disarms the cleanup and hands the paths to the caller.
    pub fn into_paths(mut self) -> [PathBuf; 3] {
        self.keep = true;
        [
            std::mem::take(&mut self.input),
            std::mem::take(&mut self.output),
            std::mem::take(&mut self.sizes),
        ]
    }
}

impl Drop for TransientFiles {
    fn drop(&mut self) {
        if self.keep {
            if !self.input.as_os_str().is_empty() {
                info!(
                    "Keeping transient files: input={:?} output={:?} sizes={:?}",
                    self.input, self.output, self.sizes
                );
            }
            return;
        }

        for path in [&self.input, &self.output, &self.sizes] {
            if path.as_os_str().is_empty() {
                continue;
            }

            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove transient file {path:?}: {e}"),
            }
        }
    }
}
