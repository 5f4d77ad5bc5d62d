use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info};

use super::Enumerator;
use crate::config::Config;
use crate::error::{Error, Result};

/// Runs a separately compiled enumerator (`sbtest`) as a child process:
/// `<program> <input> <output> <sizes>` with `working_dir` as its current
/// directory.
#[derive(Debug, Clone)]
pub struct ExternalEnumerator {
    working_dir: PathBuf,
    program: String,
}

impl ExternalEnumerator {
    pub fn new(working_dir: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            program: program.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sbtest_dir.clone(), config.executable.clone())
    }

    /// A relative program with a directory part (e.g. `./sbtest`) is meant
    /// relative to the working directory; bare names go through `PATH`.
    fn resolved_program(&self) -> PathBuf {
        let program = Path::new(&self.program);
        if program.is_relative() && program.components().count() > 1 {
            self.working_dir.join(program)
        } else {
            program.to_path_buf()
        }
    }
}

/// The child runs in another directory, so relative file arguments are
/// anchored at our own working directory first.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(Error::io(path))?;
    Ok(cwd.join(path))
}

impl Enumerator for ExternalEnumerator {
    fn name(&self) -> &str {
        &self.program
    }

    fn enumerate(&self, input: &Path, output: &Path, sizes: &Path) -> Result<()> {
        let program = self.resolved_program();

        let mut command = Command::new(&program);
        command
            .arg(absolute(input)?)
            .arg(absolute(output)?)
            .arg(absolute(sizes)?)
            .current_dir(&self.working_dir);

        info!("Running {command:?} in {:?}", self.working_dir);

        let result = command.output().map_err(|source| Error::ProcedureLaunch {
            program: program.display().to_string(),
            source,
        })?;

        for line in String::from_utf8_lossy(&result.stdout).lines() {
            debug!("[{}] {line}", self.program);
        }

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            error!("{} failed with {}: {stderr}", self.program, result.status);
            return Err(Error::ProcedureFailed {
                program: program.display().to_string(),
                status: result.status,
                stderr,
            });
        }

        Ok(())
    }
}
