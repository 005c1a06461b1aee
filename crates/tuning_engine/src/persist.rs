use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use engine_logging::engine_info;
use thiserror::Error;

use crate::extract::CodeBlock;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("parent directory of {0} does not exist")]
    MissingParent(PathBuf),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes code block bodies below an output root.
#[derive(Debug, Clone)]
pub struct Materializer {
    root: PathBuf,
}

impl Materializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `block` minus its first line to `{root}/{destination}`, creating or
    /// truncating the file. Parent directories are never created.
    pub fn materialize(
        &self,
        destination: &str,
        block: &CodeBlock,
    ) -> Result<(PathBuf, u64), PersistError> {
        let target = self.root.join(destination);
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(PersistError::MissingParent(target));
            }
        }

        let body = block.body();
        let io_err = |source: io::Error| PersistError::Io {
            path: target.clone(),
            source,
        };
        let file = File::create(&target).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(body.as_bytes()).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        engine_info!("wrote {} ({} bytes)", target.display(), body.len());
        Ok((target, body.len() as u64))
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(".")
    }
}
