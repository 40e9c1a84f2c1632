use crate::error::{Error, Result};
use crate::share::RawBatch;
use anyhow::Context;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where one batch document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    File(PathBuf),
    Stdin,
}

impl fmt::Display for BatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSource::File(path) => write!(f, "{}", path.display()),
            BatchSource::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// Read and parse one batch document.
pub fn read_batch(source: &BatchSource) -> Result<RawBatch> {
    let data = match source {
        BatchSource::File(path) => fs::read(path).map_err(|source| Error::SourceUnreadable {
            path: path.clone(),
            source,
        })?,
        BatchSource::Stdin => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|source| Error::SourceUnreadable {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        }
    };
    RawBatch::from_slice(&data)
}

/// Discover all *.json files in a directory, returning sorted paths.
pub fn discover_batches(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("{:?} is not a directory", dir);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read directory {:?}", dir))?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json"))
                .then_some(path)
        })
        .collect();

    paths.sort();
    Ok(paths)
}
