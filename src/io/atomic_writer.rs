use crate::{error::MapGwasError, utils::util::Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Creates `dir` (and parents) if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| MapGwasError::OutputNotWritable {
        path: dir.to_path_buf(),
        source,
    })
}

/// Output rendered into a temporary sibling of `target`, not yet visible.
///
/// Dropping a staged file without [`StagedFile::commit`] removes it.
#[derive(Debug)]
pub struct StagedFile {
    temp_file: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the staged file into place.
    pub fn commit(self) -> Result<PathBuf> {
        self.temp_file.persist(&self.target)?;
        log::debug!("Wrote {}", self.target.display());
        Ok(self.target)
    }
}

/// Renders `target`'s contents into a temporary file in the same directory.
pub fn stage<F>(target: &Path, write: F) -> Result<StagedFile>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::Builder::new()
        .prefix(".mapgwas-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| MapGwasError::OutputNotWritable {
            path: dir.to_path_buf(),
            source,
        })?;

    {
        let mut writer = BufWriter::new(&mut temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    Ok(StagedFile {
        temp_file,
        target: target.to_path_buf(),
    })
}

/// Commits every staged file, in order.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    staged.into_iter().map(StagedFile::commit).collect()
}
