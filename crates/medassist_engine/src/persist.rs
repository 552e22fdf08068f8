use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("not a plain file name: {0:?}")]
    FileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Saves an exported summary as `{dir}/{filename}`.
///
/// The bytes are staged in a hidden temp file inside `dir` and renamed over
/// the target, so the download directory holds either the previous summary
/// or the complete new one. A failed save drops the staged file.
pub(crate) fn save_document(
    dir: &Path,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, PersistError> {
    if !is_plain_file_name(filename) {
        return Err(PersistError::FileName(filename.to_string()));
    }
    prepare_download_dir(dir)?;

    let target = dir.join(filename);
    let mut staged = Builder::new()
        .prefix(".medassist-")
        .suffix(".part")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged
        .persist(&target)
        .map_err(|err| PersistError::Io(err.error))?;
    Ok(target)
}

fn prepare_download_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::OutputDir(format!(
            "{} is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))
        }
        Err(err) => Err(PersistError::OutputDir(err.to_string())),
    }
}

fn is_plain_file_name(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
