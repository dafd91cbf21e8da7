use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Scratch file path guard with automatic cleanup
///
/// The file may or may not exist while the guard is alive. Dropping the guard
/// removes it best-effort; call `remove` to observe the deletion result.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cleanup_on_drop: true,
        }
    }

    /// Write the whole payload, creating or truncating the file
    ///
    /// Returns the number of bytes handed to the OS.
    pub fn write_all(&self, payload: &[u8]) -> io::Result<u64> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(payload)?;
        file.flush()?;
        Ok(payload.len() as u64)
    }

    /// Read the whole file into memory
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        let mut contents = Vec::with_capacity(file.metadata().map(|m| m.len() as usize).unwrap_or(0));
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Delete the file now
    ///
    /// A file that was never created counts as removed.
    pub fn remove(mut self) -> io::Result<()> {
        self.cleanup_on_drop = false;
        remove_if_present(&self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            let _ = remove_if_present(&self.path);
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
