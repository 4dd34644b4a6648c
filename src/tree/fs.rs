//! Filesystem access used by the renderer

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

/// What an entry is, as far as the tree is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// Read-only view of a filesystem. All lookups follow symlinks.
pub trait FsAccess {
    /// List entry names in the order the filesystem returns them.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    fn kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Size of a file in bytes.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Raw `st_mode` bits, file type included.
    fn mode(&self, path: &Path) -> io::Result<u32>;

    /// True only for regular files. FIFOs, sockets, devices and dangling
    /// symlinks are files in the tree but have no meaningful size.
    fn is_regular_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.kind(path), Ok(EntryKind::Dir))
    }
}

/// Collect listing items, logging and dropping the ones that fail.
pub fn keep_readable<T, I>(directory: &Path, items: I) -> Vec<T>
where
    I: IntoIterator<Item = io::Result<T>>,
{
    items
        .into_iter()
        .filter_map(|item| match item {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", directory.display(), e);
                None
            }
        })
        .collect()
}

/// The real filesystem, through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FsAccess for LocalFs {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let entries = fs::read_dir(path)?.map(|e| e.map(|e| e.file_name()));
        Ok(keep_readable(path, entries))
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = fs::metadata(path)?;
        Ok(if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        })
    }

    fn is_regular_file(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|m| m.is_file())
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    #[cfg(unix)]
    fn mode(&self, path: &Path) -> io::Result<u32> {
        use std::os::unix::fs::MetadataExt;
        Ok(fs::metadata(path)?.mode())
    }

    #[cfg(not(unix))]
    fn mode(&self, path: &Path) -> io::Result<u32> {
        // No mode bits here: synthesize them from the type and read-only flag
        let meta = fs::metadata(path)?;
        let kind = if meta.is_dir() { 0o040000 } else { 0o100000 };
        let perms = if meta.permissions().readonly() { 0o555 } else { 0o777 };
        Ok(kind | perms)
    }
}
