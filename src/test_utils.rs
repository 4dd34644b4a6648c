//! Test utilities: temporary directories, an in-memory filesystem and a
//! sink that records what would have been printed.
//!
//! This module is only compiled for tests and benchmarks.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::Level;

use crate::output::{OutputSink, Role};
use crate::tree::{EntryKind, FsAccess};

const DEFAULT_DIR_MODE: u32 = 0o040755;
const DEFAULT_FILE_MODE: u32 = 0o100644;

/// A temporary directory for testing, removed when dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create a directory and any missing parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
enum Node {
    Dir {
        children: Vec<OsString>,
        mode: u32,
        denied: bool,
    },
    File {
        size: u64,
        mode: u32,
        regular: bool,
        broken: bool,
    },
    /// Symlink whose target is missing: nothing can be stat'ed
    Dangling,
}

/// In-memory filesystem. Children are listed in insertion order, which
/// lets tests pin the listing order a real filesystem leaves open.
///
/// Paths are absolute strings; a parent must be added before its children.
#[derive(Debug, Clone)]
pub struct MemoryFs {
    nodes: HashMap<PathBuf, Node>,
}

impl MemoryFs {
    pub fn new(root: &str) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            PathBuf::from(root),
            Node::Dir {
                children: Vec::new(),
                mode: DEFAULT_DIR_MODE,
                denied: false,
            },
        );
        Self { nodes }
    }

    pub fn dir(self, path: &str) -> Self {
        self.insert(
            path,
            Node::Dir {
                children: Vec::new(),
                mode: DEFAULT_DIR_MODE,
                denied: false,
            },
        )
    }

    pub fn file(self, path: &str, size: u64) -> Self {
        self.insert(
            path,
            Node::File {
                size,
                mode: DEFAULT_FILE_MODE,
                regular: true,
                broken: false,
            },
        )
    }

    /// A regular file whose size and mode cannot be read.
    pub fn broken_file(self, path: &str) -> Self {
        self.insert(
            path,
            Node::File {
                size: 0,
                mode: DEFAULT_FILE_MODE,
                regular: true,
                broken: true,
            },
        )
    }

    /// A non-regular, non-directory entry such as a FIFO or socket.
    pub fn special_file(self, path: &str, mode: u32) -> Self {
        self.insert(
            path,
            Node::File {
                size: 0,
                mode,
                regular: false,
                broken: false,
            },
        )
    }

    /// A symlink pointing nowhere.
    pub fn dangling(self, path: &str) -> Self {
        self.insert(path, Node::Dangling)
    }

    /// A directory whose listing fails with `PermissionDenied`.
    pub fn denied_dir(self, path: &str) -> Self {
        self.dir(path).deny(path)
    }

    /// Make an existing directory unlistable.
    pub fn deny(mut self, path: &str) -> Self {
        match self.nodes.get_mut(Path::new(path)) {
            Some(Node::Dir { denied, .. }) => *denied = true,
            _ => panic!("{} is not a directory", path),
        }
        self
    }

    pub fn with_mode(mut self, path: &str, new_mode: u32) -> Self {
        match self.nodes.get_mut(Path::new(path)) {
            Some(Node::Dir { mode, .. }) | Some(Node::File { mode, .. }) => *mode = new_mode,
            _ => panic!("{} has no mode to set", path),
        }
        self
    }

    fn insert(mut self, path: &str, node: Node) -> Self {
        let path = PathBuf::from(path);
        let parent = path.parent().expect("path has a parent");
        let name = path.file_name().expect("path has a file name").to_os_string();
        match self.nodes.get_mut(parent) {
            Some(Node::Dir { children, .. }) => children.push(name),
            _ => panic!("parent of {} is not a directory", path.display()),
        }
        self.nodes.insert(path, node);
        self
    }

    fn node(&self, path: &Path) -> io::Result<&Node> {
        self.nodes
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such entry"))
    }
}

fn broken_error() -> io::Error {
    io::Error::other("metadata unavailable")
}

impl FsAccess for MemoryFs {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        match self.node(path)? {
            Node::Dir { denied: true, .. } => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            )),
            Node::Dir { children, .. } => Ok(children.clone()),
            Node::File { .. } | Node::Dangling => Err(io::Error::other("not a directory")),
        }
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        match self.node(path)? {
            Node::Dir { .. } => Ok(EntryKind::Dir),
            Node::File { .. } => Ok(EntryKind::File),
            Node::Dangling => Err(broken_error()),
        }
    }

    fn is_regular_file(&self, path: &Path) -> bool {
        matches!(self.nodes.get(path), Some(Node::File { regular: true, .. }))
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        match self.node(path)? {
            Node::Dir { .. } => Ok(4096),
            Node::File { broken: true, .. } | Node::Dangling => Err(broken_error()),
            Node::File { size, .. } => Ok(*size),
        }
    }

    fn mode(&self, path: &Path) -> io::Result<u32> {
        match self.node(path)? {
            Node::Dir { mode, .. } => Ok(*mode),
            Node::File { broken: true, .. } | Node::Dangling => Err(broken_error()),
            Node::File { mode, .. } => Ok(*mode),
        }
    }
}

/// Sink that keeps every line instead of printing it.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Every emitted line with its role, reported lines included
    pub lines: Vec<(String, Role)>,
    /// Lines that were also sent to the log
    pub reported: Vec<(String, Level)>,
    pub finished: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|(text, _)| text.clone()).collect()
    }
}

impl OutputSink for RecordingSink {
    fn emit(&mut self, line: &str, role: Role) -> io::Result<()> {
        self.lines.push((line.to_string(), role));
        Ok(())
    }

    fn report(&mut self, line: &str, role: Role, level: Level) -> io::Result<()> {
        self.emit(line, role)?;
        self.reported.push((line.to_string(), level));
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}
