//! TreeRenderer - walks a directory and prints one line per entry

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::vec;

use tracing::{Level, debug, error, info, warn};

use crate::error::TwigError;
use crate::output::{OutputSink, Role};

use super::config::{RenderConfig, TraversalContext};
use super::fs::{EntryKind, FsAccess};
use super::utils::{LAST_BRANCH, connector, format_mode, human_readable_size};

/// Marker printed in place of a directory's contents when it cannot be listed.
pub const PERMISSION_DENIED_MARKER: &str = "[Permission Denied]";

/// A directory entry with whatever the config asked us to show about it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    path: PathBuf,
    kind: EntryKind,
    mode: Option<u32>,
    size: Option<u64>,
}

impl Entry {
    fn display(&self) -> String {
        let mut text = match self.mode {
            Some(mode) => format!("{} {}", format_mode(mode), self.name),
            None => self.name.clone(),
        };
        if let Some(size) = self.size {
            text.push_str(&format!(" ({})", human_readable_size(size)));
        }
        text
    }

    fn role(&self, config: &RenderConfig) -> Role {
        match (config.color, self.kind) {
            (false, _) => Role::Plain,
            (true, EntryKind::Dir) => Role::Directory,
            (true, EntryKind::File) => Role::File,
        }
    }
}

/// One directory level still being printed: the siblings not yet emitted
/// and the context they are printed with.
struct Frame<'c> {
    remaining: vec::IntoIter<Entry>,
    ctx: TraversalContext<'c>,
}

impl Frame<'_> {
    /// Next entry and whether it is the last one of its level.
    fn advance(&mut self) -> Option<(Entry, bool)> {
        let entry = self.remaining.next()?;
        Some((entry, self.remaining.len() == 0))
    }
}

/// Renders a directory subtree through an `OutputSink`.
///
/// The walk is a pre-order depth-first traversal kept on an explicit stack of
/// frames, so deep trees do not grow the call stack. Directories are printed
/// before files at every level, each group in the order the filesystem
/// listed it.
pub struct TreeRenderer<'f, F: FsAccess> {
    fs: &'f F,
}

impl<'f, F: FsAccess> TreeRenderer<'f, F> {
    pub fn new(fs: &'f F) -> Self {
        Self { fs }
    }

    /// Print the contents of `directory`, which the caller has already
    /// checked is a directory. Unreadable subdirectories are reported in
    /// place and skipped; only output failures are returned.
    pub fn render<O: OutputSink>(
        &self,
        directory: &Path,
        ctx: TraversalContext<'_>,
        output: &mut O,
    ) -> io::Result<()> {
        let mut stack = Vec::new();
        if let Some(frame) = self.open(directory, ctx, output)? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some((entry, is_last)) = frame.advance() else {
                stack.pop();
                continue;
            };

            let config = frame.ctx.config();
            let line = format!(
                "{}{}{}",
                frame.ctx.prefix(),
                connector(is_last),
                entry.display()
            );
            output.emit(&line, entry.role(config))?;

            if entry.kind == EntryKind::Dir {
                let child = frame.ctx.child(is_last);
                if let Some(next) = self.open(&entry.path, child, output)? {
                    stack.push(next);
                }
            }
        }

        Ok(())
    }

    /// List a directory and build its frame. Returns `None` when there is
    /// nothing to print below it.
    fn open<'c, O: OutputSink>(
        &self,
        directory: &Path,
        ctx: TraversalContext<'c>,
        output: &mut O,
    ) -> io::Result<Option<Frame<'c>>> {
        if ctx.beyond_limit() {
            return Ok(None);
        }

        debug!("Listing {} at depth {}", directory.display(), ctx.depth());
        let names = match self.fs.list_dir(directory) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                let line = format!(
                    "{}{}{}",
                    ctx.prefix(),
                    LAST_BRANCH,
                    PERMISSION_DENIED_MARKER
                );
                output.emit(&line, Role::Error)?;
                error!("Permission denied: {}", directory.display());
                return Ok(None);
            }
            Err(e) => {
                warn!("Cannot list {}: {}", directory.display(), e);
                return Ok(None);
            }
        };

        if names.is_empty() {
            return Ok(None);
        }

        let entries = self.collect_entries(directory, names, ctx.config());
        Ok(Some(Frame {
            remaining: entries.into_iter(),
            ctx,
        }))
    }

    /// Classify and filter the listing: directories first, then files that
    /// pass the extension filter, both in listing order.
    fn collect_entries(
        &self,
        directory: &Path,
        names: Vec<OsString>,
        config: &RenderConfig,
    ) -> Vec<Entry> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for name in names {
            let path = directory.join(&name);
            let name = name.to_string_lossy().into_owned();
            // Anything we cannot stat (e.g. a dangling symlink) counts as a file
            let kind = self.fs.kind(&path).unwrap_or(EntryKind::File);

            if kind == EntryKind::File && !config.accepts_file(&name) {
                continue;
            }

            let entry = match self.describe(name, path, kind, config) {
                Ok(entry) => entry,
                Err((path, e)) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            match kind {
                EntryKind::Dir => dirs.push(entry),
                EntryKind::File => files.push(entry),
            }
        }

        dirs.extend(files);
        dirs
    }

    /// Read the mode and size the config needs for an entry.
    fn describe(
        &self,
        name: String,
        path: PathBuf,
        kind: EntryKind,
        config: &RenderConfig,
    ) -> Result<Entry, (PathBuf, io::Error)> {
        let mode = if config.show_permissions {
            match self.fs.mode(&path) {
                Ok(mode) => Some(mode),
                Err(e) => return Err((path, e)),
            }
        } else {
            None
        };

        // Only regular files get a size; other non-directories are listed by name
        let size = if config.human_readable
            && kind == EntryKind::File
            && self.fs.is_regular_file(&path)
        {
            match self.fs.size(&path) {
                Ok(size) => Some(size),
                Err(e) => return Err((path, e)),
            }
        } else {
            None
        };

        Ok(Entry {
            name,
            path,
            kind,
            mode,
            size,
        })
    }
}

/// Check that `root` exists and is a directory.
pub fn validate_root<F: FsAccess>(fs: &F, root: &Path) -> Result<(), TwigError> {
    if fs.is_dir(root) {
        Ok(())
    } else {
        Err(TwigError::InvalidRoot {
            path: root.to_path_buf(),
        })
    }
}

/// Validate `root` and print its tree. An invalid root is reported through
/// the sink (and the log) before the error is returned.
pub fn print_tree<F: FsAccess, O: OutputSink>(
    fs: &F,
    root: &Path,
    config: &RenderConfig,
    output: &mut O,
) -> Result<(), TwigError> {
    if let Err(err) = validate_root(fs, root) {
        output.report(
            &format!("Error: '{}' is not a valid directory.", root.display()),
            Role::Error,
            Level::ERROR,
        )?;
        output.finish()?;
        return Err(err);
    }

    info!("Generating tree for {}", root.display());
    TreeRenderer::new(fs).render(root, TraversalContext::root(config), output)?;
    output.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MemoryFs, RecordingSink};

    fn render_lines(fs: &MemoryFs, root: &str, config: &RenderConfig) -> Vec<String> {
        let mut sink = RecordingSink::new();
        TreeRenderer::new(fs)
            .render(Path::new(root), TraversalContext::root(config), &mut sink)
            .unwrap();
        sink.texts()
    }

    #[test]
    fn test_extension_filter_scenario() {
        let fs = MemoryFs::new("/tmp/x")
            .file("/tmp/x/a.txt", 10)
            .file("/tmp/x/b.log", 20)
            .dir("/tmp/x/sub");
        let config = RenderConfig {
            extension_filter: Some(".txt".to_string()),
            ..Default::default()
        };

        assert_eq!(render_lines(&fs, "/tmp/x", &config), vec!["├── sub", "└── a.txt"]);
    }

    #[test]
    fn test_directories_before_files_in_listing_order() {
        let fs = MemoryFs::new("/r")
            .file("/r/z.txt", 1)
            .dir("/r/beta")
            .file("/r/a.txt", 1)
            .dir("/r/alpha");

        assert_eq!(
            render_lines(&fs, "/r", &RenderConfig::default()),
            vec!["├── beta", "├── alpha", "├── z.txt", "└── a.txt"]
        );
    }

    #[test]
    fn test_nested_prefixes() {
        let fs = MemoryFs::new("/r")
            .dir("/r/a")
            .file("/r/a/one", 1)
            .dir("/r/a/inner")
            .file("/r/a/inner/deep", 1)
            .dir("/r/b")
            .file("/r/b/two", 1)
            .file("/r/top", 1);

        assert_eq!(
            render_lines(&fs, "/r", &RenderConfig::default()),
            vec![
                "├── a",
                "│   ├── inner",
                "│   │   └── deep",
                "│   └── one",
                "├── b",
                "│   └── two",
                "└── top",
            ]
        );
    }

    #[test]
    fn test_last_directory_uses_blank_extension() {
        let fs = MemoryFs::new("/r")
            .dir("/r/only")
            .file("/r/only/child", 1);

        assert_eq!(
            render_lines(&fs, "/r", &RenderConfig::default()),
            vec!["└── only", "    └── child"]
        );
    }

    #[test]
    fn test_is_last_counts_filtered_list() {
        // The directory is last once the only file is filtered out
        let fs = MemoryFs::new("/r")
            .dir("/r/sub")
            .file("/r/sub/x.rs", 1)
            .file("/r/notes.md", 1);
        let config = RenderConfig {
            extension_filter: Some(".rs".to_string()),
            ..Default::default()
        };

        assert_eq!(
            render_lines(&fs, "/r", &config),
            vec!["└── sub", "    └── x.rs"]
        );
    }

    #[test]
    fn test_depth_zero_lists_root_children_only() {
        let fs = MemoryFs::new("/r")
            .dir("/r/sub")
            .file("/r/sub/hidden.txt", 1)
            .file("/r/top.txt", 1);
        let config = RenderConfig {
            depth_limit: Some(0),
            ..Default::default()
        };

        assert_eq!(
            render_lines(&fs, "/r", &config),
            vec!["├── sub", "└── top.txt"]
        );
    }

    #[test]
    fn test_depth_one_stops_below_grandchildren() {
        let fs = MemoryFs::new("/r")
            .dir("/r/a")
            .dir("/r/a/b")
            .file("/r/a/b/c.txt", 1);
        let config = RenderConfig {
            depth_limit: Some(1),
            ..Default::default()
        };

        assert_eq!(
            render_lines(&fs, "/r", &config),
            vec!["└── a", "    └── b"]
        );
    }

    #[test]
    fn test_empty_directory_is_silent() {
        let fs = MemoryFs::new("/r");
        let mut sink = RecordingSink::new();
        TreeRenderer::new(&fs)
            .render(
                Path::new("/r"),
                TraversalContext::root(&RenderConfig::default()),
                &mut sink,
            )
            .unwrap();
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn test_permission_denied_subtree() {
        let fs = MemoryFs::new("/r")
            .denied_dir("/r/locked")
            .file("/r/open.txt", 3);
        let mut sink = RecordingSink::new();
        TreeRenderer::new(&fs)
            .render(
                Path::new("/r"),
                TraversalContext::root(&RenderConfig::default()),
                &mut sink,
            )
            .unwrap();

        assert_eq!(
            sink.texts(),
            vec!["├── locked", "│   └── [Permission Denied]", "└── open.txt"]
        );
        let denied: Vec<_> = sink
            .lines
            .iter()
            .filter(|(text, _)| text.contains(PERMISSION_DENIED_MARKER))
            .collect();
        assert_eq!(denied.len(), 1);
        assert_eq!(denied[0].1, Role::Error);
    }

    #[test]
    fn test_permission_denied_root() {
        let fs = MemoryFs::new("/r");
        let fs = fs.deny("/r");
        assert_eq!(
            render_lines(&fs, "/r", &RenderConfig::default()),
            vec!["└── [Permission Denied]"]
        );
    }

    #[test]
    fn test_permissions_and_sizes() {
        let fs = MemoryFs::new("/r")
            .dir("/r/sub")
            .file("/r/big.bin", 1536)
            .with_mode("/r/big.bin", 0o100600);
        let config = RenderConfig {
            show_permissions: true,
            human_readable: true,
            ..Default::default()
        };

        assert_eq!(
            render_lines(&fs, "/r", &config),
            vec!["├── drwxr-xr-x sub", "└── -rw------- big.bin (1.50 KB)"]
        );
    }

    #[test]
    fn test_sizes_never_shown_for_directories() {
        let fs = MemoryFs::new("/r").dir("/r/sub").file("/r/f", 0);
        let config = RenderConfig {
            human_readable: true,
            ..Default::default()
        };
        assert_eq!(
            render_lines(&fs, "/r", &config),
            vec!["├── sub", "└── f (0.00 B)"]
        );
    }

    #[test]
    fn test_unreadable_entry_is_skipped() {
        let fs = MemoryFs::new("/r")
            .file("/r/good", 1)
            .broken_file("/r/bad");
        let config = RenderConfig {
            human_readable: true,
            ..Default::default()
        };

        assert_eq!(render_lines(&fs, "/r", &config), vec!["└── good (1.00 B)"]);
    }

    #[test]
    fn test_dangling_link_listed_without_size() {
        let fs = MemoryFs::new("/r")
            .file("/r/real.txt", 3)
            .dangling("/r/dangling.txt")
            .file("/r/other.log", 1);
        let config = RenderConfig {
            human_readable: true,
            extension_filter: Some(".txt".to_string()),
            ..Default::default()
        };

        // Every name matching the suffix gets a line, sized or not
        assert_eq!(
            render_lines(&fs, "/r", &config),
            vec!["├── real.txt (3.00 B)", "└── dangling.txt"]
        );
    }

    #[test]
    fn test_special_file_listed_without_size() {
        let fs = MemoryFs::new("/r")
            .special_file("/r/pipe", 0o010644)
            .file("/r/data", 2048);
        let config = RenderConfig {
            human_readable: true,
            show_permissions: true,
            ..Default::default()
        };

        assert_eq!(
            render_lines(&fs, "/r", &config),
            vec!["├── prw-r--r-- pipe", "└── -rw-r--r-- data (2.00 KB)"]
        );
    }

    #[test]
    fn test_color_roles() {
        let fs = MemoryFs::new("/r").dir("/r/d").file("/r/f", 1);
        let config = RenderConfig {
            color: true,
            ..Default::default()
        };
        let mut sink = RecordingSink::new();
        TreeRenderer::new(&fs)
            .render(Path::new("/r"), TraversalContext::root(&config), &mut sink)
            .unwrap();

        let roles: Vec<Role> = sink.lines.iter().map(|(_, role)| *role).collect();
        assert_eq!(roles, vec![Role::Directory, Role::File]);

        let mut plain = RecordingSink::new();
        TreeRenderer::new(&fs)
            .render(
                Path::new("/r"),
                TraversalContext::root(&RenderConfig::default()),
                &mut plain,
            )
            .unwrap();
        assert!(plain.lines.iter().all(|(_, role)| *role == Role::Plain));
    }

    #[test]
    fn test_body_lines_are_not_reported() {
        let fs = MemoryFs::new("/r").dir("/r/d").file("/r/f", 1);
        let mut sink = RecordingSink::new();
        print_tree(&fs, Path::new("/r"), &RenderConfig::default(), &mut sink).unwrap();
        assert!(sink.reported.is_empty());
        assert!(sink.finished);
    }

    #[test]
    fn test_invalid_root_is_reported() {
        let fs = MemoryFs::new("/r").file("/r/file", 1);
        let mut sink = RecordingSink::new();

        let err = print_tree(&fs, Path::new("/r/file"), &RenderConfig::default(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, TwigError::InvalidRoot { .. }));
        assert_eq!(
            sink.reported,
            vec![(
                "Error: '/r/file' is not a valid directory.".to_string(),
                Level::ERROR
            )]
        );
        assert_eq!(sink.lines.len(), 1);
        assert_eq!(sink.lines[0].1, Role::Error);

        assert!(validate_root(&fs, Path::new("/nowhere")).is_err());
        assert!(validate_root(&fs, Path::new("/r")).is_ok());
    }

    #[test]
    fn test_deep_chain() {
        let mut fs = MemoryFs::new("/r");
        let mut path = String::from("/r");
        for i in 0..1000 {
            path.push_str(&format!("/d{}", i));
            fs = fs.dir(&path);
        }
        let lines = render_lines(&fs, "/r", &RenderConfig::default());
        assert_eq!(lines.len(), 1000);
        assert!(lines[999].ends_with("└── d999"));
    }
}
