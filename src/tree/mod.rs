//! Directory tree rendering
//!
//! `TreeRenderer` walks a directory through an `FsAccess` and prints each
//! entry to an `OutputSink` with its connector and prefix.

mod config;
mod fs;
mod utils;
mod walker;

pub use config::{RenderConfig, TraversalContext};
pub use fs::{EntryKind, FsAccess, LocalFs};
pub use utils::{
    BLANK_EXTENSION, BRANCH, LAST_BRANCH, TRUNK_EXTENSION, child_prefix, connector, format_mode,
    human_readable_size,
};
pub use walker::{PERMISSION_DENIED_MARKER, TreeRenderer, print_tree, validate_root};
