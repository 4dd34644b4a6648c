//! Twig - print a directory as a tree, with filters, sizes and permissions

pub mod error;
pub mod logging;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::TwigError;
pub use logging::{LogLevel, file_subscriber};
pub use output::{ConsoleSink, OutputSink, Role, style};
pub use tree::{
    FsAccess, LocalFs, RenderConfig, TraversalContext, TreeRenderer, format_mode,
    human_readable_size, print_tree,
};
