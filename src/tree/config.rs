//! Render configuration and per-level traversal state

use super::utils::child_prefix;

/// Options fixed for the whole traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Deepest level whose directory contents are listed. `Some(0)` lists
    /// only the root's direct children.
    pub depth_limit: Option<usize>,
    /// Case-sensitive name suffix a file must end with to be shown.
    /// Directories are never filtered.
    pub extension_filter: Option<String>,
    pub color: bool,
    pub show_permissions: bool,
    pub human_readable: bool,
}

impl RenderConfig {
    /// Check whether a file name passes the extension filter.
    pub fn accepts_file(&self, name: &str) -> bool {
        self.extension_filter
            .as_deref()
            .is_none_or(|suffix| name.ends_with(suffix))
    }
}

/// State handed from a directory to its children: the accumulated prefix,
/// the depth and the shared config. Children get a fresh context built from
/// their parent's; nothing is modified in place.
#[derive(Debug, Clone)]
pub struct TraversalContext<'a> {
    prefix: String,
    depth: usize,
    config: &'a RenderConfig,
}

impl<'a> TraversalContext<'a> {
    /// Context for the root directory: empty prefix, depth 0.
    pub fn root(config: &'a RenderConfig) -> Self {
        Self {
            prefix: String::new(),
            depth: 0,
            config,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// Context for the contents of a directory entry printed at this level.
    pub fn child(&self, is_last: bool) -> Self {
        Self {
            prefix: child_prefix(&self.prefix, is_last),
            depth: self.depth + 1,
            config: self.config,
        }
    }

    /// True once the depth limit has been passed; nothing is listed here.
    pub fn beyond_limit(&self) -> bool {
        self.config.depth_limit.is_some_and(|max| self.depth > max)
    }
}
