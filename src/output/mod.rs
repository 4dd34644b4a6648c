//! Console output for rendered trees
//!
//! - `style` - line roles and the colors they map to
//! - `sink` - the `OutputSink` trait and the stdout implementation

mod sink;
mod style;

pub use sink::{ConsoleSink, OutputSink};
pub use style::{Role, stdout_supports_color, style, write_styled};
