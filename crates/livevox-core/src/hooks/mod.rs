//! Page glue hooks — scroll tracking, progress bar, dev log streaming.
//!
//! None of this carries real invariants; each module is a small pure state
//! struct the embedder drives from page events.

pub mod dev_logs;
pub mod progress;
pub mod scroll;
