//! Actor System for Watch Mode
//!
//! ```text
//! FsSource --> Dispatcher --> Toolchain / WatchTree
//! (notify)     (one event at a time)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Classified filesystem events
//! - `fs` - Notifier bridge into a bounded queue
//! - `dispatcher` - Single-consumer event routing
//! - `coordinator` - Wires up and runs the pipeline

pub mod coordinator;
pub mod dispatcher;
pub mod fs;
pub mod messages;

pub use coordinator::{Coordinator, build_dispatcher};
