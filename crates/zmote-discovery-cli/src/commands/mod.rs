//! Command implementations.

pub mod announce;
pub mod discover;
pub mod parse;
pub mod watch;

pub use announce::run_announce;
pub use discover::run_discover;
pub use parse::run_parse;
pub use watch::run_watch;
