//! Live chart updates pushed by the dashboard backend.

pub mod live_stream;

pub use live_stream::*;
