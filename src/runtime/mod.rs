//! Async runtime abstractions.

mod stream;

pub use stream::AsyncStream;
