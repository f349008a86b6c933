//! Port definitions.

mod fetch_port;

pub use fetch_port::{BinaryFetchPort, FetchResult};

#[cfg(test)]
pub use fetch_port::MockBinaryFetchPort;
