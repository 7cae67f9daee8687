//! InMemory implementations of the domain repositories.

mod registry;

pub use registry::InMemoryConnectionRegistry;
