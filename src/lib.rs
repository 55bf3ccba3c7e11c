// Library surface for headless/integration tests and reuse.
// Terminal rendering and CLI parsing stay in the binary.
pub mod app_dirs;
pub mod clipboard;
pub mod compare;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod paragraph;
pub mod runtime;
pub mod session;
pub mod store;
pub mod timer;
pub mod trainer;

pub use error::{Error, Result};
