pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod loader;
pub mod models;
pub mod output;
pub mod parsers;
pub mod render;
pub mod reporting;
pub mod scanner;
pub mod security;
pub mod synth;

// Re-export commonly used items
pub use error::{ReconError, Result};
pub use models::*;
pub use parsers::*;
pub use security::{classify, classify_value, Exposure, SecurityContext};
pub use synth::{SchemaKind, Synthesizer, DEFAULT_MAX_DEPTH};
