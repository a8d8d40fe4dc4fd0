pub mod config;
pub mod error;
pub mod logger;
pub mod parser;
pub mod server;
pub mod utils;

// Re-export commonly used types
pub use error::{ConvertError, Result};
pub use parser::{ApiTestCase, Extractor, TestSuite, extract};
