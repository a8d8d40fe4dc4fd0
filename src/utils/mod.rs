pub mod formatter;
pub mod input;

pub use formatter::{OutputFormat, SuiteFormatter};
pub use input::ensure_jmx_extension;
