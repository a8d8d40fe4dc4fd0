pub mod jmx_file;
pub mod resolver;
pub mod tree;
pub mod types;

// Re-export commonly used types
pub use jmx_file::{Extractor, JmxFileParser, extract};
pub use tree::TreePairIndex;
pub use types::{
    ApiTestCase, ExtractOptions, FieldWarning, Headers, ParseError, ParseResult, TestSuite,
};

/// 从文件路径解析 JMX 文件（默认选项）
pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> ParseResult<TestSuite> {
    JmxFileParser::parse_file(path, &Extractor::new())
}

/// 从字符串内容解析 JMX（默认选项）
pub fn parse_content(content: &str) -> ParseResult<TestSuite> {
    JmxFileParser::parse_content(content, &Extractor::new())
}
