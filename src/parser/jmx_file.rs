use crate::parser::resolver::SamplerResolver;
use crate::parser::tree::TreePairIndex;
use crate::parser::types::{ApiTestCase, ExtractOptions, ParseResult, TestSuite};
use roxmltree::{Document, Node};
use std::path::Path;

/// HTTP 采样器标签
pub const HTTP_SAMPLER: &str = "HTTPSamplerProxy";

/// 从 JMX 文档树中提取测试用例
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// 深度优先遍历整个文档，每个 HTTPSamplerProxy 生成一个用例
    ///
    /// 不限定在 ThreadGroup / TransactionController 之下，任何位置的采样器都会被提取
    pub fn extract(&self, root: Node<'_, '_>) -> Vec<ApiTestCase> {
        let doc = root.document();
        let index = TreePairIndex::build(doc);
        let resolver = SamplerResolver::new(doc, &index, &self.options);

        let cases: Vec<ApiTestCase> = root
            .descendants()
            .filter(|n| is_sampler(*n))
            .map(|sampler| resolver.resolve(sampler))
            .collect();

        tracing::debug!(
            samplers = cases.len(),
            tree_pairs = index.len(),
            "Extraction finished"
        );
        cases
    }
}

fn is_sampler(node: Node<'_, '_>) -> bool {
    node.is_element() && node.has_tag_name(HTTP_SAMPLER)
}

/// 使用默认选项提取
pub fn extract(root: Node<'_, '_>) -> Vec<ApiTestCase> {
    Extractor::new().extract(root)
}

/// JMX 文件解析器
pub struct JmxFileParser;

impl JmxFileParser {
    /// 从文件路径解析
    pub fn parse_file<P: AsRef<Path>>(path: P, extractor: &Extractor) -> ParseResult<TestSuite> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::parse_bytes(&bytes, extractor)
    }

    /// 从原始字节解析（必须是 UTF-8）
    pub fn parse_bytes(bytes: &[u8], extractor: &Extractor) -> ParseResult<TestSuite> {
        let content = std::str::from_utf8(bytes)?;
        Self::parse_content(content, extractor)
    }

    /// 从字符串内容解析
    ///
    /// 只有 XML 格式错误（包括没有根元素）才会失败；没有采样器时返回空结果
    pub fn parse_content(content: &str, extractor: &Extractor) -> ParseResult<TestSuite> {
        let doc = Document::parse_with_options(content, parsing_options())?;
        Ok(TestSuite::new(extractor.extract(doc.root_element())))
    }
}

// JMX 文件有时带有 DOCTYPE
fn parsing_options() -> roxmltree::ParsingOptions {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;
    options
}
