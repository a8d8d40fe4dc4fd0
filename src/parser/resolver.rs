use crate::parser::tree::TreePairIndex;
use crate::parser::types::{ApiTestCase, ExtractOptions, FieldWarning, Headers};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use roxmltree::{Document, Node};
use std::borrow::Cow;

// JMeter 属性名
pub const PROP_METHOD: &str = "HTTPSampler.method";
pub const PROP_DOMAIN: &str = "HTTPSampler.domain";
pub const PROP_PROTOCOL: &str = "HTTPSampler.protocol";
pub const PROP_PATH: &str = "HTTPSampler.path";
pub const PROP_PORT: &str = "HTTPSampler.port";
pub const PROP_ARGUMENT_VALUE: &str = "Argument.value";
pub const PROP_LOOPS: &str = "LoopController.loops";
pub const PROP_HEADERS: &str = "HeaderManager.headers";
pub const PROP_HEADER_NAME: &str = "Header.name";
pub const PROP_HEADER_VALUE: &str = "Header.value";

const STRING_PROP: &str = "stringProp";
const INT_PROP: &str = "intProp";
const COLLECTION_PROP: &str = "collectionProp";
const ELEMENT_PROP: &str = "elementProp";
const HEADER_MANAGER: &str = "HeaderManager";

const DEFAULT_METHOD: &str = "GET";
const DEFAULT_PROTOCOL: &str = "http";
const DEFAULT_REPEAT: i64 = 1;

// 可选的前导 ":" 用于识别 scheme 分隔符
static SLASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(:)?/{2,}").expect("valid slash regex"));

/// 单个采样器的字段解析器
///
/// 每个字段独立降级为默认值，解析本身不会失败
pub struct SamplerResolver<'a, 'input> {
    doc: &'a Document<'input>,
    index: &'a TreePairIndex,
    options: &'a ExtractOptions,
}

impl<'a, 'input> SamplerResolver<'a, 'input> {
    pub fn new(
        doc: &'a Document<'input>,
        index: &'a TreePairIndex,
        options: &'a ExtractOptions,
    ) -> Self {
        Self {
            doc,
            index,
            options,
        }
    }

    /// 解析一个 HTTPSamplerProxy 为测试用例
    pub fn resolve(&self, sampler: Node<'a, 'input>) -> ApiTestCase {
        let api_name = self.api_name(sampler);
        let method = prop_text(sampler, &[STRING_PROP], PROP_METHOD)
            .unwrap_or_else(|| DEFAULT_METHOD.to_string());
        let url = self.url(sampler, &api_name);
        let payload = payload(sampler);
        let headers = self.headers(sampler, &api_name);
        let repeat = repeat(sampler, &api_name);

        tracing::debug!(
            api_name = %api_name,
            method = %method,
            url = %url,
            headers = headers.len(),
            repeat,
            "Resolved sampler"
        );

        ApiTestCase {
            api_name,
            headers,
            method,
            payload,
            status_code: self.options.status_code,
            url,
            repeat,
        }
    }

    fn api_name(&self, sampler: Node<'a, 'input>) -> String {
        match sampler.attribute("testname").filter(|s| !s.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                tracing::debug!("{}", FieldWarning::MissingName);
                self.options.default_api_name.clone()
            }
        }
    }

    fn url(&self, sampler: Node<'a, 'input>, api_name: &str) -> String {
        let protocol = prop_text(sampler, &[STRING_PROP], PROP_PROTOCOL)
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());
        let domain = prop_text(sampler, &[STRING_PROP], PROP_DOMAIN).unwrap_or_default();
        let path = prop_text(sampler, &[STRING_PROP], PROP_PATH).unwrap_or_default();

        let port = prop_text(sampler, &[STRING_PROP, INT_PROP], PROP_PORT).and_then(|raw| {
            match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    report(FieldWarning::UnparsablePort {
                        sampler: api_name.to_string(),
                        raw,
                    });
                    None
                }
            }
        });

        let url = assemble_url(&protocol, &domain, port, &path);

        if !domain.is_empty() && url::Url::parse(&url).is_err() {
            report(FieldWarning::UnparsableUrl {
                sampler: api_name.to_string(),
                url: url.clone(),
            });
        }

        url
    }

    /// 通过 hashTree 配对找到采样器的 HeaderManager
    fn headers(&self, sampler: Node<'a, 'input>, api_name: &str) -> Headers {
        let mut headers = Headers::new();

        let Some(children) = self.index.children_of(self.doc, sampler) else {
            return headers;
        };
        let Some(manager) = children
            .descendants()
            .find(|n| n.has_tag_name(HEADER_MANAGER))
        else {
            return headers;
        };
        let Some(collection) = manager
            .children()
            .find(|n| n.has_tag_name(COLLECTION_PROP) && n.attribute("name") == Some(PROP_HEADERS))
        else {
            return headers;
        };

        for entry in collection.children().filter(|n| n.has_tag_name(ELEMENT_PROP)) {
            let name = child_prop(entry, PROP_HEADER_NAME)
                .map(text_of)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            let Some(name) = name else {
                report(FieldWarning::HeaderWithoutName {
                    sampler: api_name.to_string(),
                });
                continue;
            };
            let value = child_prop(entry, PROP_HEADER_VALUE)
                .map(text_of)
                .unwrap_or_default();
            headers.insert(name, value);
        }

        headers
    }
}

/// 拼接所有 Argument.value（解码、去空白后按文档顺序连接）
pub fn payload(sampler: Node<'_, '_>) -> String {
    sampler
        .descendants()
        .filter(|n| is_prop(*n, &[STRING_PROP], PROP_ARGUMENT_VALUE))
        .map(text_of)
        .map(|text| decode_entities(&text).trim().to_string())
        .collect()
}

/// 读取 LoopController.loops，缺失或无法解析时返回 1
pub fn repeat(sampler: Node<'_, '_>, api_name: &str) -> i64 {
    let Some(raw) = prop_text(sampler, &[INT_PROP, STRING_PROP], PROP_LOOPS) else {
        return DEFAULT_REPEAT;
    };
    match parse_loops(&raw) {
        Some(loops) => loops,
        None => {
            report(FieldWarning::UnparsableLoops {
                sampler: api_name.to_string(),
                raw,
            });
            DEFAULT_REPEAT
        }
    }
}

/// 整数解析，失败返回 None
pub fn parse_loops(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// 按 protocol://domain[:port]/path 拼接 URL
///
/// domain 为空时只使用 path（JMeter 允许在 path 中写完整 URL）
pub fn assemble_url(protocol: &str, domain: &str, port: Option<u16>, path: &str) -> String {
    if domain.is_empty() {
        return normalize_url(path);
    }

    let host = match port {
        Some(port) => format!("{}:{}", domain, port),
        None => domain.to_string(),
    };
    normalize_url(&format!("{}://{}/{}", protocol, host, path))
}

/// 合并连续斜杠，每个 "scheme://" 都保留为 "://"（包括 query 中内嵌的 URL）
pub fn normalize_url(raw: &str) -> String {
    SLASH_RUN
        .replace_all(raw, |caps: &Captures<'_>| {
            if caps.get(1).is_some() { "://" } else { "/" }
        })
        .into_owned()
}

/// 解码文本中残留的 HTML 实体引号
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&quot;", "\"")
            .replace("&#34;", "\"")
            .replace("&apos;", "'")
            .replace("&#39;", "'")
            .replace("&amp;", "&"),
    )
}

/// 在节点下任意深度查找属性元素，返回去空白后的非空文本
fn prop_text(node: Node<'_, '_>, tags: &[&str], name: &str) -> Option<String> {
    node.descendants()
        .find(|n| is_prop(*n, tags, name))
        .map(text_of)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 元素下所有文本节点拼接，注释和处理指令两侧的文本会合并
fn text_of(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// 直接子节点中的 stringProp
fn child_prop<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_prop(*n, &[STRING_PROP], name))
}

fn is_prop(node: Node<'_, '_>, tags: &[&str], name: &str) -> bool {
    node.is_element()
        && tags.contains(&node.tag_name().name())
        && node.attribute("name") == Some(name)
}

fn report(warning: FieldWarning) {
    tracing::warn!("{}", warning);
}
