use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// 有序的 Header 映射
///
/// 保持文档中的出现顺序；重复的 name 覆盖原位置上的值（后写入者生效）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入 header，已存在则覆盖值并保留原位置
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

// 序列化为 mapping，而不是 [[k, v], ...]
impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// 从单个 HTTPSamplerProxy 提取出的测试用例
///
/// 字段顺序即输出文档中的 key 顺序
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ApiTestCase {
    /// 采样器的 testname 属性
    pub api_name: String,

    /// 请求头，来自采样器同级 hashTree 中的 HeaderManager
    pub headers: Headers,

    /// HTTP 方法，缺失时为 GET
    pub method: String,

    /// 所有 Argument.value 拼接后的请求体
    pub payload: String,

    /// 期望的状态码（固定值，不从文档读取）
    pub status_code: u16,

    /// 拼接并规范化后的 URL
    pub url: String,

    /// LoopController.loops，缺失或无法解析时为 1
    pub repeat: i64,
}

/// 整个 JMX 文件的转换结果
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct TestSuite {
    pub api_tests: Vec<ApiTestCase>,
}

impl TestSuite {
    pub fn new(api_tests: Vec<ApiTestCase>) -> Self {
        Self { api_tests }
    }

    pub fn len(&self) -> usize {
        self.api_tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.api_tests.is_empty()
    }
}

/// 提取时使用的默认值（可由配置文件 [extract] 覆盖）
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// 采样器缺少 testname 时使用的名称
    pub default_api_name: String,

    /// 写入每个用例的期望状态码
    pub status_code: u16,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_api_name: "unknown_api".to_string(),
            status_code: 200,
        }
    }
}

/// 字段解析降级（非致命）
///
/// 只写入日志，不返回给调用方
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWarning {
    /// HeaderManager 中某条 header 没有名字
    HeaderWithoutName { sampler: String },

    /// LoopController.loops 不是整数
    UnparsableLoops { sampler: String, raw: String },

    /// HTTPSampler.port 不是数字
    UnparsablePort { sampler: String, raw: String },

    /// 拼接出的 URL 无法通过校验
    UnparsableUrl { sampler: String, url: String },

    /// 采样器没有 testname 属性
    MissingName,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldWarning::HeaderWithoutName { sampler } => {
                write!(f, "sampler '{}': header entry without Header.name skipped", sampler)
            }
            FieldWarning::UnparsableLoops { sampler, raw } => write!(
                f,
                "sampler '{}': LoopController.loops '{}' is not an integer, using 1",
                sampler, raw
            ),
            FieldWarning::UnparsablePort { sampler, raw } => write!(
                f,
                "sampler '{}': HTTPSampler.port '{}' is not a number, ignored",
                sampler, raw
            ),
            FieldWarning::UnparsableUrl { sampler, url } => {
                write!(f, "sampler '{}': assembled url '{}' does not validate", sampler, url)
            }
            FieldWarning::MissingName => write!(f, "sampler without testname attribute"),
        }
    }
}

/// 解析错误类型
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// XML 格式错误或没有根元素
    #[error("Invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// 上传内容不是 UTF-8
    #[error("Invalid encoding: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 解析结果类型别名
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case() -> ApiTestCase {
        ApiTestCase {
            api_name: "Login".to_string(),
            headers: [("Content-Type", "application/json")].into_iter().collect(),
            method: "POST".to_string(),
            payload: r#"{"user":"a"}"#.to_string(),
            status_code: 200,
            url: "https://api.example.com/v1/login".to_string(),
            repeat: 1,
        }
    }

    #[test]
    fn test_headers_last_write_wins() {
        let mut headers = Headers::new();
        headers.insert("Accept", "text/plain");
        headers.insert("X-Trace", "1");
        headers.insert("Accept", "application/json");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Accept"), Some("application/json"));
        // 覆盖不改变位置
        let names: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Accept", "X-Trace"]);
    }

    #[test]
    fn test_headers_serialize_as_mapping() {
        let headers: Headers = [("B", "2"), ("A", "1")].into_iter().collect();
        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(json, r#"{"B":"2","A":"1"}"#);
    }

    #[test]
    fn test_empty_headers_serialize_as_empty_mapping() {
        let json = serde_json::to_string(&Headers::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_case_key_order() {
        let json = serde_json::to_string(&sample_case()).unwrap();
        let keys = [
            "api_name",
            "headers",
            "method",
            "payload",
            "status_code",
            "url",
            "repeat",
        ];
        let positions: Vec<_> = keys
            .iter()
            .map(|k| json.find(&format!("\"{}\"", k)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_suite_wraps_api_tests() {
        let suite = TestSuite::new(vec![sample_case()]);
        let value = serde_json::to_value(&suite).unwrap();
        assert_eq!(value["api_tests"][0]["api_name"], "Login");
        assert_eq!(value["api_tests"][0]["status_code"], 200);
        assert_eq!(suite.len(), 1);
        assert!(!suite.is_empty());
    }

    #[test]
    fn test_field_warning_display() {
        let warning = FieldWarning::UnparsableLoops {
            sampler: "Login".to_string(),
            raw: "abc".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "sampler 'Login': LoopController.loops 'abc' is not an integer, using 1"
        );
    }
}
