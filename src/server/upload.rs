use crate::parser::{Extractor, JmxFileParser, TestSuite};
use crate::server::response::ApiError;
use crate::utils::ensure_jmx_extension;
use crate::{ConvertError, Result};
use axum::body::Bytes;
use axum::extract::Multipart;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 上传测试计划所用的 multipart 字段名
pub const FILE_FIELD: &str = "file";

pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// 从 multipart 请求体中读取 `file` 字段
///
/// 先校验扩展名，再读取字段内容
pub async fn read_upload(multipart: &mut Multipart) -> std::result::Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        ensure_jmx_extension(&file_name)?;

        let bytes = field.bytes().await?;
        return Ok(Upload { file_name, bytes });
    }

    Err(ConvertError::InvalidInput("No file part".to_string()).into())
}

/// 写入临时 `.jmx` 文件的上传内容
///
/// 值被丢弃时删除临时文件，无论解析成功与否
pub struct SpooledUpload {
    file: NamedTempFile,
}

impl SpooledUpload {
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("jmx2yaml-")
            .suffix(".jmx")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn parse(&self, extractor: &Extractor) -> Result<TestSuite> {
        Ok(JmxFileParser::parse_file(self.path(), extractor)?)
    }
}

/// 将上传内容落盘并执行提取
///
/// 阻塞调用，需在 `spawn_blocking` 中执行
pub fn convert_upload(bytes: &[u8], extractor: &Extractor) -> Result<TestSuite> {
    let spooled = SpooledUpload::new(bytes)?;
    tracing::debug!(path = %spooled.path().display(), bytes = bytes.len(), "Upload spooled");
    spooled.parse(extractor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"<jmeterTestPlan><hashTree>
        <HTTPSamplerProxy testname="ping">
          <stringProp name="HTTPSampler.domain">example.com</stringProp>
          <stringProp name="HTTPSampler.path">/ping</stringProp>
        </HTTPSamplerProxy>
        <hashTree/>
      </hashTree></jmeterTestPlan>"#;

    #[test]
    fn test_convert_upload() {
        let suite = convert_upload(PLAN.as_bytes(), &Extractor::new()).unwrap();
        assert_eq!(suite.len(), 1);
        assert_eq!(suite.api_tests[0].url, "http://example.com/ping");
    }

    #[test]
    fn test_spooled_file_removed_after_success() {
        let spooled = SpooledUpload::new(PLAN.as_bytes()).unwrap();
        let path = spooled.path().to_path_buf();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with(".jmx"));

        spooled.parse(&Extractor::new()).unwrap();
        drop(spooled);
        assert!(!path.exists());
    }

    #[test]
    fn test_spooled_file_removed_after_parse_failure() {
        let spooled = SpooledUpload::new(b"<not-closed>").unwrap();
        let path = spooled.path().to_path_buf();

        let result = spooled.parse(&Extractor::new());
        assert!(matches!(result, Err(ConvertError::ParseError(_))));
        drop(spooled);
        assert!(!path.exists());
    }
}
