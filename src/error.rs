use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML 序列化错误: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl ConvertError {
    /// 是否为调用方输入导致的错误（对应 HTTP 4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(self, ConvertError::InvalidInput(_))
    }
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for ConvertError {
    fn from(err: anyhow::Error) -> Self {
        ConvertError::Other(err.to_string())
    }
}

// Add conversion from parser::ParseError
impl From<crate::parser::ParseError> for ConvertError {
    fn from(err: crate::parser::ParseError) -> Self {
        ConvertError::ParseError(err.to_string())
    }
}

/// Result type for jmx2yaml crate
pub type Result<T> = std::result::Result<T, ConvertError>;
