use jmx2yaml::parser::{self, ParseError};
use jmx2yaml::{ConvertError, Result};

#[test]
fn test_parse_error() {
    let err = ConvertError::ParseError("test error".to_string());
    assert_eq!(err.to_string(), "解析错误: test error");
    assert!(!err.is_client_error());
}

#[test]
fn test_invalid_input() {
    let err = ConvertError::InvalidInput("No file part".to_string());
    assert_eq!(err.to_string(), "No file part");
    assert!(err.is_client_error());
}

#[test]
fn test_error_conversion_from_anyhow() {
    let anyhow_err = anyhow::anyhow!("test anyhow error");
    let err: ConvertError = anyhow_err.into();
    assert!(err.to_string().contains("test anyhow error"));
}

#[test]
fn test_error_conversion_from_parse_error() {
    let parse_err = parser::parse_content("<unclosed>").unwrap_err();
    assert!(matches!(parse_err, ParseError::Xml(_)));

    let err: ConvertError = parse_err.into();
    match err {
        ConvertError::ParseError(msg) => assert!(msg.starts_with("Invalid XML")),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_result_type() {
    fn returns_error() -> Result<()> {
        Err(ConvertError::ParseError("test".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
    match result {
        Err(ConvertError::ParseError(msg)) => assert_eq!(msg, "test"),
        _ => panic!("Expected ParseError"),
    }
}
