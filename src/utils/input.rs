use crate::{ConvertError, Result};

const JMX_EXTENSION: &str = ".jmx";

/// 校验上传文件名是否为 .jmx（不区分大小写）
pub fn ensure_jmx_extension(file_name: &str) -> Result<()> {
    let name = file_name.trim();
    let is_jmx = name.len() > JMX_EXTENSION.len()
        && name
            .get(name.len() - JMX_EXTENSION.len()..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(JMX_EXTENSION));

    if is_jmx {
        Ok(())
    } else {
        Err(ConvertError::InvalidInput(
            "Only .jmx files are allowed".to_string(),
        ))
    }
}
