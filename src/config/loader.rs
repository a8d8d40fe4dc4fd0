use crate::config::types::AppConfig;
use crate::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "jmx2yaml.toml";

    /// 指定配置文件路径的环境变量
    const CONFIG_ENV: &'static str = "JMX2YAML_CONFIG";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ConvertError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConvertError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// 加载配置：显式路径优先，否则自动查找，找不到时使用默认值
    pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        match Self::find() {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading config");
                Self::load_from_path(&path)
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    /// 查找配置文件
    /// 查找顺序：
    /// 1. 环境变量 JMX2YAML_CONFIG
    /// 2. 当前目录及父目录
    /// 3. 用户配置目录 ~/.config/jmx2yaml/
    pub fn find() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(Self::CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let current = std::env::current_dir().ok()?;
        if let Some(path) = Self::find_upwards(&current) {
            return Some(path);
        }

        Self::user_config_path().filter(|p| p.exists())
    }

    /// 从 start 开始逐级向上查找
    fn find_upwards(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(home.join(".config").join("jmx2yaml").join(Self::CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_from_path() {
        let config_content = r#"
[server]
host = "0.0.0.0"
port = 9000
max_upload_bytes = 1024

[extract]
status_code = 204
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = ConfigLoader::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.server.max_upload_bytes, 1024);
        assert_eq!(config.extract.status_code, 204);
        assert_eq!(config.extract.default_api_name, "unknown_api");
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[server\nport = ").unwrap();
        temp_file.flush().unwrap();

        let result = ConfigLoader::load_from_path(temp_file.path());
        assert!(matches!(result, Err(ConvertError::ConfigError(_))));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/jmx2yaml.toml")));
        assert!(matches!(result, Err(ConvertError::ConfigError(_))));
    }

    #[test]
    fn test_find_upwards() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join("jmx2yaml.toml"), "").unwrap();

        let found = ConfigLoader::find_upwards(&nested).unwrap();
        assert_eq!(found, root.path().join("jmx2yaml.toml"));
    }
}
