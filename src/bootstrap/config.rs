//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Map TOML into the GuardConfig DTO / 将 TOML 映射为 GuardConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! Defaults for missing keys belong to the DTO, not to this loader.

use std::path::Path;

use anyhow::Context;
use ig_core::config::GuardConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - File cannot be read (I/O error) / 无法读取文件
/// - Content is not valid TOML / 内容不是有效的 TOML
/// - A known key has the wrong type or value / 已知键的类型或取值错误
pub fn load_config(config_path: &Path) -> anyhow::Result<GuardConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    GuardConfig::from_toml(toml_value)
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ig_core::ports::IsolationLevel;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let file = write_config(
            r#"
            [storage]
            database_path = "/var/lib/guard/records.db"
            busy_timeout_ms = 250

            [insert]
            isolation = "repeatable_read"
            deadline_ms = 1000

            [retry]
            max_attempts = 8
            "#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(
            config.storage.database_path,
            PathBuf::from("/var/lib/guard/records.db")
        );
        assert_eq!(config.storage.busy_timeout_ms, 250);
        assert_eq!(config.insert.isolation, IsolationLevel::RepeatableRead);
        assert_eq!(config.insert.deadline(), Some(Duration::from_secs(1)));
        assert_eq!(config.retry.max_attempts, 8);
    }

    /// Empty file yields defaults
    /// 空文件得到默认配置
    #[test]
    fn test_load_config_empty_file_uses_defaults() {
        let file = write_config("");
        assert_eq!(load_config(file.path()).unwrap(), GuardConfig::default());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/guard.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_rejects_unknown_isolation() {
        let file = write_config("[insert]\nisolation = \"snapshot\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_load_config_rejects_malformed_toml() {
        let file = write_config("[storage\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config as TOML"));
    }
}
