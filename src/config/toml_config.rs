use crate::config::DEFAULT_OUTPUT_DIR;
use crate::core::driver::DEFAULT_OUTPUT_SUFFIX;
use crate::core::rewriter::{DEFAULT_MARKER_TYPE, DEFAULT_MIN_DATA_LENGTH};
use crate::core::ConfigProvider;
use crate::utils::error::{HasherError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub rewrite: RewriteConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteConfig {
    pub marker_type: Option<String>,
    pub min_data_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| HasherError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| HasherError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 設定檔中的輸出目錄（未設定時為 None）
    pub fn configured_output_dir(&self) -> Option<&str> {
        self.output.directory.as_deref()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn marker_type(&self) -> &str {
        self.rewrite
            .marker_type
            .as_deref()
            .unwrap_or(DEFAULT_MARKER_TYPE)
    }

    fn min_data_length(&self) -> usize {
        self.rewrite.min_data_length.unwrap_or(DEFAULT_MIN_DATA_LENGTH)
    }

    fn output_dir(&self) -> &str {
        self.configured_output_dir().unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    fn output_suffix(&self) -> &str {
        self.output.suffix.as_deref().unwrap_or(DEFAULT_OUTPUT_SUFFIX)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("rewrite.marker_type", self.marker_type())?;
        validation::validate_path("output.directory", self.output_dir())?;
        validation::validate_file_suffix("output.suffix", self.output_suffix())?;
        if let Some(level) = self.log_level() {
            validation::validate_log_level("logging.level", level)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.marker_type(), "base64");
        assert_eq!(config.min_data_length(), 100);
        assert_eq!(config.output_dir(), ".claude-session-logs");
        assert_eq!(config.output_suffix(), ".hashed.jsonl");
        assert!(config.configured_output_dir().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[rewrite]
marker_type = "blob"
min_data_length = 256

[output]
directory = "./hashed"
suffix = ".clean.jsonl"

[logging]
level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.marker_type(), "blob");
        assert_eq!(config.min_data_length(), 256);
        assert_eq!(config.output_dir(), "./hashed");
        assert_eq!(config.output_suffix(), ".clean.jsonl");
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SESSION_LOG_HASHER_TEST_DIR", "/var/tmp/hashed");

        let toml_content = r#"
[output]
directory = "${SESSION_LOG_HASHER_TEST_DIR}"
suffix = "${SESSION_LOG_HASHER_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_dir(), "/var/tmp/hashed");
        assert_eq!(config.output_suffix(), "${SESSION_LOG_HASHER_UNSET_VAR}");

        std::env::remove_var("SESSION_LOG_HASHER_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_type = TomlConfig::from_toml_str("[rewrite]\nmarker_type = \"  \"\n").unwrap();
        assert!(bad_type.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[rewrite\nmarker_type=").unwrap_err();
        assert!(matches!(err, HasherError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[rewrite]\nmin_data_length = 50\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.min_data_length(), 50);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, HasherError::ConfigError { .. }));
    }
}
