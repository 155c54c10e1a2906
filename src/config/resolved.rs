use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

/// 合併命令列與設定檔後的最終設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub marker_type: String,
    pub min_data_length: usize,
    pub output_dir: String,
    pub output_suffix: String,
    pub log_level: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::resolve(None, &TomlConfig::default())
    }
}

impl RunConfig {
    /// 輸出目錄優先順序：命令列參數 > 設定檔 > 預設值
    pub fn resolve(cli_output_dir: Option<&str>, file: &TomlConfig) -> Self {
        let output_dir = cli_output_dir.unwrap_or_else(|| file.output_dir());

        Self {
            marker_type: file.marker_type().to_string(),
            min_data_length: file.min_data_length(),
            output_dir: output_dir.to_string(),
            output_suffix: file.output_suffix().to_string(),
            log_level: file.log_level().map(str::to_string),
        }
    }
}

impl ConfigProvider for RunConfig {
    fn marker_type(&self) -> &str {
        &self.marker_type
    }

    fn min_data_length(&self) -> usize {
        self.min_data_length
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn output_suffix(&self) -> &str {
        &self.output_suffix
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("marker_type", &self.marker_type)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_file_suffix("output_suffix", &self.output_suffix)?;
        if let Some(level) = &self.log_level {
            validation::validate_log_level("log_level", level)?;
        }
        Ok(())
    }
}
