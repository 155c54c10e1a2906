pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{resolved::RunConfig, toml_config::TomlConfig};
pub use crate::core::{
    driver::StreamDriver,
    engine::SanitizeEngine,
    hasher::Sha256Hasher,
    rewriter::{rewrite, MarkerRule},
};
pub use domain::model::{LineOutcome, RunSummary, StreamStats};
pub use domain::ports::{ConfigProvider, PayloadHasher};
pub use utils::error::{HasherError, Result};
