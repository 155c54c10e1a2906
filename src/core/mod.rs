pub mod driver;
pub mod engine;
pub mod hasher;
pub mod rewriter;

pub use crate::domain::model::{LineOutcome, RunSummary, StreamStats};
pub use crate::domain::ports::{ConfigProvider, PayloadHasher};
pub use crate::utils::error::Result;
