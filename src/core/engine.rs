use crate::core::driver::StreamDriver;
use crate::core::{PayloadHasher, RunSummary};
use crate::utils::error::Result;
use std::path::Path;
use std::time::Instant;

pub struct SanitizeEngine<H: PayloadHasher> {
    driver: StreamDriver<H>,
}

impl<H: PayloadHasher> SanitizeEngine<H> {
    pub fn new(driver: StreamDriver<H>) -> Self {
        Self { driver }
    }

    pub async fn run(&self, input: &Path, output_dir: &Path) -> Result<RunSummary> {
        let started = Instant::now();
        let rule = self.driver.rule();
        tracing::info!(
            "Hashing '{}' payloads longer than {} chars in {}",
            rule.marker_type,
            rule.min_data_length,
            input.display()
        );

        let summary = match self.driver.process(input, output_dir).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Run failed for {}: {}", input.display(), e);
                return Err(e);
            }
        };

        if summary.error_count > 0 {
            tracing::warn!(
                "{} of {} lines could not be parsed and were copied verbatim",
                summary.error_count,
                summary.total_lines
            );
        }
        tracing::info!(
            lines = summary.total_lines,
            processed = summary.lines_processed,
            errors = summary.error_count,
            payloads = summary.payloads_hashed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Finished writing {}",
            summary.output_path.display()
        );

        Ok(summary)
    }
}
