use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// 單行處理結果：成功改寫，或解析失敗原樣輸出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Transformed { payloads_hashed: usize },
    Passthrough,
}

/// 串流層級的計數，不含檔案路徑與大小
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub total_lines: u64,
    pub lines_processed: u64,
    pub error_count: u64,
    pub payloads_hashed: u64,
}

impl StreamStats {
    pub fn record(&mut self, outcome: LineOutcome) {
        self.total_lines += 1;
        match outcome {
            LineOutcome::Transformed { payloads_hashed } => {
                self.lines_processed += 1;
                self.payloads_hashed += payloads_hashed as u64;
            }
            LineOutcome::Passthrough => self.error_count += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub total_lines: u64,
    pub lines_processed: u64,
    pub error_count: u64,
    pub payloads_hashed: u64,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl RunSummary {
    pub fn new(
        input_path: PathBuf,
        output_path: PathBuf,
        stats: StreamStats,
        input_bytes: u64,
        output_bytes: u64,
    ) -> Self {
        Self {
            input_path,
            output_path,
            total_lines: stats.total_lines,
            lines_processed: stats.lines_processed,
            error_count: stats.error_count,
            payloads_hashed: stats.payloads_hashed,
            input_bytes,
            output_bytes,
        }
    }

    pub fn input_mb(&self) -> f64 {
        self.input_bytes as f64 / BYTES_PER_MB
    }

    pub fn output_mb(&self) -> f64 {
        self.output_bytes as f64 / BYTES_PER_MB
    }

    /// 輸出相對輸入縮小的百分比；輸入為空時回傳 0
    pub fn reduction_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.output_bytes as f64 / self.input_bytes as f64) * 100.0
    }
}
