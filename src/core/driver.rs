use crate::core::rewriter::{self, MarkerRule};
use crate::core::{ConfigProvider, LineOutcome, PayloadHasher, RunSummary, StreamStats};
use crate::utils::error::{HasherError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

pub const INPUT_EXTENSION: &str = ".jsonl";
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".hashed.jsonl";

/// 逐行讀取 JSON Lines，改寫後依序寫出；解析失敗的行原樣保留
pub struct StreamDriver<H: PayloadHasher> {
    rule: MarkerRule,
    hasher: H,
    output_suffix: String,
}

impl<H: PayloadHasher> StreamDriver<H> {
    pub fn new(rule: MarkerRule, hasher: H) -> Self {
        Self {
            rule,
            hasher,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, hasher: H) -> Self {
        Self::new(
            MarkerRule::new(config.marker_type(), config.min_data_length()),
            hasher,
        )
        .with_output_suffix(config.output_suffix())
    }

    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    pub fn rule(&self) -> &MarkerRule {
        &self.rule
    }

    /// `<output_dir>/<輸入檔名去掉 .jsonl><suffix>`
    pub fn output_path_for(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name
            .strip_suffix(INPUT_EXTENSION)
            .unwrap_or(&file_name);

        output_dir.join(format!("{}{}", stem, self.output_suffix))
    }

    /// 處理第 `line_number` 行（不含換行符），將結果寫入 `out`
    pub fn process_line(&self, line_number: u64, line: &[u8], out: &mut Vec<u8>) -> Result<LineOutcome> {
        match parse_record(line) {
            Ok(mut record) => {
                let payloads_hashed = rewriter::rewrite(&mut record, &self.rule, &self.hasher);
                if payloads_hashed > 0 {
                    tracing::debug!(line = line_number, payloads_hashed, "Hashed payloads");
                }
                serde_json::to_writer(&mut *out, &record)?;
                out.push(b'\n');
                Ok(LineOutcome::Transformed { payloads_hashed })
            }
            Err(e) => {
                tracing::warn!(line = line_number, "Failed to parse line, passing through: {}", e);
                out.extend_from_slice(line);
                out.push(b'\n');
                Ok(LineOutcome::Passthrough)
            }
        }
    }

    /// 串流處理：每行寫出後才讀下一行，記憶體用量只與單行大小有關
    pub async fn process_stream<R, W>(&self, mut reader: R, writer: &mut W) -> Result<StreamStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stats = StreamStats::default();
        let mut line = Vec::new();
        let mut out = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }

            out.clear();
            let outcome = self.process_line(stats.total_lines + 1, trim_line_ending(&line), &mut out)?;
            writer.write_all(&out).await?;
            stats.record(outcome);
        }

        writer.flush().await?;
        Ok(stats)
    }

    /// 完整執行一次：檢查輸入、建立輸出目錄、串流處理、統計檔案大小
    pub async fn process(&self, input: &Path, output_dir: &Path) -> Result<RunSummary> {
        match fs::try_exists(input).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(HasherError::InputNotFound {
                    path: input.to_path_buf(),
                })
            }
            Err(e) => return Err(HasherError::io_at(input, e)),
        }

        // 輸出檔不可覆寫輸入檔
        let output_path = self.output_path_for(input, output_dir);
        if is_same_file(input, &output_path).await? {
            return Err(HasherError::ConfigValidationError {
                field: "output_path".to_string(),
                message: format!(
                    "output {} would overwrite the input file",
                    output_path.display()
                ),
            });
        }

        fs::create_dir_all(output_dir)
            .await
            .map_err(|e| HasherError::io_at(output_dir, e))?;

        tracing::debug!("Writing to {}", output_path.display());

        let input_file = File::open(input)
            .await
            .map_err(|e| HasherError::io_at(input, e))?;
        let output_file = File::create(&output_path)
            .await
            .map_err(|e| HasherError::io_at(&output_path, e))?;

        let mut writer = BufWriter::new(output_file);
        let stats = self
            .process_stream(BufReader::new(input_file), &mut writer)
            .await?;
        writer
            .shutdown()
            .await
            .map_err(|e| HasherError::io_at(&output_path, e))?;

        let input_bytes = fs::metadata(input)
            .await
            .map_err(|e| HasherError::io_at(input, e))?
            .len();
        let output_bytes = fs::metadata(&output_path)
            .await
            .map_err(|e| HasherError::io_at(&output_path, e))?
            .len();

        Ok(RunSummary::new(
            input.to_path_buf(),
            output_path,
            stats,
            input_bytes,
            output_bytes,
        ))
    }
}

/// 去掉行尾的 `\n` 或 `\r\n`
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// 解析單行 JSON；關閉遞迴上限並在需要時擴充堆疊，巢狀深度不受限制
fn parse_record(line: &[u8]) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_slice(line);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

async fn is_same_file(input: &Path, output: &Path) -> Result<bool> {
    let input = fs::canonicalize(input)
        .await
        .map_err(|e| HasherError::io_at(input, e))?;

    // 輸出路徑尚不存在時必然與輸入不同
    match fs::canonicalize(output).await {
        Ok(output) => Ok(input == output),
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::Sha256Hasher;

    fn driver() -> StreamDriver<Sha256Hasher> {
        StreamDriver::new(MarkerRule::default(), Sha256Hasher)
    }

    async fn run(input: &[u8]) -> (StreamStats, String) {
        let mut output = Vec::new();
        let stats = driver().process_stream(input, &mut output).await.unwrap();
        (stats, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending(b"{}\n"), b"{}");
        assert_eq!(trim_line_ending(b"{}\r\n"), b"{}");
        assert_eq!(trim_line_ending(b"{}"), b"{}");
        assert_eq!(trim_line_ending(b"\n"), b"");
    }

    #[test]
    fn test_output_path_for() {
        let d = driver();
        let dir = Path::new("/tmp/out");
        assert_eq!(
            d.output_path_for(Path::new("logs/session.jsonl"), dir),
            PathBuf::from("/tmp/out/session.hashed.jsonl")
        );
        assert_eq!(
            d.output_path_for(Path::new("logs/session.txt"), dir),
            PathBuf::from("/tmp/out/session.txt.hashed.jsonl")
        );

        let custom = driver().with_output_suffix(".clean.jsonl");
        assert_eq!(
            custom.output_path_for(Path::new("a.jsonl"), dir),
            PathBuf::from("/tmp/out/a.clean.jsonl")
        );
    }

    #[tokio::test]
    async fn test_malformed_line_passthrough() {
        let (stats, output) = run(b"{\"foo\": }\n").await;

        assert_eq!(output, "{\"foo\": }\n");
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.lines_processed, 0);
        assert_eq!(stats.total_lines, 1);
    }

    #[tokio::test]
    async fn test_crlf_and_missing_final_newline() {
        let (stats, output) = run(b"{\"a\":1}\r\n{\"b\":2}\r\n{\"c\":3}").await;

        assert_eq!(output, "{\"a\":1}\n{\"b\":2}\n{\"c\":3}\n");
        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.lines_processed, 3);
    }

    #[tokio::test]
    async fn test_line_count_preserved_with_blank_lines() {
        let input = b"{\"a\":1}\n\n[1,2]\nnope\n";
        let (stats, output) = run(input).await;

        assert_eq!(output.lines().count(), 4);
        assert_eq!(stats.total_lines, 4);
        assert_eq!(stats.lines_processed, 2);
        assert_eq!(stats.error_count, 2);
        assert_eq!(stats.total_lines, stats.lines_processed + stats.error_count);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_passthrough() {
        let input: &[u8] = b"\xff\xfe{}\n{\"ok\":true}\n";
        let mut output = Vec::new();
        let stats = driver().process_stream(input, &mut output).await.unwrap();

        assert_eq!(&output[..5], b"\xff\xfe{}\n");
        assert_eq!(&output[5..], b"{\"ok\":true}\n");
        assert_eq!(stats.error_count, 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (stats, output) = run(b"").await;
        assert_eq!(stats, StreamStats::default());
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_payload_count() {
        let data = "x".repeat(120);
        let input = format!(
            "{{\"content\":[{{\"type\":\"base64\",\"data\":\"{0}\"}},{{\"type\":\"base64\",\"data\":\"{0}\"}}]}}\n",
            data
        );
        let (stats, output) = run(input.as_bytes()).await;

        assert_eq!(stats.payloads_hashed, 2);
        assert!(!output.contains(&data));
        assert_eq!(output.matches(&Sha256Hasher.digest(&data)).count(), 2);
    }

    #[test]
    fn test_parse_record_rejects_trailing_data() {
        assert!(parse_record(b"{\"a\":1}").is_ok());
        assert!(parse_record(b"{\"a\":1} trailing").is_err());
        assert!(parse_record(b"").is_err());
    }

    #[tokio::test]
    async fn test_marker_nested_deeper_than_default_limit() {
        let data = "x".repeat(120);
        let line = format!(
            "{}{{\"type\":\"base64\",\"data\":\"{}\"}}{}\n",
            "[".repeat(300),
            data,
            "]".repeat(300)
        );
        let (stats, output) = run(line.as_bytes()).await;

        assert_eq!(stats.lines_processed, 1);
        assert_eq!(stats.error_count, 0);
        assert_eq!(stats.payloads_hashed, 1);
        assert!(!output.contains(&data));
        assert!(output.contains(&Sha256Hasher.digest(&data)));
        assert!(output.starts_with(&"[".repeat(300)));
        assert!(output.ends_with(&format!("{}\n", "]".repeat(300))));
    }
}
