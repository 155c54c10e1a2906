/// 將 payload 文字轉成固定長度摘要的雜湊函式
pub trait PayloadHasher: Send + Sync {
    fn digest(&self, payload: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn marker_type(&self) -> &str;
    fn min_data_length(&self) -> usize;
    fn output_dir(&self) -> &str;
    fn output_suffix(&self) -> &str;
}
