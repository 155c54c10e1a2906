use crate::core::PayloadHasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_MARKER_TYPE: &str = "base64";
pub const DEFAULT_MIN_DATA_LENGTH: usize = 100;

/// 判斷物件是否為二進位 payload：`type` 等於 `marker_type`，且 `data` 為長度超過門檻的字串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRule {
    pub marker_type: String,
    pub min_data_length: usize,
}

impl Default for MarkerRule {
    fn default() -> Self {
        Self {
            marker_type: DEFAULT_MARKER_TYPE.to_string(),
            min_data_length: DEFAULT_MIN_DATA_LENGTH,
        }
    }
}

impl MarkerRule {
    pub fn new(marker_type: impl Into<String>, min_data_length: usize) -> Self {
        Self {
            marker_type: marker_type.into(),
            min_data_length,
        }
    }

    /// 門檻以字元數計算，等於門檻時不算
    pub fn matches<'a>(&self, object: &'a serde_json::Map<String, Value>) -> Option<&'a str> {
        let is_marker = matches!(
            object.get("type"),
            Some(Value::String(t)) if *t == self.marker_type
        );
        if !is_marker {
            return None;
        }

        match object.get("data") {
            Some(Value::String(data)) if data.chars().count() > self.min_data_length => {
                Some(data.as_str())
            }
            _ => None,
        }
    }
}

/// 深度優先、前序走訪整棵值樹，將符合規則的 `data` 換成摘要，回傳替換次數。
/// 使用顯式堆疊，巢狀深度不受呼叫堆疊限制。
pub fn rewrite<H: PayloadHasher + ?Sized>(value: &mut Value, rule: &MarkerRule, hasher: &H) -> usize {
    let mut replaced = 0;
    let mut pending: Vec<&mut Value> = vec![value];

    while let Some(node) = pending.pop() {
        match node {
            Value::Array(items) => pending.extend(items.iter_mut().rev()),
            Value::Object(object) => {
                if let Some(data) = rule.matches(object) {
                    let digest = hasher.digest(data);
                    object.insert("data".to_string(), Value::String(digest));
                    replaced += 1;
                }

                // 命中後仍繼續走訪所有欄位
                pending.extend(object.values_mut().rev());
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    replaced
}
