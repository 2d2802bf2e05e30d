use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根价格 K 线，记录特定时段的收盘价及可选的开高低量。
///
/// # Invariants
/// - 同一证券的序列按 `time` 严格递增，不存在重复时间戳。
/// - `close` 恒存在；其余字段视数据源而定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    // K 线开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: Option<f64>,
    // 最高价
    pub high: Option<f64>,
    // 最低价
    pub low: Option<f64>,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: Option<f64>,
}

impl PriceBar {
    /// 仅含收盘价的 K 线，主要用于测试与合成数据。
    pub fn close_only(time: DateTime<Utc>, close: f64) -> Self {
        Self {
            time,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}
