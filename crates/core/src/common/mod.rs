use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod time;

/// # Summary
/// 证券代码，系统内标的的唯一身份标识。
///
/// # Invariants
/// - 加载后不可变。
/// - 不允许为空串，首尾空白在构造时去除。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// # Summary
    /// 从任意字符串构造证券代码。
    ///
    /// # Logic
    /// 1. 去除首尾空白。
    /// 2. 空串返回 None。
    ///
    /// # Arguments
    /// * `raw`: 原始代码文本。
    ///
    /// # Returns
    /// 合法时返回 TickerSymbol。
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("Invalid ticker symbol: {:?}", value))
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

impl FromStr for TickerSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| format!("Invalid ticker symbol: {:?}", s))
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// # Summary
/// 按首次出现顺序去重证券代码列表。
///
/// # Logic
/// 1. 顺序遍历输入。
/// 2. 已出现过的代码直接丢弃。
///
/// # Arguments
/// * `symbols`: 可能含重复项的代码序列。
///
/// # Returns
/// 去重后的有序列表。
pub fn dedup_symbols<I>(symbols: I) -> Vec<TickerSymbol>
where
    I: IntoIterator<Item = TickerSymbol>,
{
    let mut seen = std::collections::HashSet::new();
    symbols
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// # Summary
/// K 线周期。每日分析用日线，盯盘用当日分钟线取最新价。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    Minute1,
    Day1,
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFrame::Minute1 => write!(f, "1m"),
            TimeFrame::Day1 => write!(f, "1d"),
        }
    }
}
