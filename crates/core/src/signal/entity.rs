use crate::common::TickerSymbol;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单个时间步的特征向量 `{return, rsi, ma5, ma10}`。
///
/// # Invariants
/// - 所有字段均为有限值；含未定义值的行在构造前即被剔除。
/// - 字段顺序固定，`to_array` 的输出顺序与声明顺序一致。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    // 相对前一收盘价的简单收益率
    pub ret: f64,
    // 14 周期 RSI，取值 [0, 100]
    pub rsi: f64,
    // 5 周期收盘均线
    pub ma5: f64,
    // 10 周期收盘均线
    pub ma10: f64,
}

impl FeatureVector {
    /// 特征维度
    pub const WIDTH: usize = 4;

    pub fn to_array(&self) -> [f64; Self::WIDTH] {
        [self.ret, self.rsi, self.ma5, self.ma10]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// # Summary
/// 二分类标签：下一根 K 线收盘价是否高于当前收盘价。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Down,
    Up,
}

impl Label {
    /// 严格大于才记为上涨，持平记为下跌
    pub fn from_closes(current: f64, next: f64) -> Self {
        if next > current { Label::Up } else { Label::Down }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Label::Up => 1.0,
            Label::Down => 0.0,
        }
    }
}

/// # Summary
/// 一条训练样本。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPair {
    pub features: FeatureVector,
    pub label: Label,
}

/// # Summary
/// 特征提取的完整产出：训练集、预留的实时特征行及其收盘价。
///
/// # Invariants
/// - `live` 对应序列中最后一个有效行，不出现在 `training` 中。
/// - `training` 至少包含一条样本。
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub training: Vec<TrainingPair>,
    pub live: FeatureVector,
    pub last_close: f64,
}

/// # Summary
/// 单只证券的一次预测结果，仅在本次分析内有效，不持久化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub ticker: TickerSymbol,
    // 下一周期收盘上涨的概率，[0, 1]
    pub probability_up: f64,
    pub last_close: f64,
}
