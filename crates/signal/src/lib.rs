//! # `argus-signal` - 信号生成
//!
//! 纯计算层：技术指标、特征提取、逐证券逻辑回归预测与机会排序。
//! 不做任何 IO，全部为同步函数，便于在分析管线中逐证券调用。

pub mod features;
pub mod indicators;
pub mod logistic;
pub mod rank;

/// usize 转 f64，序列长度远小于 2^52，不会丢失精度。
#[allow(clippy::cast_precision_loss)]
pub(crate) fn count_as_f64(n: usize) -> f64 {
    n as f64
}
