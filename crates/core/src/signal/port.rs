use crate::signal::entity::{FeatureVector, TrainingPair};
use crate::signal::error::SignalError;

/// # Summary
/// 单证券概率预测策略。
///
/// # Invariants
/// - 无状态：每次调用独立拟合新模型，模型状态不跨证券、不跨运行。
/// - 返回值恒在 [0, 1] 区间内。
pub trait Predictor: Send + Sync {
    /// # Summary
    /// 在训练样本上拟合分类器，并对实时特征行打分。
    ///
    /// # Arguments
    /// * `training`: 该证券自身历史构成的训练样本。
    /// * `live`: 预留的最新特征行。
    ///
    /// # Returns
    /// 成功返回下一周期上涨概率。
    fn fit_and_score(
        &self,
        training: &[TrainingPair],
        live: &FeatureVector,
    ) -> Result<f64, SignalError>;
}
