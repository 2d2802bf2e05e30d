use thiserror::Error;

/// # Summary
/// 模型训练与打分错误枚举。
///
/// # Invariants
/// - 单类别训练集与未收敛不属于错误，仍应产出有效概率。
#[derive(Error, Debug, PartialEq)]
pub enum SignalError {
    // 训练集为空，无法拟合
    #[error("Training set is empty")]
    EmptyTrainingSet,
    // 特征维度不一致
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    // 输入中出现 NaN 或无穷值
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}
