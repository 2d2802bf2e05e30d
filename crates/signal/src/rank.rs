use argus_core::signal::entity::PredictionResult;

/// 每日摘要默认入选数量
pub const TOP_N: usize = 5;

/// # Summary
/// 按上涨概率降序排列并截取前 `top_n` 个。
///
/// # Invariants
/// - 稳定排序：概率相同时保留输入顺序，不引入二级排序键。
///
/// # Arguments
/// * `results`: 本次分析的全部预测结果。
/// * `top_n`: 入选上限。
///
/// # Returns
/// 不超过 `top_n` 条的有序结果；输入为空时返回空列表。
pub fn rank(mut results: Vec<PredictionResult>, top_n: usize) -> Vec<PredictionResult> {
    // sort_by 为稳定排序
    results.sort_by(|a, b| b.probability_up.total_cmp(&a.probability_up));
    results.truncate(top_n);
    results
}
