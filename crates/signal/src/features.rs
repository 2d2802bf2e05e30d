use crate::indicators::{pct_change, rsi, sma};
use argus_core::market::entity::PriceBar;
use argus_core::signal::entity::{FeatureSet, FeatureVector, Label, TrainingPair};

/// 参与特征提取所需的最少 K 线数
pub const MIN_BARS: usize = 15;
/// 剔除预热行后所需的最少有效行数 (一条样本 + 一行实时特征)
pub const MIN_ROWS: usize = 2;
pub const RSI_PERIOD: usize = 14;
pub const FAST_MA: usize = 5;
pub const SLOW_MA: usize = 10;

/// # Summary
/// 将一段价格序列转换为训练样本与实时特征行。
///
/// # Logic
/// 1. 少于 `MIN_BARS` 根 K 线直接返回 None。
/// 2. 逐步计算收益率、RSI(14)、MA5、MA10。
/// 3. 丢弃任一特征未定义或非有限的行。
/// 4. 有效行少于 `MIN_ROWS` 时返回 None。
/// 5. 最后一行预留为实时特征，其余各行与下一有效行比较收盘价生成标签。
///
/// # Arguments
/// * `series`: 按时间升序排列的 K 线。
///
/// # Returns
/// 数据充足时返回 `FeatureSet`，否则返回 None（不属于错误）。
pub fn extract(series: &[PriceBar]) -> Option<FeatureSet> {
    if series.len() < MIN_BARS {
        return None;
    }

    let closes: Vec<f64> = series.iter().map(|b| b.close).collect();
    let returns = pct_change(&closes);
    let rsi_values = rsi(&closes, RSI_PERIOD);
    let fast = sma(&closes, FAST_MA);
    let slow = sma(&closes, SLOW_MA);

    // (特征, 收盘价)
    let rows: Vec<(FeatureVector, f64)> = (0..closes.len())
        .filter_map(|i| {
            let features = FeatureVector {
                ret: returns[i]?,
                rsi: rsi_values[i]?,
                ma5: fast[i]?,
                ma10: slow[i]?,
            };
            (features.is_finite() && closes[i].is_finite()).then_some((features, closes[i]))
        })
        .collect();

    if rows.len() < MIN_ROWS {
        return None;
    }

    let (live, last_close) = *rows.last()?;
    let training = rows
        .windows(2)
        .map(|pair| TrainingPair {
            features: pair[0].0,
            label: Label::from_closes(pair[0].1, pair[1].1),
        })
        .collect();

    Some(FeatureSet {
        training,
        live,
        last_close,
    })
}
