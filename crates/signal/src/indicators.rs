//! 与输入等长对齐的技术指标，预热期内的值为 `None`。

use crate::count_as_f64;

/// 简单收益率：相对前一收盘价的百分比变化，首个元素无定义。
pub fn pct_change(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i == 0 || closes[i - 1] == 0.0 {
            out.push(None);
        } else {
            out.push(Some(closes[i] / closes[i - 1] - 1.0));
        }
    }
    out
}

/// 简单移动平均，前 `period - 1` 个元素无定义。
pub fn sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut out = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i + 1 < period {
            out.push(None);
        } else {
            let sum: f64 = closes[i + 1 - period..=i].iter().sum();
            out.push(Some(sum / count_as_f64(period)));
        }
    }
    out
}

/// # Summary
/// Wilder 平滑的相对强弱指数 (RSI)。
///
/// # Logic
/// 1. 逐步计算收盘价差，拆分为涨幅与跌幅，首个元素视为零变化。
/// 2. 以 `alpha = 1 / period` 做递推指数平滑，首值作为种子。
/// 3. 累计满 `period` 个观测后才输出数值。
/// 4. 平均跌幅为零时 RSI 记为 100。
///
/// # Arguments
/// * `closes`: 按时间升序的收盘价。
/// * `period`: 回看周期，通常为 14。
///
/// # Returns
/// 与输入等长的 RSI 序列，取值 [0, 100]。
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let alpha = 1.0 / count_as_f64(period);
    let mut out = Vec::with_capacity(closes.len());
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
            avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;
        }

        if i + 1 < period {
            out.push(None);
        } else if avg_loss == 0.0 {
            out.push(Some(100.0));
        } else {
            let rs = avg_gain / avg_loss;
            out.push(Some(100.0 - 100.0 / (1.0 + rs)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_pct_change() {
        let out = pct_change(&[100.0, 110.0, 99.0]);
        assert_eq!(out[0], None);
        assert!(approx(out[1].unwrap(), 0.10));
        assert!(approx(out[2].unwrap(), -0.10));
    }

    #[test]
    fn test_sma_alignment() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 5);
        assert_eq!(out.len(), 6);
        assert!(out[..4].iter().all(|v| v.is_none()));
        assert!(approx(out[4].unwrap(), 3.0));
        assert!(approx(out[5].unwrap(), 4.0));
    }

    #[test]
    fn test_sma_shorter_than_period() {
        assert!(sma(&[1.0, 2.0], 5).iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_warmup_is_period_minus_one() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + f64::from(i % 3)).collect();
        let out = rsi(&closes, 14);
        assert!(out[..13].iter().all(|v| v.is_none()));
        assert!(out[13..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_rsi_monotonic_rise_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + f64::from(i)).collect();
        let out = rsi(&closes, 14);
        assert!(approx(out[19].unwrap(), 100.0));
    }

    #[test]
    fn test_rsi_monotonic_fall_is_0() {
        let closes: Vec<f64> = (0..20).map(|i| 200.0 - f64::from(i)).collect();
        let out = rsi(&closes, 14);
        assert!(approx(out[19].unwrap(), 0.0));
    }

    #[test]
    fn test_rsi_bounded() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        for v in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
