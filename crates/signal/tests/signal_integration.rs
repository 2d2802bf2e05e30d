use argus_core::common::TickerSymbol;
use argus_core::market::entity::PriceBar;
use argus_core::signal::entity::PredictionResult;
use argus_core::signal::port::Predictor;
use argus_signal::features::{MIN_BARS, RSI_PERIOD, extract};
use argus_signal::logistic::LogisticPredictor;
use argus_signal::rank::{TOP_N, rank};
use chrono::{Duration, TimeZone, Utc};

/// 生成带周期扰动的确定性价格序列
fn synthetic_series(n: usize, drift: f64) -> Vec<PriceBar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0u32..)
        .take(n)
        .map(|i| {
            let t = f64::from(i);
            let close = 50.0 + drift * t + 2.0 * (t * 0.7).sin();
            PriceBar::close_only(start + Duration::days(i64::from(i)), close)
        })
        .collect()
}

/// # Summary
/// 不同长度序列下训练样本数量的性质检查。
///
/// # Logic
/// 1. 少于 15 根时必为 None。
/// 2. 其余长度下，样本数 = 有效行数 - 1（最后一行预留为实时特征）。
#[test]
fn test_training_pair_count_across_lengths() {
    for n in 0..80 {
        let result = extract(&synthetic_series(n, 0.1));
        if n < MIN_BARS {
            assert!(result.is_none(), "n = {}", n);
            continue;
        }
        let set = result.expect("series long enough");
        let valid_rows = n - (RSI_PERIOD - 1);
        assert_eq!(set.training.len(), valid_rows - 1, "n = {}", n);
    }
}

/// # Summary
/// 从原始序列到排序结果的完整计算链路。
///
/// # Logic
/// 1. 为三只证券生成不同走势的序列。
/// 2. 各自独立提取特征并拟合模型。
/// 3. 排序后概率单调不增，且均位于 [0, 1]。
#[test]
fn test_extract_predict_rank_chain() -> anyhow::Result<()> {
    let predictor = LogisticPredictor::default();
    let mut results = Vec::new();

    for (symbol, drift) in [("UP", 0.5), ("FLAT", 0.0), ("DOWN", -0.5)] {
        let set = extract(&synthetic_series(60, drift)).expect("60 bars are enough");
        let probability_up = predictor.fit_and_score(&set.training, &set.live)?;
        results.push(PredictionResult {
            ticker: TickerSymbol::new(symbol).expect("valid symbol"),
            probability_up,
            last_close: set.last_close,
        });
    }

    let ranked = rank(results, TOP_N);
    assert_eq!(ranked.len(), 3);
    assert!(ranked.iter().all(|r| (0.0..=1.0).contains(&r.probability_up)));
    assert!(
        ranked
            .windows(2)
            .all(|w| w[0].probability_up >= w[1].probability_up)
    );
    Ok(())
}

/// 同一输入两次打分结果一致：模型不跨调用保留状态
#[test]
fn test_predictor_is_stateless() -> anyhow::Result<()> {
    let predictor = LogisticPredictor::default();
    let a = extract(&synthetic_series(60, 0.3)).expect("enough bars");
    let b = extract(&synthetic_series(60, -0.3)).expect("enough bars");

    let first = predictor.fit_and_score(&a.training, &a.live)?;
    let _other = predictor.fit_and_score(&b.training, &b.live)?;
    let again = predictor.fit_and_score(&a.training, &a.live)?;

    assert_eq!(first, again);
    Ok(())
}
