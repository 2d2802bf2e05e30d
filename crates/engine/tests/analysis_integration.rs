use argus_core::common::TickerSymbol;
use argus_core::market::entity::PriceBar;
use argus_core::market::error::MarketError;
use argus_core::market::port::{HistoryWindow, MarketDataProvider};
use argus_core::notify::error::NotifyError;
use argus_core::notify::port::{Delivery, Notifier};
use argus_core::signal::entity::{FeatureVector, TrainingPair};
use argus_core::signal::error::SignalError;
use argus_core::signal::port::Predictor;
use argus_core::universe::port::TickerUniverse;
use argus_engine::alert::{AlertDispatcher, DIGEST_SUBJECT, DispatchOutcome};
use argus_engine::analysis::Analyzer;
use argus_notify::email::EmailNotifier;
use argus_signal::logistic::LogisticPredictor;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn sym(s: &str) -> TickerSymbol {
    TickerSymbol::new(s).unwrap()
}

fn flat(close: f64, len: usize) -> Vec<PriceBar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0i64..)
        .take(len)
        .map(|i| PriceBar::close_only(start + Duration::days(i), close))
        .collect()
}

/// # Summary
/// 模拟行情源：按代码返回预设序列，未登记的代码返回网络错误。
struct MockProvider {
    series: HashMap<String, Vec<PriceBar>>,
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        _: HistoryWindow,
    ) -> Result<Vec<PriceBar>, MarketError> {
        self.series
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| MarketError::Network("connection reset".into()))
    }
}

struct MockUniverse(Vec<TickerSymbol>);

#[async_trait]
impl TickerUniverse for MockUniverse {
    async fn load(&self) -> Vec<TickerSymbol> {
        self.0.clone()
    }
}

/// # Summary
/// 按实时特征的 MA5 查表返回概率，便于断言排序与格式。
struct TablePredictor;

impl Predictor for TablePredictor {
    fn fit_and_score(&self, _: &[TrainingPair], live: &FeatureVector) -> Result<f64, SignalError> {
        match live.ma5 {
            m if m == 10.0 => Ok(0.82),
            m if m == 20.0 => Ok(0.41),
            m if m == 30.0 => Ok(0.41),
            _ => Err(SignalError::NonFinite("probability")),
        }
    }
}

/// # Summary
/// 记录所有投递请求的通知器。
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, to: &str, subject: &str, content: &str) -> Result<Delivery, NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.into(), subject.into(), content.into()));
        Ok(Delivery::Sent)
    }
}

fn analyzer(
    series: Vec<(&str, Vec<PriceBar>)>,
    universe: &[&str],
    predictor: Arc<dyn Predictor>,
    notifier: Arc<dyn Notifier>,
) -> Analyzer {
    let provider = MockProvider {
        series: series
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    };
    Analyzer::new(
        Arc::new(provider),
        Arc::new(MockUniverse(universe.iter().map(|s| sym(s)).collect())),
        predictor,
        AlertDispatcher::new(notifier, "u@x.com"),
        60,
        5,
    )
}

#[tokio::test]
async fn test_digest_lists_results_by_probability() -> anyhow::Result<()> {
    let notifier = Arc::new(RecordingNotifier::default());
    let analyzer = analyzer(
        vec![("AAA", flat(10.0, 30)), ("BBB", flat(20.0, 30))],
        &["BBB", "AAA"],
        Arc::new(TablePredictor),
        notifier.clone(),
    );

    let report = analyzer.run().await;

    assert_eq!(report.dispatch, Some(DispatchOutcome::Sent));
    let tickers: Vec<_> = report.ranked.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAA", "BBB"]);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (to, subject, body) = &sent[0];
    assert_eq!(to, "u@x.com");
    assert_eq!(subject, DIGEST_SUBJECT);
    assert_eq!(body, "AAA: 82.00% (close 10.00)\nBBB: 41.00% (close 20.00)");
    Ok(())
}

#[tokio::test]
async fn test_equal_probabilities_keep_universe_order() {
    let notifier = Arc::new(RecordingNotifier::default());
    let analyzer = analyzer(
        vec![("CCC", flat(30.0, 30)), ("BBB", flat(20.0, 30))],
        &["CCC", "BBB"],
        Arc::new(TablePredictor),
        notifier,
    );

    let report = analyzer.run().await;
    let tickers: Vec<_> = report.ranked.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["CCC", "BBB"]);
}

#[tokio::test]
async fn test_failing_tickers_are_excluded_not_fatal() {
    let notifier = Arc::new(RecordingNotifier::default());
    let analyzer = analyzer(
        vec![
            ("AAA", flat(10.0, 30)),
            // 预测器对 MA5 = 50 返回错误
            ("BAD", flat(50.0, 30)),
        ],
        // NET 没有登记序列，行情源返回网络错误
        &["NET", "AAA", "BAD"],
        Arc::new(TablePredictor),
        notifier.clone(),
    );

    let report = analyzer.run().await;

    assert_eq!(report.ranked.len(), 1);
    assert_eq!(report.ranked[0].ticker, sym("AAA"));
    assert_eq!(report.failed, vec![sym("NET"), sym("BAD")]);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_short_history_is_skipped() {
    let notifier = Arc::new(RecordingNotifier::default());
    let analyzer = analyzer(
        vec![("AAA", flat(10.0, 30)), ("NEW", flat(10.0, 14))],
        &["AAA", "NEW"],
        Arc::new(TablePredictor),
        notifier,
    );

    let report = analyzer.run().await;
    assert_eq!(report.skipped, vec![sym("NEW")]);
    assert!(report.failed.is_empty());
    assert_eq!(report.ranked.len(), 1);
}

#[tokio::test]
async fn test_empty_universe_sends_nothing() {
    let notifier = Arc::new(RecordingNotifier::default());
    let analyzer = analyzer(vec![], &[], Arc::new(TablePredictor), notifier.clone());

    let report = analyzer.run().await;
    assert!(report.ranked.is_empty());
    assert_eq!(report.dispatch, None);
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_only_top_five_reach_the_digest() {
    let notifier = Arc::new(RecordingNotifier::default());
    let names = ["T1", "T2", "T3", "T4", "T5", "T6", "T7"];
    let series = names.iter().map(|n| (*n, flat(10.0, 30))).collect();
    let analyzer = analyzer(series, &names, Arc::new(TablePredictor), notifier.clone());

    let report = analyzer.run().await;
    assert_eq!(report.ranked.len(), 5);
    let tickers: Vec<_> = report.ranked.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["T1", "T2", "T3", "T4", "T5"]);
    assert_eq!(notifier.sent.lock().unwrap()[0].2.lines().count(), 5);
}

#[tokio::test]
async fn test_missing_credentials_still_produce_results() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let zigzag: Vec<PriceBar> = (0..40)
        .map(|i| {
            let close = 100.0 + f64::from(i % 3) - f64::from(i % 5) * 0.5;
            PriceBar::close_only(start + Duration::days(i64::from(i)), close)
        })
        .collect();

    let analyzer = analyzer(
        vec![("AAA", zigzag)],
        &["AAA"],
        Arc::new(LogisticPredictor::default()),
        Arc::new(EmailNotifier::disabled()),
    );

    let report = analyzer.run().await;
    assert_eq!(report.ranked.len(), 1);
    let p = report.ranked[0].probability_up;
    assert!((0.0..=1.0).contains(&p));
    assert_eq!(report.dispatch, Some(DispatchOutcome::Skipped));
}
