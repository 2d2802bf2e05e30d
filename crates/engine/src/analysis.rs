use crate::alert::{AlertDispatcher, DispatchOutcome};
use argus_core::common::TickerSymbol;
use argus_core::market::error::MarketError;
use argus_core::market::port::{HistoryWindow, MarketDataProvider};
use argus_core::signal::entity::PredictionResult;
use argus_core::signal::error::SignalError;
use argus_core::signal::port::Predictor;
use argus_core::universe::port::TickerUniverse;
use argus_signal::features::extract;
use argus_signal::rank::rank;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// # Summary
/// 单只证券分析失败的原因。只影响该证券，不会中止整次分析。
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Market data error: {0}")]
    Market(#[from] MarketError),
    #[error("Model error: {0}")]
    Signal(#[from] SignalError),
}

/// # Summary
/// 一次定时分析的汇总。
#[derive(Debug, Default)]
pub struct AnalysisReport {
    // 入选摘要的结果，已按概率降序排列
    pub ranked: Vec<PredictionResult>,
    // 处理出错而被排除的证券
    pub failed: Vec<TickerSymbol>,
    // 数据不足而无结果的证券
    pub skipped: Vec<TickerSymbol>,
    // 摘要投递结果；无结果时为 None
    pub dispatch: Option<DispatchOutcome>,
}

/// # Summary
/// 定时分析管线：标的池 → 特征 → 预测 → 排序 → 摘要。
///
/// # Invariants
/// - 每只证券独立处理，模型状态不跨证券共享。
/// - 排序输出对相同输入是确定的。
pub struct Analyzer {
    provider: Arc<dyn MarketDataProvider>,
    universe: Arc<dyn TickerUniverse>,
    predictor: Arc<dyn Predictor>,
    dispatcher: AlertDispatcher,
    window: HistoryWindow,
    top_n: usize,
}

impl Analyzer {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        universe: Arc<dyn TickerUniverse>,
        predictor: Arc<dyn Predictor>,
        dispatcher: AlertDispatcher,
        history_days: u32,
        top_n: usize,
    ) -> Self {
        Self {
            provider,
            universe,
            predictor,
            dispatcher,
            window: HistoryWindow::daily(history_days),
            top_n,
        }
    }

    /// # Summary
    /// 对单只证券打分。
    ///
    /// # Logic
    /// 1. 拉取日线历史。
    /// 2. 提取特征；数据不足返回 Ok(None)。
    /// 3. 拟合独立模型并对实时特征行打分。
    ///
    /// # Returns
    /// 成功返回预测结果，数据不足返回 None，其余失败返回 AnalysisError。
    pub async fn analyze_ticker(
        &self,
        symbol: &TickerSymbol,
    ) -> Result<Option<PredictionResult>, AnalysisError> {
        let bars = self.provider.fetch_history(symbol, self.window).await?;
        let Some(set) = extract(&bars) else {
            debug!(ticker = %symbol, bars = bars.len(), "Insufficient history");
            return Ok(None);
        };

        let probability_up = self.predictor.fit_and_score(&set.training, &set.live)?;
        Ok(Some(PredictionResult {
            ticker: symbol.clone(),
            probability_up,
            last_close: set.last_close,
        }))
    }

    /// # Summary
    /// 执行一次完整的定时分析。
    ///
    /// # Logic
    /// 1. 加载标的池，空池直接结束。
    /// 2. 顺序处理每只证券，失败记录日志后跳过。
    /// 3. 排序取前 `top_n`，非空时发送摘要。
    pub async fn run(&self) -> AnalysisReport {
        let tickers = self.universe.load().await;
        info!(tickers = tickers.len(), "Analysis started");

        let mut results = Vec::new();
        let mut report = AnalysisReport::default();

        for symbol in &tickers {
            match self.analyze_ticker(symbol).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => report.skipped.push(symbol.clone()),
                Err(e) => {
                    warn!(ticker = %symbol, error = %e, "Error processing ticker");
                    report.failed.push(symbol.clone());
                }
            }
        }

        report.ranked = rank(results, self.top_n);
        report.dispatch = self.dispatcher.send_digest(&report.ranked).await;

        info!(
            ranked = report.ranked.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Analysis finished"
        );
        report
    }
}
