use crate::alert::AlertDispatcher;
use crate::stop::StopSignal;
use argus_core::common::TickerSymbol;
use argus_core::market::port::MarketDataProvider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// # Summary
/// 单只证券的盯盘状态。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickerState {
    // 尚未成功观测到价格
    Uninitialized,
    // 已记录参考价
    Tracking { reference: f64 },
}

/// # Summary
/// 一次价格观测的结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    // 首次观测，参考价已设置，不告警
    Initialized { reference: f64 },
    // 涨幅未达阈值
    Held { change: f64 },
    // 涨幅达到阈值，参考价已重置为当前价
    Alert { change: f64, previous_reference: f64 },
}

/// # Summary
/// 参考价状态表，按证券代码索引。
///
/// # Invariants
/// - 仅由所属的 `PriceWatcher` 修改，外部只能只读访问。
/// - 仅存于内存，进程重启后重新初始化。
#[derive(Debug, Default, Clone)]
pub struct WatchState {
    entries: HashMap<TickerSymbol, TickerState>,
}

impl WatchState {
    pub fn new<'a>(tickers: impl IntoIterator<Item = &'a TickerSymbol>) -> Self {
        Self {
            entries: tickers
                .into_iter()
                .map(|t| (t.clone(), TickerState::Uninitialized))
                .collect(),
        }
    }

    pub fn get(&self, ticker: &TickerSymbol) -> TickerState {
        self.entries
            .get(ticker)
            .copied()
            .unwrap_or(TickerState::Uninitialized)
    }

    pub fn reference(&self, ticker: &TickerSymbol) -> Option<f64> {
        match self.get(ticker) {
            TickerState::Tracking { reference } => Some(reference),
            TickerState::Uninitialized => None,
        }
    }

    /// # Summary
    /// 记录一次成功观测并推进状态机。
    ///
    /// # Logic
    /// 1. UNINITIALIZED：设置参考价并转入 TRACKING，不告警。
    /// 2. TRACKING：计算 `(current - reference) / reference`。
    /// 3. 涨幅 ≥ 阈值（含边界）时告警，并把参考价重置为当前价。
    ///
    /// # Arguments
    /// * `ticker`: 证券代码。
    /// * `price`: 当前价格，须为正的有限值。
    /// * `threshold`: 止盈阈值，例如 0.05。
    pub(crate) fn observe(
        &mut self,
        ticker: &TickerSymbol,
        price: f64,
        threshold: f64,
    ) -> Observation {
        let entry = self
            .entries
            .entry(ticker.clone())
            .or_insert(TickerState::Uninitialized);

        match *entry {
            TickerState::Uninitialized => {
                *entry = TickerState::Tracking { reference: price };
                Observation::Initialized { reference: price }
            }
            TickerState::Tracking { reference } => {
                let change = (price - reference) / reference;
                if change >= threshold {
                    *entry = TickerState::Tracking { reference: price };
                    Observation::Alert {
                        change,
                        previous_reference: reference,
                    }
                } else {
                    Observation::Held { change }
                }
            }
        }
    }
}

/// # Summary
/// 单轮轮询的统计。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub observed: usize,
    pub skipped: usize,
    pub alerts: Vec<TickerSymbol>,
}

/// # Summary
/// 持仓价格盯盘循环。
///
/// # Invariants
/// - 独占 `WatchState`，仅在自己的轮询函数中修改。
/// - 每轮之间等待固定间隔，等待可被停止信号打断。
pub struct PriceWatcher {
    provider: Arc<dyn MarketDataProvider>,
    dispatcher: AlertDispatcher,
    tickers: Vec<TickerSymbol>,
    threshold: f64,
    interval: Duration,
    state: WatchState,
}

impl PriceWatcher {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        dispatcher: AlertDispatcher,
        tickers: Vec<TickerSymbol>,
        threshold: f64,
        interval: Duration,
    ) -> Self {
        let state = WatchState::new(&tickers);
        Self {
            provider,
            dispatcher,
            tickers,
            threshold,
            interval,
            state,
        }
    }

    /// 只读访问状态表
    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// # Summary
    /// 对所有证券执行一轮轮询。
    ///
    /// # Logic
    /// 1. 逐只获取最新价。
    /// 2. 无数据、请求失败或价格非正的证券本轮跳过，状态不变。
    /// 3. 推进状态机，告警时发送卖出信号。
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        for ticker in &self.tickers {
            let price = match self.provider.latest_price(ticker).await {
                Ok(Some(p)) if p.is_finite() && p > 0.0 => p,
                Ok(_) => {
                    debug!(ticker = %ticker, "No usable price this cycle");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "Price fetch failed");
                    report.skipped += 1;
                    continue;
                }
            };

            report.observed += 1;
            match self.state.observe(ticker, price, self.threshold) {
                Observation::Initialized { reference } => {
                    info!(ticker = %ticker, reference, "Tracking started");
                }
                Observation::Held { change } => {
                    debug!(ticker = %ticker, price, change, "Below threshold");
                }
                Observation::Alert {
                    change,
                    previous_reference,
                } => {
                    info!(
                        ticker = %ticker,
                        price,
                        previous_reference,
                        change,
                        "Profit threshold reached"
                    );
                    self.dispatcher.send_sell_signal(ticker, change).await;
                    report.alerts.push(ticker.clone());
                }
            }
        }

        report
    }

    /// # Summary
    /// 持续轮询直到收到停止信号。
    ///
    /// # Logic
    /// 1. 每轮开始前检查停止信号。
    /// 2. 执行一轮轮询并记录统计。
    /// 3. 等待固定间隔或停止信号，先到者为准。
    pub async fn run(mut self, mut stop: StopSignal) {
        info!(
            tickers = self.tickers.len(),
            threshold = self.threshold,
            interval_secs = self.interval.as_secs(),
            "Price watch loop started"
        );

        loop {
            if stop.is_stopped() {
                break;
            }

            let report = self.run_cycle().await;
            debug!(
                observed = report.observed,
                skipped = report.skipped,
                alerts = report.alerts.len(),
                "Watch cycle finished"
            );

            if stop.sleep(self.interval).await {
                break;
            }
        }
        info!("Price watch loop stopped");
    }
}
