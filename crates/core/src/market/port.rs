use crate::common::{TickerSymbol, TimeFrame};
use crate::market::entity::PriceBar;
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 历史数据回溯窗口：回溯天数与 K 线周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    // 回溯的自然日数
    pub days: u32,
    // K 线周期
    pub timeframe: TimeFrame,
}

impl HistoryWindow {
    /// 每日分析使用的日线窗口
    pub fn daily(days: u32) -> Self {
        Self {
            days,
            timeframe: TimeFrame::Day1,
        }
    }

    /// 盯盘使用的当日分钟线窗口
    pub fn intraday() -> Self {
        Self {
            days: 1,
            timeframe: TimeFrame::Minute1,
        }
    }
}

/// # Summary
/// 历史行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 返回的序列按时间升序排列且无重复时间戳。
/// - 无数据时允许返回空序列，而非错误。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券在回溯窗口内的 K 线数据。
    ///
    /// # Logic
    /// 1. 构建数据源请求。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 丢弃缺失收盘价的记录。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `window`: 回溯窗口。
    ///
    /// # Returns
    /// 成功返回 K 线列表（可能为空）。
    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        window: HistoryWindow,
    ) -> Result<Vec<PriceBar>, MarketError>;

    /// # Summary
    /// 获取证券的最新成交价。
    ///
    /// # Logic
    /// 1. 拉取当日分钟线。
    /// 2. 取最后一根 K 线的收盘价。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    ///
    /// # Returns
    /// 有数据时返回 Some(价格)，当日无数据返回 None。
    async fn latest_price(&self, symbol: &TickerSymbol) -> Result<Option<f64>, MarketError> {
        let bars = self.fetch_history(symbol, HistoryWindow::intraday()).await?;
        Ok(bars.last().map(|b| b.close))
    }
}
