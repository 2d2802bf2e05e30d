use crate::common::TickerSymbol;
use async_trait::async_trait;

/// # Summary
/// 标的池提供者接口。
///
/// # Invariants
/// - 返回有序且不重复的证券代码。
/// - 加载彻底失败时返回空列表，调用方视为“无可分析标的”，而非错误。
#[async_trait]
pub trait TickerUniverse: Send + Sync {
    /// # Summary
    /// 加载当前的标的池。
    ///
    /// # Returns
    /// 去重后的证券代码列表，可能为空。
    async fn load(&self) -> Vec<TickerSymbol>;
}
