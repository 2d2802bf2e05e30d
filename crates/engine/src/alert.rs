use argus_core::common::TickerSymbol;
use argus_core::notify::port::{Delivery, Notifier};
use argus_core::signal::entity::PredictionResult;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DIGEST_SUBJECT: &str = "Daily Opportunities";

/// # Summary
/// 一次投递的最终结果，仅用于日志与测试观测，不会向上抛错。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    Skipped,
    Failed(String),
}

/// 摘要中的单行：`AAA: 82.00% (close 10.00)`
pub fn digest_line(result: &PredictionResult) -> String {
    format!(
        "{}: {:.2}% (close {:.2})",
        result.ticker,
        result.probability_up * 100.0,
        result.last_close
    )
}

/// 机会摘要正文，每个结果一行
pub fn format_digest(results: &[PredictionResult]) -> String {
    results
        .iter()
        .map(digest_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 卖出信号的 (主题, 正文)
pub fn format_sell_signal(ticker: &TickerSymbol, change: f64) -> (String, String) {
    (
        format!("Sell signal {}", ticker),
        format!("{} has gained {:.2}% since purchase", ticker, change * 100.0),
    )
}

/// # Summary
/// 告警分发器：格式化消息并交给通知端口。
///
/// # Invariants
/// - 投递失败或被跳过只记录日志，从不向调用方返回错误。
#[derive(Clone)]
pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
    recipient: String,
}

impl AlertDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, recipient: &str) -> Self {
        Self {
            notifier,
            recipient: recipient.to_string(),
        }
    }

    /// # Summary
    /// 投递任意主题与正文。
    ///
    /// # Logic
    /// 1. 调用通知端口。
    /// 2. 按结果分别记录 info / warn / error 日志。
    pub async fn dispatch(&self, subject: &str, body: &str) -> DispatchOutcome {
        match self.notifier.notify(&self.recipient, subject, body).await {
            Ok(Delivery::Sent) => {
                info!(to = %self.recipient, subject, "Notification sent");
                DispatchOutcome::Sent
            }
            Ok(Delivery::Skipped) => {
                warn!(subject, "Notification skipped, no credentials configured");
                DispatchOutcome::Skipped
            }
            Err(e) => {
                error!(to = %self.recipient, subject, error = %e, "Notification failed");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    /// 发送机会摘要；结果为空时不发送并返回 None
    pub async fn send_digest(&self, ranked: &[PredictionResult]) -> Option<DispatchOutcome> {
        if ranked.is_empty() {
            info!("No opportunities to report, digest skipped");
            return None;
        }
        Some(self.dispatch(DIGEST_SUBJECT, &format_digest(ranked)).await)
    }

    pub async fn send_sell_signal(&self, ticker: &TickerSymbol, change: f64) -> DispatchOutcome {
        let (subject, body) = format_sell_signal(ticker, change);
        self.dispatch(&subject, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ticker: &str, p: f64, close: f64) -> PredictionResult {
        PredictionResult {
            ticker: TickerSymbol::new(ticker).unwrap(),
            probability_up: p,
            last_close: close,
        }
    }

    #[test]
    fn test_digest_format() {
        let body = format_digest(&[result("AAA", 0.82, 123.456), result("BBB", 0.41, 7.0)]);
        assert_eq!(body, "AAA: 82.00% (close 123.46)\nBBB: 41.00% (close 7.00)");
    }

    #[test]
    fn test_digest_rounding() {
        assert_eq!(digest_line(&result("X", 0.123456, 0.004)), "X: 12.35% (close 0.00)");
    }

    #[test]
    fn test_sell_signal_format() {
        let (subject, body) = format_sell_signal(&TickerSymbol::new("AAA").unwrap(), 0.0501);
        assert_eq!(subject, "Sell signal AAA");
        assert_eq!(body, "AAA has gained 5.01% since purchase");
    }
}
