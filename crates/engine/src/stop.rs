use std::time::Duration;
use tokio::sync::watch;

/// # Summary
/// 停止信号的发送端，由应用入口持有。
///
/// # Invariants
/// - 丢弃发送端等同于发出停止信号。
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

/// # Summary
/// 停止信号的接收端，每个长驻流程持有一份克隆。
#[derive(Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

/// 创建一对停止信号收发端
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

impl StopHandle {
    /// 通知所有接收端停止
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

impl StopSignal {
    /// 是否已收到停止信号
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// 等待停止信号
    pub async fn stopped(&mut self) {
        // 发送端被丢弃时 wait_for 返回 Err，同样视为停止
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            tracing::debug!("Stop handle dropped");
        }
    }

    /// # Summary
    /// 休眠指定时长，期间收到停止信号则提前返回。
    ///
    /// # Returns
    /// 因停止信号返回时为 true，正常睡满为 false。
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = self.stopped() => true,
        }
    }
}
