use crate::stop::StopSignal;
use argus_core::common::time::TimeProvider;
use chrono::{Days, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// # Summary
/// 计算严格晚于 `now` 的下一个 `at` 时刻。
///
/// # Logic
/// 1. 当天的 `at` 仍在未来则取当天。
/// 2. 否则顺延到次日。
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        // 日期溢出仅发生在 NaiveDate::MAX，届时保持当天
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }
}

/// # Summary
/// 每日定点调度器，只理解“一天中的某个时刻”。
///
/// # Invariants
/// - 时钟通过 `TimeProvider` 注入。
/// - 等待期间可被停止信号打断。
pub struct DailyScheduler {
    at: NaiveTime,
    clock: Arc<dyn TimeProvider>,
}

impl DailyScheduler {
    pub fn new(at: NaiveTime, clock: Arc<dyn TimeProvider>) -> Self {
        Self { at, clock }
    }

    /// 距离下一次运行的等待时长
    pub fn until_next_run(&self) -> (NaiveDateTime, Duration) {
        let now = self.clock.now();
        let next = next_run_after(now, self.at);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        (next, wait)
    }

    /// # Summary
    /// 循环执行每日任务，直到收到停止信号。
    ///
    /// # Logic
    /// 1. 每轮开始先检查停止信号。
    /// 2. 计算下一次运行时刻并等待，等待可被打断。
    /// 3. 执行任务，然后进入下一轮。
    ///
    /// # Arguments
    /// * `stop` - 停止信号。
    /// * `job` - 每次触发时调用的任务工厂。
    pub async fn run<F, Fut>(&self, mut stop: StopSignal, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            if stop.is_stopped() {
                break;
            }

            let (next, wait) = self.until_next_run();
            info!(next_run = %next, wait_secs = wait.as_secs(), "Next analysis scheduled");

            if stop.sleep(wait).await {
                break;
            }
            job().await;
        }
        info!("Scheduler stopped");
    }
}
