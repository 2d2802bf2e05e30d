//! # `argus-engine` - 编排层
//!
//! 把领域端口串成两个长驻流程：
//! - 每日定时分析 (`analysis` + `schedule`)：标的池 → 特征 → 预测 → 排序 → 摘要邮件。
//! - 持仓盯盘 (`watch`)：按固定间隔轮询最新价，涨幅达到阈值时发送卖出信号。
//!
//! 两个流程共享同一个 `StopSignal`，由应用入口统一关闭。

pub mod alert;
pub mod analysis;
pub mod schedule;
pub mod stop;
pub mod watch;
