mod settings;

use std::sync::Arc;
use std::time::Duration;

use argus_core::common::time::RealTimeProvider;
use argus_core::config::AppConfig;
use argus_core::market::port::MarketDataProvider;
use argus_core::notify::port::Notifier;
use argus_engine::alert::AlertDispatcher;
use argus_engine::analysis::Analyzer;
use argus_engine::schedule::DailyScheduler;
use argus_engine::stop::stop_channel;
use argus_engine::watch::PriceWatcher;
use argus_feed::universe::universe_from_config;
use argus_feed::yahoo::YahooProvider;
use argus_notify::email::EmailNotifier;
use argus_signal::logistic::LogisticPredictor;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 滚动日志目录
const LOG_DIR: &str = "logs";

/// # Summary
/// 初始化全局日志：控制台 + 按天滚动的文件。
///
/// # Returns
/// 文件写入器的守卫，必须存活到进程退出，否则尾部日志会丢失。
fn init_tracing() -> WorkerGuard {
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(LOG_DIR, "argus.log"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    guard
}

/// # Summary
/// 执行一次定时分析。
///
/// # Logic
/// 1. 重新读取配置，失败时沿用启动时的配置。
/// 2. 按新配置构建标的池与分发器，然后运行分析管线。
///
/// # Arguments
/// * `startup` - 启动时加载的配置，作为重新读取失败时的回退。
async fn run_scheduled_analysis(
    startup: Arc<AppConfig>,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
) {
    let config = settings::reload(&startup);

    let universe = match universe_from_config(&config) {
        Ok(universe) => universe,
        Err(e) => {
            error!(error = %e, "Ticker universe unavailable, analysis skipped");
            return;
        }
    };
    let analyzer = Analyzer::new(
        provider,
        universe,
        Arc::new(LogisticPredictor::default()),
        AlertDispatcher::new(notifier, &config.email),
        config.history_days,
        config.top_n,
    );
    analyzer.run().await;
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到两个长驻流程。
///
/// # Logic
/// 1. 加载 `.env`，初始化全局日志与 TLS 加密后端。
/// 2. 加载并校验配置，失败即退出。
/// 3. 实例化适配器层（行情、标的池、邮件）。
/// 4. 构造每日分析调度与盯盘循环并分别启动。
/// 5. 等待 Ctrl-C，通知两个流程停止并等待其退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境与日志
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A TLS crypto provider was already installed");
    }
    info!("Argus starting...");

    // 2. 配置
    let config = settings::load()?;
    info!(
        recipient = %config.email,
        analysis_time = %config.analysis_time,
        profit_threshold = config.profit_threshold,
        "Configuration loaded"
    );

    // 3. 适配器层
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);
    let universe = universe_from_config(&config)?;
    let notifier = EmailNotifier::from_env(&config.smtp.host, config.smtp.port)?;
    if !notifier.is_enabled() {
        warn!("EMAIL_USER / EMAIL_PASS not set, notifications will be skipped");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(notifier);
    let dispatcher = AlertDispatcher::new(notifier.clone(), &config.email);

    // 4. 长驻流程
    let scheduler = DailyScheduler::new(config.analysis_time()?, Arc::new(RealTimeProvider));

    let watch_tickers = universe.load().await;
    if watch_tickers.is_empty() {
        warn!("No tickers to watch");
    }
    let watcher = PriceWatcher::new(
        provider.clone(),
        dispatcher,
        watch_tickers,
        config.profit_threshold,
        Duration::from_secs(config.poll_interval_secs),
    );

    let (stop_handle, stop_signal) = stop_channel();
    let analysis_task = tokio::spawn({
        let stop = stop_signal.clone();
        let startup = Arc::new(config.clone());
        async move {
            scheduler
                .run(stop, move || {
                    run_scheduled_analysis(startup.clone(), provider.clone(), notifier.clone())
                })
                .await;
        }
    });
    let watch_task = tokio::spawn(watcher.run(stop_signal));

    info!("Analysis scheduler and price watch started. Waiting for signals...");

    // 5. 挂起主线程，等待外部退出信号
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Stopping...");
    stop_handle.stop();

    let (analysis, watch) = tokio::join!(analysis_task, watch_task);
    analysis?;
    watch?;

    info!("Argus stopped");
    Ok(())
}
