use argus_core::config::AppConfig;
use argus_core::universe::port::TickerUniverse;
use argus_feed::universe::{RemoteUniverse, universe_from_config};
use std::io::Write;

// 本机 discard 端口，连接会被立即拒绝
const DEAD_URL: &str = "http://127.0.0.1:9/tickers.json";

fn install_crypto() {
    rustls::crypto::ring::default_provider().install_default().ok();
}

fn names(symbols: &[argus_core::common::TickerSymbol]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

/// # Summary
/// 远程列表不可用时回退到本地缓存文件。
///
/// # Logic
/// 1. 写入临时缓存文件。
/// 2. 指向不可达地址创建 RemoteUniverse。
/// 3. 断言返回缓存中的代码，且顺序与去重正确。
#[tokio::test]
async fn test_remote_failure_falls_back_to_cache() -> anyhow::Result<()> {
    install_crypto();
    let mut cache = tempfile::NamedTempFile::new()?;
    write!(
        cache,
        r#"{{"data": [[0, "Apple", "AAPL"], [1, "Microsoft", "MSFT"], [2, "Apple again", "AAPL"]]}}"#
    )?;

    let universe = RemoteUniverse::new(DEAD_URL, cache.path())?;
    let symbols = universe.load().await;

    assert_eq!(names(&symbols), vec!["AAPL", "MSFT"]);
    Ok(())
}

/// 远程与缓存都不可用时返回空列表，而不是错误
#[tokio::test]
async fn test_total_failure_yields_empty() -> anyhow::Result<()> {
    install_crypto();
    let dir = tempfile::tempdir()?;
    let universe = RemoteUniverse::new(DEAD_URL, dir.path().join("missing.json"))?;

    assert!(universe.load().await.is_empty());
    Ok(())
}

/// 损坏的缓存文件同样视为不可用
#[tokio::test]
async fn test_corrupt_cache_yields_empty() -> anyhow::Result<()> {
    install_crypto();
    let mut cache = tempfile::NamedTempFile::new()?;
    write!(cache, "{{ not json")?;

    let universe = RemoteUniverse::new(DEAD_URL, cache.path())?;
    assert!(universe.load().await.is_empty());
    Ok(())
}

/// 配置中的显式列表优先于远程列表
#[tokio::test]
async fn test_explicit_tickers_win() -> anyhow::Result<()> {
    install_crypto();
    let config: AppConfig = serde_json::from_str(
        r#"{"email": "u@x.com", "tickers": ["AAA", "BBB", "AAA"], "universe_url": "http://127.0.0.1:9/"}"#,
    )?;

    let universe = universe_from_config(&config)?;
    assert_eq!(names(&universe.load().await), vec!["AAA", "BBB"]);
    Ok(())
}

/// 空的显式列表回退到远程 + 缓存
#[tokio::test]
async fn test_empty_explicit_list_uses_remote_chain() -> anyhow::Result<()> {
    install_crypto();
    let mut cache = tempfile::NamedTempFile::new()?;
    write!(cache, r#"{{"data": [[0, "Zeta", "ZZZ"]]}}"#)?;

    let mut config = AppConfig::with_email("u@x.com");
    config.tickers = Some(Vec::new());
    config.universe_url = DEAD_URL.to_string();
    config.tickers_cache = cache.path().to_path_buf();

    let universe = universe_from_config(&config)?;
    assert_eq!(names(&universe.load().await), vec!["ZZZ"]);
    Ok(())
}
