use anyhow::Result;
use landuse_search::{server, Config};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) configuration ────────────────────────────────────────────
    let config = Config::load()?;

    // ─── 2) init logging ─────────────────────────────────────────────
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!(
        data_url = %config.data_url,
        cache_ttl_secs = config.cache_ttl_secs,
        "startup"
    );

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 3) serve ────────────────────────────────────────────────────
    server::serve(&config).await?;

    info!("shutdown");
    Ok(())
}
