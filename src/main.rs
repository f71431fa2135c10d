use anyhow::bail;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use weathernow::api::AppState;
use weathernow::config::WeatherNowConfig;
use weathernow::{tools, web};

fn init_tracing(stderr: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if stderr {
        // Stdout carries the MCP protocol; logs must stay off it
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());
    let config = WeatherNowConfig::from_env()?;

    match mode.as_str() {
        "serve" => {
            init_tracing(false);
            let state = AppState::new(&config)?;
            web::run(config.server.port, state).await
        }
        "mcp" => {
            init_tracing(true);
            tools::run_stdio(&config).await
        }
        other => {
            bail!("Unknown mode '{other}': expected 'serve' or 'mcp'");
        }
    }
}
