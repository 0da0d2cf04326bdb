use fundqa_server::{AppConfig, build_state, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let state = build_state(&config).await?;
    run_server(&config, state).await
}
