/// Domunity backend server
use domunity::{
    config::{LogFormat, LoggingConfig, ServerConfig},
    context::AppContext,
    server,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    init_tracing(&config.logging);

    // Print banner
    print_banner();

    tracing::info!(
        http_port = config.service.http_port,
        rpc_port = config.service.rpc_port,
        "Starting Domunity backend"
    );

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start servers
    server::serve(ctx).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn print_banner() {
    println!(
        r#"
    ____                              _ __
   / __ \____  ____ ___  __  ______  (_) /___  __
  / / / / __ \/ __ `__ \/ / / / __ \/ / __/ / / /
 / /_/ / /_/ / / / / / / /_/ / / / / / /_/ /_/ /
/_____/\____/_/ /_/ /_/\__,_/_/ /_/_/\__/\__, /
                                        /____/
        Building management backend v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
