use clap::Parser;
use moit_core::config::Config;
use moit_http::server::ServerConfig;

/// MOIT HTTP API Server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "MOIT_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "MOIT_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before Config::from_env reads the environment.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        core: Config::from_env(),
    };

    println!(
        "Starting MOIT HTTP server on {}:{}",
        config.host, config.port
    );
    moit_http::start_with_config(config).await?;

    Ok(())
}
