//! TWRA API Server binary
//!
//! HTTP REST API for generating and inspecting TWRA import strings.

use clap::Parser;
use std::path::PathBuf;
use twra::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "twra-server")]
#[command(version)]
#[command(about = "TWRA API Server - HTTP REST API for raid assignment import strings")]
#[command(long_about = r#"
TWRA API Server - HTTP REST API

Provides RESTful endpoints for the exporter:
  - POST /api/v1/generate      - Import string from sheets or a preset
  - POST /api/v1/range         - Import string from an A1 range
  - POST /api/v1/decode        - Table text inside an import string
  - POST /api/v1/compare       - Normal vs compact output size
  - GET  /api/v1/abbreviations - Abbreviation table

Additional endpoints:
  - GET  /health               - Health check
  - GET  /version              - Server version info
  - GET  /                     - API documentation

Example usage:
  twra-server                           # Start on localhost:8080
  twra-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/generate \
    -H "Content-Type: application/json" \
    -d '{"file_path": "raid.xlsx", "preset": "Molten Core"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "TWRA_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "TWRA_PORT")]
    port: u16,

    /// YAML config file with defaults and presets
    #[arg(short, long, env = "TWRA_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        config_file: args.config,
    };

    run_api_server(config).await
}
