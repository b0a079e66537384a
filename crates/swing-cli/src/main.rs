//! Golf swing analyzer binary.

use swing_cli::{error_json, logging, run, AnalyzerConfig, Command};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Model download goes over HTTPS
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    logging::init_tracing();

    let outcome = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => {
            let config = AnalyzerConfig::from_env();
            info!("Analyzer config: {:?}", config);
            run(command, config).await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            println!("{}", error_json(&e));
            std::process::exit(1);
        }
    }
}
