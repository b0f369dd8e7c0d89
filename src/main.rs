use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use citadel::api::Api;
use citadel::app::App;
use citadel::config::Cli;
use citadel::runtime::Runtime;
use citadel::transport::GraphqlClient;

const FRAME_RATE: u32 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // The terminal owns stdout; diagnostics go to a file, if anywhere.
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(file)
            .with_ansi(false)
            .init();
    }

    let transport = Arc::new(GraphqlClient::new(&cli.endpoint)?);
    let api = Api::new(transport);

    let mut terminal = ratatui::init();
    let result = Runtime::<App>::new(api, FRAME_RATE).run(&mut terminal).await;
    ratatui::restore();

    result
}
