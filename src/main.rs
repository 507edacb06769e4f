#![deny(rust_2018_idioms)]

use crate::cli::*;
use anyhow::Result;
use folio::{app::App, config::FolioConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cmd = cli::cmd();
    debug!(?cmd, "launched");

    // create app
    let mut config = FolioConfig::load(cmd.config.as_deref())?;
    if let Some(username) = cmd.username {
        config.username = username;
    }
    let app = App::new(&config)?;

    // process command
    use Command::*;
    match cmd.cmd {
        Build { template, out } => app.build_page(&template, &out).await?,
        Stats {} => app.print_stats().await?,
        Repos {} => app.print_top_repositories().await?,
        Activity {} => app.print_activity().await?,
        Calendar {} => app.print_calendar_script()?,
    };

    debug!("exiting");
    Ok(())
}
