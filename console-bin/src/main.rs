use std::time::Duration;

use clap::Parser;
use color_eyre::eyre;
use multik8s_console_lib::config::{DEFAULT_API_URL, DEFAULT_POLL_INTERVAL_SECS};
use multik8s_console_lib::{connect, render, ConsoleConfig, Shell, TerminalPrompt, View};
use tracing::info;

mod commands;
mod screens;

use screens::ListExit;

/// Provision and monitor Kubernetes clusters on AWS and Azure.
#[derive(Debug, Parser)]
#[command(name = "multik8s", version)]
struct Args {
    /// Base URL of the platform API
    #[arg(long, env = "MULTIK8S_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Seconds between cluster list refreshes
    #[arg(
        long,
        env = "MULTIK8S_POLL_INTERVAL_SECS",
        default_value_t = DEFAULT_POLL_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "MULTIK8S_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            api_url: self.api_url.clone(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            request_timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = args.console_config();
    info!("Using platform API at {}", config.api_url);
    let api = connect(&config)?;
    let prompt = TerminalPrompt::default();

    let mut shell = Shell::new(api.clone());
    println!("{}", render::loading("Loading..."));
    shell.check_session().await;

    loop {
        match shell.view() {
            View::Loading => shell.check_session().await,
            View::Login => {
                let user = screens::login(api.as_ref()).await?;
                shell.on_login(user);
            }
            View::ClusterList => {
                let Some(user) = shell.user().cloned() else {
                    shell.on_logout();
                    continue;
                };
                match screens::cluster_list(api.clone(), user, config.poll_interval, &prompt).await? {
                    ListExit::CreateCluster => shell.open_create_form(),
                    ListExit::Logout => shell.on_logout(),
                    ListExit::Quit => break,
                }
            }
            View::ClusterForm => {
                if let Some(cluster) = screens::cluster_form(api.as_ref()).await? {
                    println!("{}", render::cluster_card(&cluster, false));
                }
                shell.close_create_form();
            }
        }
    }

    info!("Exiting");
    Ok(())
}
