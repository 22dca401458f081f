use color_eyre::eyre;
use multik8s_devserver::{serve, AppState, DevServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,multik8s_devserver=debug,tower_http=debug".into()),
        )
        .init();

    let config = DevServerConfig::from_env();
    let state = AppState::new(&config);

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    info!("🚀 multik8s development API listening on http://{}", listener.local_addr()?);
    info!(
        "Accounts: admin/admin123 (admin), user/user123 (member); provisioning step {:?}",
        config.provision_step
    );

    serve(listener, state).await?;

    Ok(())
}
