//! Cluster overview
//!
//! Signs in against a running backend and prints one line per cluster:
//! - session status before and after login
//! - every cluster with provider, region and status

use multik8s_sdk::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("MULTIK8S_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let client = ConsoleClient::new(base_url)?;

    let status = client.auth_status().await?;
    println!("Authenticated before login: {}", status.authenticated);

    let user = client
        .login(&Credentials {
            username: std::env::var("MULTIK8S_USER").unwrap_or_else(|_| "admin".to_string()),
            password: std::env::var("MULTIK8S_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
        })
        .await?;
    println!("Signed in as {} ({})", user.username, user.role);

    let clusters = client.list_clusters().await?;
    if clusters.is_empty() {
        println!("No clusters yet");
    }
    for cluster in clusters {
        println!(
            "{} {:<20} {:<16} {:<10} {} nodes",
            cluster.cloud_provider.icon(),
            cluster.name,
            cluster.region,
            cluster.status,
            cluster.node_count
        );
    }

    client.logout().await?;
    Ok(())
}
