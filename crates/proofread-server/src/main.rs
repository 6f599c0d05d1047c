//! Proofread server binary
//!
//! `proofread-server` serves the HTTP API. `proofread-server check` verifies
//! the GitHub token, and `proofread-server projects` lists the owner's
//! project boards to find the id for `GITHUB_PROJECT_ID`.

use proofread_server::{AppConfig, ConfigHandle, GitHubClient, ProofreadServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proofread_server=info,proofread_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    match std::env::args().nth(1).as_deref() {
        None | Some("serve") => {
            tracing::info!("Starting proofread server");
            let server = ProofreadServer::new(config).await?;
            server.run().await?;
        }
        Some("check") => {
            let github = GitHubClient::new(ConfigHandle::new(config)).await?;
            let login = github.validate_token().await?;
            let branch = github.default_branch().await?;
            println!("Authenticated as {login}; default branch is {branch}");
        }
        Some("projects") => {
            let github = GitHubClient::new(ConfigHandle::new(config)).await?;
            for project in github.list_projects().await? {
                let state = if project.closed { "closed" } else { "open" };
                println!("{}\t#{}\t{}\t{}\t{}", project.id, project.number, state, project.title, project.url);
            }
        }
        Some(other) => {
            return Err(format!("unknown command '{other}', expected serve, check or projects").into());
        }
    }

    Ok(())
}
