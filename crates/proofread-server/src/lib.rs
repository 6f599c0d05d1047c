//! Proofread Server - proofreading issue manager service
//!
//! Files proofreading issues for the PlanB Network content repository and
//! places them on the project board.
//!
//! # Architecture
//!
//! - **Config**: Environment-loaded settings behind a swappable snapshot
//! - **Scanner**: Reads courses, tutorials and sections from a local clone
//! - **GitHub**: REST/GraphQL client for branches, issues and the board
//! - **Branch cache**: Five-minute cache in front of the branch listing
//! - **API**: JSON endpoints for lookups, previews and issue creation
//!
//! # Example
//!
//! ```no_run
//! use proofread_server::{AppConfig, ProofreadServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let server = ProofreadServer::new(config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod branch_cache;
pub mod config;
pub mod error;
pub mod github;
pub mod scanner;
pub mod server;

pub use api::{build_router, AppState};
pub use branch_cache::CachedBranchSource;
pub use config::{AppConfig, ConfigHandle, ConfigUpdate, ConfigView};
pub use error::{Result, ServerError};
pub use github::GitHubClient;
pub use server::ProofreadServer;
