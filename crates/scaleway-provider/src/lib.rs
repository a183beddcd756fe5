#![forbid(unsafe_code)]
//! # Scaleway provider core
//! Credential resolution and HTTP plumbing shared by every Scaleway resource.
//!
//! The crate resolves the effective [`Config`] from explicit values, the
//! environment, the `scw` configuration file and the legacy `~/.scwrc`, then
//! builds the two SDK client generations behind one [`Meta`] handle.
//! Asynchronous requests are based on [`reqwest`] and [`tokio`].
//!
//! ```no_run
//! use scaleway_provider::prelude::*;
//!
//! # async fn run() -> std::result::Result<(), ConfigError> {
//! let store = ConfigStore::load()?;
//! let config = ConfigResolver::new(&store).resolve(&ExplicitConfig::default());
//! let meta = config.meta(&SETTINGS).await?;
//! println!("legacy region: {}", meta.legacy_client().region());
//! # Ok(())
//! # }
//! ```
//!
//! [`reqwest`]: https://docs.rs/reqwest
//! [`tokio`]: https://docs.rs/tokio

pub mod client;
pub mod config;
pub mod error;
pub mod locality;
pub mod logging;
pub mod prelude;
pub mod transport;

pub use self::client::{ClientFactory, Meta};
pub use self::config::Config;

/// Name used to tag this provider's HTTP traffic in logs
pub const PROVIDER_NAME: &str = "Scaleway";
/// Crate target used by the log filter self-directive
pub const SERVICE_NAME: &str = "scaleway_provider";
