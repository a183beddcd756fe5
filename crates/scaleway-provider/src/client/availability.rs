//! Server availability prefetch
use super::current::ScwClient;
use crate::error::Result;
use crate::locality::Zone;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Stock level of one commercial server type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAvailability {
    /// `available`, `scarce` or `shortage`
    pub availability: String,
}

/// Availability of every server type in a zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAvailabilities {
    #[serde(default)]
    pub servers: HashMap<String, ServerAvailability>,
}

impl ServerAvailabilities {
    pub fn is_available(&self, server_type: &str) -> bool {
        self.servers
            .get(server_type)
            .is_some_and(|server| server.availability != "shortage")
    }
}

pub fn availability_path(zone: &Zone) -> String {
    format!("/instance/v1/zones/{zone}/products/servers/availability")
}

/// Fetch availabilities of every known zone into the client cache
///
/// Stops at the first failing zone.
///
/// ## Errors
/// - any [`ClientError`](crate::error::ClientError) of the failing request
#[tracing::instrument(skip(client))]
pub async fn fetch_server_availabilities(client: &ScwClient) -> Result<()> {
    for zone in Zone::known() {
        let availabilities: ServerAvailabilities =
            client.get_json(&availability_path(&zone)).await?;
        debug!(
            zone = %zone,
            server_types = availabilities.servers.len(),
            "server availabilities fetched"
        );
        client.store_server_availabilities(zone, availabilities);
    }
    Ok(())
}
