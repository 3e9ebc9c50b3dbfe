use std::sync::Arc;

use twitacad_infra::config::StoreConfig;
use twitacad_infra::gateway::{
    GatewayError, InMemoryGateway, Lookup, MySqlGateway, ProcParam, Procedure, ProcedureGateway, ResultSet,
};

/// Shared handle injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    gateway: Arc<dyn ProcedureGateway>,
}

impl AppServices {
    pub fn new(gateway: Arc<dyn ProcedureGateway>) -> Self {
        Self { gateway }
    }

    pub async fn call(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<ResultSet, GatewayError> {
        self.gateway.call(procedure, params).await
    }

    pub async fn lookup(&self, procedure: Procedure, params: Vec<ProcParam>) -> Result<Lookup, GatewayError> {
        self.gateway.lookup(procedure, params).await
    }
}

/// Select the gateway from configuration.
pub async fn build_services(store: &StoreConfig) -> Result<AppServices, GatewayError> {
    let gateway: Arc<dyn ProcedureGateway> = match store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory procedure gateway");
            Arc::new(InMemoryGateway::new())
        }
        StoreConfig::MySql {
            database_url,
            max_connections,
        } => {
            tracing::info!(max_connections, "using MySQL procedure gateway");
            Arc::new(MySqlGateway::connect(database_url, *max_connections).await?)
        }
    };

    Ok(AppServices::new(gateway))
}
