use crate::{
    config::myconfig::Config,
    di::{DependenciesInject, OrderTimeouts, Repositories},
};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{ConnectionPool, JwtConfig},
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
}

impl AppState {
    pub fn new(pool: ConnectionPool, config: &Config) -> Self {
        Self::from_repositories(
            Repositories::postgres(pool),
            &config.jwt_secret,
            OrderTimeouts {
                lock: config.lock_timeout,
                transaction: config.transaction_timeout,
            },
        )
    }

    pub fn from_repositories(
        repos: Repositories,
        jwt_secret: &str,
        timeouts: OrderTimeouts,
    ) -> Self {
        let mut registry = Registry::default();
        let di_container = DependenciesInject::from_repositories(repos, timeouts, &mut registry);

        Self {
            di_container,
            jwt_config: Arc::new(JwtConfig::new(jwt_secret)) as DynJwtService,
            registry: Arc::new(Mutex::new(registry)),
        }
    }
}
