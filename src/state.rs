use crate::config::Config;
use crate::fetch::MetricsClient;
use crate::models::Payload;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state: the config, the upstream client, and the latest
/// payload snapshot. The snapshot is the only mutable piece; handlers clone
/// it out and the transform layer only ever reads the clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: MetricsClient,
    pub payload: Arc<Mutex<Option<Payload>>>,
}

impl AppState {
    pub fn new(config: Config, client: MetricsClient, payload: Option<Payload>) -> Self {
        Self {
            config: Arc::new(config),
            client,
            payload: Arc::new(Mutex::new(payload)),
        }
    }
}
