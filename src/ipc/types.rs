use std::time::Duration;

use serde::Deserialize;

use crate::backend::BackendClient;
use crate::store::Store;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub store: Store,
    pub backend: Option<BackendClient>,
    /// Uniform artificial delay applied to every dispatched request,
    /// success and failure alike. Zero by default.
    pub latency: Duration,
}

impl AppState {
    pub fn new(store: Store, backend: Option<BackendClient>, latency: Duration) -> Self {
        AppState {
            store,
            backend,
            latency,
        }
    }
}
