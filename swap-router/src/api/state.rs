use crate::config::Settings;
use crate::graph::LiquidityGraph;
use crate::routing::Router;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub graph: Arc<LiquidityGraph>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let graph = Arc::new(LiquidityGraph::new());
        let router = match Router::with_config(graph.clone(), settings.router_config()) {
            Ok(router) => router,
            Err(error) => {
                tracing::warn!(%error, "invalid routing configuration, falling back to defaults");
                Router::new(graph.clone())
            }
        };

        Self {
            router: Arc::new(router),
            graph,
            settings,
        }
    }
}
