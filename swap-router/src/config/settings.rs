use crate::routing::{RouterConfig, WeightCoefficients};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub chain: ChainSettings,
    pub routing: RoutingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    pub chain_id: u64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self { chain_id: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    pub top_k: usize,
    pub default_slippage: f64,
    pub weight_price_impact: f64,
    pub weight_gas: f64,
    pub weight_slippage: f64,
    pub enable_cache: bool,
    pub cache_ttl_seconds: u64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            default_slippage: 0.005,
            weight_price_impact: 0.6,
            weight_gas: 0.3,
            weight_slippage: 0.1,
            enable_cache: true,
            cache_ttl_seconds: 15,
        }
    }
}

impl Settings {
    /// Layered load: an optional `router.toml` next to the binary, then
    /// `SWAP_ROUTER__*` environment overrides
    /// (e.g. `SWAP_ROUTER__SERVER__PORT=8080`).
    pub fn load() -> anyhow::Result<Self> {
        let source = config::Config::builder()
            .add_source(config::File::with_name("router").required(false))
            .add_source(config::Environment::with_prefix("SWAP_ROUTER").separator("__"))
            .build()?;

        Ok(source.try_deserialize().unwrap_or_default())
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            top_k: self.routing.top_k.max(1),
            default_slippage: self.routing.default_slippage,
            weight_coefficients: WeightCoefficients {
                price_impact: self.routing.weight_price_impact,
                gas: self.routing.weight_gas,
                slippage: self.routing.weight_slippage,
            },
            enable_cache: self.routing.enable_cache,
            cache_ttl_seconds: self.routing.cache_ttl_seconds,
            ..RouterConfig::default()
        }
    }
}
