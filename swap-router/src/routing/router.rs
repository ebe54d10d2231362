use crate::cache::{CacheStats, RouteCache, RouteCacheKey};
use crate::graph::{LiquidityGraph, TokenId};
use crate::routing::adjuster::{respects_contract, IdentityAdjuster, RouteAdjuster};
use crate::routing::cost::{default_gas_table, CostModel, WeightCoefficients};
use crate::routing::pathfinder::{k_shortest_paths, prepare_weights, SearchLimits};
use crate::routing::SwapRoute;
use crate::simulation::RouteSimulator;
use crate::utils::types::{DEFAULT_SLIPPAGE, DEFAULT_TOP_K, FEE_DENOMINATOR};
use crate::utils::{Result, RouterError};
use alloy_primitives::U256;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub top_k: usize,
    pub default_slippage: f64,
    pub weight_coefficients: WeightCoefficients,
    pub exchange_gas_table: HashMap<String, i64>,
    pub enable_cache: bool,
    pub cache_ttl_seconds: u64,
    pub max_routes_cached: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            default_slippage: DEFAULT_SLIPPAGE,
            weight_coefficients: WeightCoefficients::default(),
            exchange_gas_table: default_gas_table(),
            enable_cache: true,
            cache_ttl_seconds: 15,
            max_routes_cached: 1_000,
        }
    }
}

/// Per-call options. Everything is optional; defaults come from the
/// router configuration.
#[derive(Debug, Default, Clone)]
pub struct FindRoutesOptions {
    pub k: Option<usize>,
    pub slippage: Option<f64>,
    pub allowed_exchanges: Option<Vec<String>>,
    pub cancel: Option<CancellationToken>,
    pub deadline: Option<Instant>,
}

/// Result of a routing call. `partial` is set when the deadline cut the
/// call short; the routes present are complete and usable.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    pub routes: Vec<SwapRoute>,
    pub partial: bool,
}

/// The router facade: validates a request, searches the liquidity graph
/// for candidate paths, simulates them, runs the adjuster hook, and
/// returns ranked routes.
///
/// The whole pipeline is synchronous and CPU-bound; it holds the graph's
/// read lock for the duration of one call so concurrent pool updates
/// cannot tear the snapshot.
pub struct Router {
    graph: Arc<LiquidityGraph>,
    config: RouterConfig,
    cost: CostModel,
    adjuster: RwLock<Arc<dyn RouteAdjuster>>,
    cache: RouteCache,
}

impl Router {
    pub fn new(graph: Arc<LiquidityGraph>) -> Self {
        Self::build(graph, RouterConfig::default())
    }

    pub fn with_config(graph: Arc<LiquidityGraph>, config: RouterConfig) -> Result<Self> {
        config.weight_coefficients.validate()?;
        if config.top_k == 0 {
            return Err(RouterError::ConfigError("top_k must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&config.default_slippage) {
            return Err(RouterError::ConfigError(format!(
                "default_slippage {} out of [0, 1]",
                config.default_slippage
            )));
        }
        Ok(Self::build(graph, config))
    }

    fn build(graph: Arc<LiquidityGraph>, config: RouterConfig) -> Self {
        let cost = CostModel {
            weights: config.weight_coefficients,
            gas_table: config.exchange_gas_table.clone(),
            default_slippage: config.default_slippage,
        };
        let cache = RouteCache::new(config.cache_ttl_seconds, config.max_routes_cached);

        Self {
            graph,
            config,
            cost,
            adjuster: RwLock::new(Arc::new(IdentityAdjuster)),
            cache,
        }
    }

    /// Install a post-ranking adjustment hook, replacing the current one.
    pub fn set_adjuster(&self, adjuster: Arc<dyn RouteAdjuster>) {
        *self.adjuster.write() = adjuster;
    }

    /// Find up to `k` routes from `token_in` to `token_out` for
    /// `amount_in`, best first.
    pub fn find_routes(
        &self,
        token_in: &TokenId,
        token_out: &TokenId,
        amount_in: U256,
        options: FindRoutesOptions,
    ) -> Result<RouteSet> {
        let started = Instant::now();

        if amount_in.is_zero() {
            return Err(RouterError::InvalidAmount(
                "amount_in must be positive".into(),
            ));
        }

        let k = options.k.unwrap_or(self.config.top_k).max(1);
        let slippage = options.slippage.unwrap_or(self.config.default_slippage);
        if !(0.0..=1.0).contains(&slippage) {
            return Err(RouterError::InvalidAmount(format!(
                "slippage {slippage} out of [0, 1]"
            )));
        }

        let allowed: Option<HashSet<String>> = options.allowed_exchanges.as_ref().map(|list| {
            list.iter()
                .map(|name| name.trim().to_ascii_lowercase())
                .collect()
        });

        // Only plain calls are cacheable; cancel/deadline runs may stop
        // anywhere and must not poison future requests.
        let cacheable =
            self.config.enable_cache && options.cancel.is_none() && options.deadline.is_none();
        let cache_key = cacheable.then(|| RouteCacheKey {
            token_in: token_in.clone(),
            token_out: token_out.clone(),
            amount_in,
            k,
            slippage_pips: (slippage * FEE_DENOMINATOR as f64).round() as u64,
            allowed_exchanges: allowed.as_ref().map(|set| {
                let mut list: Vec<String> = set.iter().cloned().collect();
                list.sort();
                list
            }),
            graph_version: self.graph.version(),
        });

        if let Some(key) = &cache_key {
            if let Some(routes) = self.cache.get(key) {
                tracing::debug!(elapsed = ?started.elapsed(), "route cache hit");
                return Ok(RouteSet {
                    routes,
                    partial: false,
                });
            }
        }

        let limits = SearchLimits {
            cancel: options.cancel.clone(),
            deadline: options.deadline,
        };

        let inner = self.graph.read();

        let src = *inner.token_index.get(token_in).ok_or_else(|| {
            RouterError::UnknownToken {
                chain_id: token_in.chain_id(),
                address: token_in.address().to_string(),
            }
        })?;
        let dst = *inner.token_index.get(token_out).ok_or_else(|| {
            RouterError::UnknownToken {
                chain_id: token_out.chain_id(),
                address: token_out.address().to_string(),
            }
        })?;

        if src == dst {
            return Ok(RouteSet::default());
        }

        let weights = prepare_weights(&inner, amount_in, &self.cost, allowed.as_ref());
        let search = k_shortest_paths(&inner, src, dst, k, &weights, &limits)?;
        let mut partial = search.truncated;

        let simulator = RouteSimulator::new(&self.cost);
        let mut routes = Vec::with_capacity(search.paths.len());
        for path in &search.paths {
            if limits.cancelled() {
                return Err(RouterError::Cancelled);
            }
            if limits.expired() {
                partial = true;
                break;
            }

            match simulator.simulate_path(&inner, path, amount_in, slippage, limits.cancel.as_ref())
            {
                Ok(route) => routes.push(route),
                Err(RouterError::DeadHop { hop }) => {
                    tracing::debug!(hop, "dropping dead route");
                }
                Err(err) => return Err(err),
            }
        }
        drop(inner);

        let mut routes = self.apply_adjuster(routes);
        sort_routes(&mut routes);

        if let Some(key) = cache_key {
            if !partial {
                self.cache.insert(key, routes.clone());
            }
        }

        tracing::debug!(
            elapsed = ?started.elapsed(),
            candidates = routes.len(),
            partial,
            "routing complete"
        );

        Ok(RouteSet { routes, partial })
    }

    fn apply_adjuster(&self, routes: Vec<SwapRoute>) -> Vec<SwapRoute> {
        let hook = self.adjuster.read().clone();
        let original = routes.clone();

        match hook.adjust(routes) {
            Ok(adjusted) if respects_contract(&original, &adjusted) => adjusted,
            Ok(_) => {
                tracing::warn!("adjuster violated its contract; keeping unadjusted routes");
                original
            }
            Err(error) => {
                tracing::warn!(%error, "adjuster failed; keeping unadjusted routes");
                original
            }
        }
    }

    pub fn graph(&self) -> &LiquidityGraph {
        &self.graph
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Final ordering: best expected output first, risk then gas breaking
/// ties.
fn sort_routes(routes: &mut [SwapRoute]) {
    routes.sort_by(|a, b| {
        b.expected_amount_out
            .cmp(&a.expected_amount_out)
            .then_with(|| a.risk_score.cmp(&b.risk_score))
            .then_with(|| a.gas_estimate.cmp(&b.gas_estimate))
    });
}
