use super::{Pool, PoolEdge, PoolId, SwapDirection, Token, TokenId};
use crate::utils::Result;
use parking_lot::{RwLock, RwLockReadGuard};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Graph state guarded by the liquidity graph's lock.
///
/// Pools live in a table keyed by [`PoolId`]; edges carry only the key and
/// a direction, so updating a pool touches one table entry and both
/// directed views stay consistent.
pub(crate) struct GraphInner {
    pub(crate) graph: DiGraph<TokenId, PoolEdge>,
    pub(crate) token_index: HashMap<TokenId, NodeIndex>,
    pub(crate) tokens: HashMap<TokenId, Token>,
    pub(crate) pools: HashMap<PoolId, Pool>,
}

/// The liquidity graph: a directed multigraph where nodes are token
/// identities and each pool contributes one edge per direction.
///
/// Writers are exclusive; a routing call holds the read lock for its full
/// duration so it observes a consistent snapshot. The version counter
/// bumps on every successful write, which lets cached results be tied to
/// the graph state they were computed from.
pub struct LiquidityGraph {
    inner: RwLock<GraphInner>,
    version: AtomicU64,
    last_update: AtomicU64,
}

impl LiquidityGraph {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(GraphInner {
                graph: DiGraph::new(),
                token_index: HashMap::new(),
                tokens: HashMap::new(),
                pools: HashMap::new(),
            }),
            version: AtomicU64::new(0),
            last_update: AtomicU64::new(0),
        }
    }

    fn get_or_create_node(inner: &mut GraphInner, token: &Token) -> NodeIndex {
        let id = token.id();
        if let Some(index) = inner.token_index.get(&id) {
            return *index;
        }

        let index = inner.graph.add_node(id.clone());
        inner.token_index.insert(id.clone(), index);
        index
    }

    /// Add or update a pool. Idempotent by pool identity: an existing
    /// pool has its reserves, price, and liquidity replaced in place.
    pub fn upsert_pool(&self, pool: Pool) -> Result<()> {
        pool.validate()?;
        let id = pool.id();

        let mut inner = self.inner.write();

        if !inner.pools.contains_key(&id) {
            let node_a = Self::get_or_create_node(&mut inner, &pool.token_a);
            let node_b = Self::get_or_create_node(&mut inner, &pool.token_b);

            inner
                .graph
                .add_edge(node_a, node_b, PoolEdge::new(id.clone(), SwapDirection::AtoB));
            inner
                .graph
                .add_edge(node_b, node_a, PoolEdge::new(id.clone(), SwapDirection::BtoA));
        }

        inner.tokens.insert(pool.token_a.id(), pool.token_a.clone());
        inner.tokens.insert(pool.token_b.id(), pool.token_b.clone());
        inner.pools.insert(id, pool);
        drop(inner);

        self.mark_updated();
        Ok(())
    }

    /// Remove a pool and both of its directed edges. Removing an unknown
    /// pool is a no-op.
    pub fn remove_pool(&self, pool_id: &PoolId) {
        let mut inner = self.inner.write();
        if inner.pools.remove(pool_id).is_none() {
            return;
        }

        // Edge indices shift on removal, so re-scan after each one.
        loop {
            let next = inner
                .graph
                .edge_indices()
                .find(|&e| inner.graph[e].pool_id == *pool_id);
            match next {
                Some(edge) => {
                    inner.graph.remove_edge(edge);
                }
                None => break,
            }
        }
        drop(inner);

        self.mark_updated();
    }

    /// All directed edges leaving a token, with the token on the far end.
    pub fn neighbors(&self, token: &TokenId) -> Vec<(TokenId, PoolEdge)> {
        let inner = self.inner.read();

        let Some(&index) = inner.token_index.get(token) else {
            return Vec::new();
        };

        inner
            .graph
            .edges(index)
            .map(|edge| (inner.graph[edge.target()].clone(), edge.weight().clone()))
            .collect()
    }

    pub fn token(&self, id: &TokenId) -> Option<Token> {
        self.inner.read().tokens.get(id).cloned()
    }

    pub fn contains_token(&self, id: &TokenId) -> bool {
        self.inner.read().token_index.contains_key(id)
    }

    pub fn pool(&self, id: &PoolId) -> Option<Pool> {
        self.inner.read().pools.get(id).cloned()
    }

    /// Check connectivity between two tokens.
    pub fn has_path(&self, from: &TokenId, to: &TokenId) -> bool {
        let inner = self.inner.read();

        let (Some(&start), Some(&end)) = (
            inner.token_index.get(from),
            inner.token_index.get(to),
        ) else {
            return false;
        };

        petgraph::algo::has_path_connecting(&inner.graph, start, end, None)
    }

    pub fn stats(&self) -> GraphStats {
        let inner = self.inner.read();
        GraphStats {
            token_count: inner.graph.node_count(),
            pool_count: inner.pools.len(),
            last_update: self.last_update.load(Ordering::Relaxed),
        }
    }

    /// Monotonic write counter; bumps on every upsert or removal.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, GraphInner> {
        self.inner.read()
    }

    fn mark_updated(&self) {
        self.version.fetch_add(1, Ordering::Release);
        self.last_update
            .store(chrono::Utc::now().timestamp() as u64, Ordering::Relaxed);
    }
}

impl Default for LiquidityGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct GraphStats {
    pub token_count: usize,
    pub pool_count: usize,
    pub last_update: u64,
}
