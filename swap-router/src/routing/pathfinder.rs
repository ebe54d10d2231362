use crate::graph::pool_graph::GraphInner;
use crate::graph::PoolId;
use crate::routing::cost::CostModel;
use crate::utils::types::MAX_SEARCH_HOPS;
use crate::utils::{Result, RouterError};
use alloy_primitives::U256;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Limits observed between candidate paths during search.
#[derive(Default, Clone)]
pub(crate) struct SearchLimits {
    pub cancel: Option<CancellationToken>,
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    pub(crate) fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| token.is_cancelled())
    }

    pub(crate) fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// A loopless path through the graph with its total edge weight.
#[derive(Debug, Clone)]
pub(crate) struct CandidatePath {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
    pub weight: f64,
}

impl CandidatePath {
    fn pool_ids(&self, inner: &GraphInner) -> Vec<PoolId> {
        self.edges
            .iter()
            .map(|&edge| inner.graph[edge].pool_id.clone())
            .collect()
    }
}

/// Search result; `truncated` marks a deadline cut before `k` paths were
/// produced.
pub(crate) struct SearchOutcome {
    pub paths: Vec<CandidatePath>,
    pub truncated: bool,
}

/// Precompute the weight of every usable edge for one request.
///
/// Price impact is estimated from the initial request amount for every
/// edge — the single-pass approximation that keeps the amount-dependent
/// weight tractable. Simulation later reapplies the true per-hop amounts.
/// Edges with empty reserves, full impact, or disallowed exchanges get no
/// weight and are invisible to the search.
pub(crate) fn prepare_weights(
    inner: &GraphInner,
    amount_in: U256,
    cost: &CostModel,
    allowed_exchanges: Option<&HashSet<String>>,
) -> HashMap<EdgeIndex, f64> {
    let mut weights = HashMap::new();

    for edge in inner.graph.edge_references() {
        let data = edge.weight();
        let Some(pool) = inner.pools.get(&data.pool_id) else {
            continue;
        };

        if let Some(allowed) = allowed_exchanges {
            if !allowed.contains(data.pool_id.exchange()) {
                continue;
            }
        }

        let (reserve_in, reserve_out) = data.reserves(pool);
        if reserve_in.is_zero() || reserve_out.is_zero() {
            continue;
        }

        let impact = cost.search_impact(amount_in, reserve_in, reserve_out);
        if impact >= 1.0 {
            continue;
        }

        let gas = cost.gas_cost(1, [pool.exchange.as_str()]);
        weights.insert(edge.id(), cost.edge_weight(impact, gas, cost.default_slippage));
    }

    weights
}

struct HeapEntry {
    weight: f64,
    hops: usize,
    node: NodeIndex,
}

impl Eq for HeapEntry {}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the maximum; invert so the lightest entry wins,
        // with fewer hops breaking weight ties.
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra over the weighted view, honoring banned nodes and edges.
/// Weights are non-negative, so settled paths are simple.
fn shortest_path(
    inner: &GraphInner,
    weights: &HashMap<EdgeIndex, f64>,
    src: NodeIndex,
    dst: NodeIndex,
    banned_nodes: &HashSet<NodeIndex>,
    banned_edges: &HashSet<EdgeIndex>,
) -> Option<CandidatePath> {
    if banned_nodes.contains(&src) {
        return None;
    }

    let mut dist: HashMap<NodeIndex, f64> = HashMap::new();
    let mut prev: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(src, 0.0);
    heap.push(HeapEntry {
        weight: 0.0,
        hops: 0,
        node: src,
    });

    while let Some(entry) = heap.pop() {
        if entry.node == dst {
            break;
        }
        if dist
            .get(&entry.node)
            .is_some_and(|&best| entry.weight > best)
        {
            continue;
        }
        if entry.hops >= MAX_SEARCH_HOPS {
            continue;
        }

        for edge in inner.graph.edges(entry.node) {
            let Some(&edge_weight) = weights.get(&edge.id()) else {
                continue;
            };
            if banned_edges.contains(&edge.id()) {
                continue;
            }

            let next = edge.target();
            if banned_nodes.contains(&next) {
                continue;
            }

            let candidate = entry.weight + edge_weight;
            let improves = match dist.get(&next) {
                Some(&best) => candidate < best,
                None => true,
            };
            if improves {
                dist.insert(next, candidate);
                prev.insert(next, (entry.node, edge.id()));
                heap.push(HeapEntry {
                    weight: candidate,
                    hops: entry.hops + 1,
                    node: next,
                });
            }
        }
    }

    let total = *dist.get(&dst)?;

    let mut nodes = vec![dst];
    let mut edges = Vec::new();
    let mut current = dst;
    while current != src {
        let (parent, edge) = *prev.get(&current)?;
        nodes.push(parent);
        edges.push(edge);
        current = parent;
    }
    nodes.reverse();
    edges.reverse();

    Some(CandidatePath {
        nodes,
        edges,
        weight: total,
    })
}

/// Rank paths by total weight, then hop count, then the lexicographic
/// order of their pool id sequences.
fn compare_paths(a: &CandidatePath, b: &CandidatePath, inner: &GraphInner) -> Ordering {
    a.weight
        .total_cmp(&b.weight)
        .then_with(|| a.edges.len().cmp(&b.edges.len()))
        .then_with(|| a.pool_ids(inner).cmp(&b.pool_ids(inner)))
}

/// Yen's k-shortest loopless paths.
///
/// Returns an empty outcome when `src == dst` or no path exists. The
/// cancellation token and deadline are checked between candidate paths;
/// cancellation aborts the whole search, a deadline keeps what is
/// already complete.
pub(crate) fn k_shortest_paths(
    inner: &GraphInner,
    src: NodeIndex,
    dst: NodeIndex,
    k: usize,
    weights: &HashMap<EdgeIndex, f64>,
    limits: &SearchLimits,
) -> Result<SearchOutcome> {
    let mut outcome = SearchOutcome {
        paths: Vec::new(),
        truncated: false,
    };

    if src == dst || k == 0 {
        return Ok(outcome);
    }

    let Some(first) =
        shortest_path(inner, weights, src, dst, &HashSet::new(), &HashSet::new())
    else {
        return Ok(outcome);
    };

    let mut accepted = vec![first];
    let mut candidates: Vec<CandidatePath> = Vec::new();

    while accepted.len() < k {
        if limits.cancelled() {
            return Err(RouterError::Cancelled);
        }
        if limits.expired() {
            outcome.truncated = true;
            break;
        }

        let prev_path = accepted.last().cloned().ok_or_else(|| {
            RouterError::InternalError("accepted path list emptied mid-search".into())
        })?;

        for spur_index in 0..prev_path.edges.len() {
            let spur_node = prev_path.nodes[spur_index];
            let root_edges = &prev_path.edges[..spur_index];

            // Edges already taken from this root prefix are off limits,
            // forcing each spur to diverge.
            let mut banned_edges = HashSet::new();
            for path in &accepted {
                if path.edges.len() > spur_index && path.edges[..spur_index] == *root_edges {
                    banned_edges.insert(path.edges[spur_index]);
                }
            }

            // Root nodes before the spur stay banned to keep paths simple.
            let banned_nodes: HashSet<NodeIndex> =
                prev_path.nodes[..spur_index].iter().copied().collect();

            let Some(spur) = shortest_path(
                inner,
                weights,
                spur_node,
                dst,
                &banned_nodes,
                &banned_edges,
            ) else {
                continue;
            };

            let mut nodes = prev_path.nodes[..spur_index].to_vec();
            nodes.extend(spur.nodes.iter().copied());
            let mut edges = root_edges.to_vec();
            edges.extend(spur.edges.iter().copied());
            let weight = edges.iter().map(|edge| weights[edge]).sum();

            let candidate = CandidatePath {
                nodes,
                edges,
                weight,
            };
            let already_known = accepted
                .iter()
                .chain(candidates.iter())
                .any(|path| path.edges == candidate.edges);
            if !already_known {
                candidates.push(candidate);
            }
        }

        if candidates.is_empty() {
            break;
        }

        candidates.sort_by(|a, b| compare_paths(a, b, inner));
        accepted.push(candidates.remove(0));
    }

    accepted.sort_by(|a, b| compare_paths(a, b, inner));
    outcome.paths = accepted;
    Ok(outcome)
}
