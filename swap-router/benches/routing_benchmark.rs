use alloy_primitives::U256;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use swap_router::{FindRoutesOptions, LiquidityGraph, Pool, Router, RouterConfig, Token};

/// Routing benches measure the search itself, not cache lookups.
fn uncached_router(graph: Arc<LiquidityGraph>) -> Router {
    Router::with_config(
        graph,
        RouterConfig {
            enable_cache: false,
            ..Default::default()
        },
    )
    .expect("default-derived config is valid")
}

fn token(n: u64, symbol: &str) -> Token {
    Token::new(1, format!("0x{:040x}", n), symbol, 18)
}

fn pool(exchange: &str, a: &Token, b: &Token, fee_pips: u32) -> Pool {
    Pool {
        exchange: exchange.to_string(),
        token_a: a.clone(),
        token_b: b.clone(),
        fee_pips,
        reserve_a: U256::from(1_000_000u128 * 10u128.pow(18)),
        reserve_b: U256::from(1_000_000u128 * 10u128.pow(18)),
        price: 1.0,
        liquidity: 5e6,
    }
}

/// A long chain of pools: token i connects to token i+1.
fn setup_chain_graph(pool_count: usize) -> Arc<LiquidityGraph> {
    let graph = Arc::new(LiquidityGraph::new());

    for i in 0..pool_count {
        let a = token(i as u64, &format!("T{i}"));
        let b = token((i + 1) as u64, &format!("T{}", i + 1));
        graph
            .upsert_pool(pool("uniswap", &a, &b, 3000))
            .expect("bench pools are valid");
    }

    graph
}

/// A dense graph: ten tokens, every pair within distance two connected,
/// alternating venues.
fn setup_dense_graph() -> Arc<LiquidityGraph> {
    let graph = Arc::new(LiquidityGraph::new());
    let venues = ["uniswap", "sushiswap", "curve", "balancer"];

    let tokens: Vec<Token> = (0..10).map(|i| token(i, &format!("T{i}"))).collect();

    for i in 0..tokens.len() {
        for j in (i + 1)..tokens.len() {
            if j - i <= 2 {
                let venue = venues[(i + j) % venues.len()];
                graph
                    .upsert_pool(pool(venue, &tokens[i], &tokens[j], 3000))
                    .expect("bench pools are valid");
            }
        }
    }

    graph
}

fn bench_upsert_pool(c: &mut Criterion) {
    let a = token(1, "AAA");
    let b = token(2, "BBB");

    c.bench_function("upsert_pool", |bencher| {
        let graph = LiquidityGraph::new();
        bencher.iter(|| {
            graph
                .upsert_pool(black_box(pool("uniswap", &a, &b, 3000)))
                .unwrap()
        });
    });
}

fn bench_single_hop(c: &mut Criterion) {
    let graph = setup_chain_graph(100);
    let router = uncached_router(graph);
    let amount = U256::from(10u128.pow(18));

    let from = token(0, "T0").id();
    let to = token(1, "T1").id();

    c.bench_function("single_hop_routing", |bencher| {
        bencher.iter(|| {
            router
                .find_routes(
                    black_box(&from),
                    black_box(&to),
                    black_box(amount),
                    FindRoutesOptions::default(),
                )
                .unwrap()
        });
    });
}

fn bench_multi_hop(c: &mut Criterion) {
    let graph = setup_dense_graph();
    let router = uncached_router(graph);
    let amount = U256::from(10u128.pow(18));

    let mut group = c.benchmark_group("multi_hop_routing");
    for k in [1usize, 3, 5] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |bencher, &k| {
            let from = token(0, "T0").id();
            let to = token(9, "T9").id();
            bencher.iter(|| {
                router
                    .find_routes(
                        black_box(&from),
                        black_box(&to),
                        black_box(amount),
                        FindRoutesOptions {
                            k: Some(k),
                            ..Default::default()
                        },
                    )
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_upsert_pool, bench_single_hop, bench_multi_hop);
criterion_main!(benches);
