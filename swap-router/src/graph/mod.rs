pub mod edge;
pub mod node;
pub mod pool;
pub mod pool_graph;

pub use edge::{PoolEdge, SwapDirection};
pub use node::{Token, TokenId};
pub use pool::{Pool, PoolId};
pub use pool_graph::{GraphStats, LiquidityGraph};
