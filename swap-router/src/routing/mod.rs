pub mod adjuster;
pub mod cost;
pub mod parallel;
pub mod pathfinder;
pub mod route;
pub mod router;

pub use adjuster::{IdentityAdjuster, RouteAdjuster};
pub use cost::{default_gas_table, CostModel, WeightCoefficients};
pub use parallel::{batch_find_routes, BatchRequest};
pub use route::{SwapRoute, SwapStep};
pub use router::{FindRoutesOptions, RouteSet, Router, RouterConfig};
