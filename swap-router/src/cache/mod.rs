pub mod route_cache;

pub use route_cache::{CacheStats, RouteCache, RouteCacheKey};
