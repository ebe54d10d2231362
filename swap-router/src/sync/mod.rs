pub mod pool_feed;

pub use pool_feed::{FeedConfig, PoolFeed};
