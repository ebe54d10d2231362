use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Invalid pool: {0}")]
    InvalidPool(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown token {address} on chain {chain_id}")]
    UnknownToken { chain_id: u64, address: String },

    #[error("Routing cancelled")]
    Cancelled,

    #[error("Hop {hop} produced zero output")]
    DeadHop { hop: usize },

    #[error("Adjuster fault: {0}")]
    AdjusterFault(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, RouterError>;
