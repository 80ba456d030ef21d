use thiserror::Error;

use crate::agent::AgentId;

#[derive(Debug, Error)]
pub enum ConvoyError {
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ConvoyError>;
