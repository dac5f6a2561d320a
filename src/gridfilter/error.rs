use thiserror::Error;
use uuid::Uuid;

use crate::rules::ReasonCode;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Filter not found: {0}")]
    FilterNotFound(Uuid),

    #[error("No node at path {0:?}")]
    InvalidPath(Vec<usize>),

    #[error("Filter is not valid: {}", format_reasons(.0))]
    InvalidFilter(Vec<ReasonCode>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

fn format_reasons(reasons: &[ReasonCode]) -> String {
    reasons
        .iter()
        .map(|r| r.code())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, FilterError>;
