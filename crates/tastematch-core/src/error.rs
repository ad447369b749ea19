use thiserror::Error;

use crate::types::{EntityId, EntityKind};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No {0} tag rows supplied")]
    EmptyInput(EntityKind),

    #[error("Aggregation produced no {0} profiles")]
    NoProfiles(EntityKind),

    #[error("Tag {tag:?} of entity {entity_id} contains the profile delimiter")]
    DelimiterInTag { entity_id: EntityId, tag: String },

    #[error("Insufficient vocabulary: fitted {terms} distinct term(s)")]
    InsufficientVocabulary { terms: usize },

    #[error("Store rejected replace: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
