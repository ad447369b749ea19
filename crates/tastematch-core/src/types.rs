//! Domain types flowing through the scoring pipeline.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub type EntityId = String;

/// Total order over entity ids: integer ids first, compared numerically,
/// then every other id lexicographically.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Which side of the match an entity sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Restaurant,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Restaurant => f.write_str("restaurant"),
        }
    }
}

/// One tag attached to one entity. Many rows per entity.
///
/// Only `entity_id` and `tag_name` take part in scoring; the remaining
/// fields mirror the joined tag/category tables rows are sourced from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagAssociationRow {
    pub entity_id: EntityId,
    pub entity_kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<i64>,
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl TagAssociationRow {
    pub fn new(entity_kind: EntityKind, entity_id: impl Into<EntityId>, tag_name: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_kind,
            entity_name: None,
            tag_id: None,
            tag_name: tag_name.into(),
            category_id: None,
            category_name: None,
        }
    }

    pub fn user(entity_id: impl Into<EntityId>, tag_name: impl Into<String>) -> Self {
        Self::new(EntityKind::User, entity_id, tag_name)
    }

    pub fn restaurant(entity_id: impl Into<EntityId>, tag_name: impl Into<String>) -> Self {
        Self::new(EntityKind::Restaurant, entity_id, tag_name)
    }
}

/// The delimiter-joined tag names of a single entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityProfile {
    pub entity_id: EntityId,
    pub characteristic_text: String,
}

/// A ranked match persisted for a user.
///
/// `score` is a cosine similarity in `[0, 1]`; `rank` starts at 1 within
/// each user's list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub user_id: EntityId,
    pub restaurant_id: EntityId,
    pub score: f64,
    pub rank: u32,
}

/// Row counts reported by a store after an atomic replace.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Prior rows of the touched users that the write removed or overwrote.
    pub superseded: usize,
    pub inserted: usize,
}
