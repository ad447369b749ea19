//! Newline-delimited JSON source for tag rows.
//!
//! Each non-blank line is one `TagAssociationRow`. `entity_kind` may be
//! omitted, in which case the kind of the file applies; a line naming the
//! other kind is an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::{EntityId, EntityKind, TagAssociationRow};

#[derive(Deserialize)]
struct RawRow {
    entity_id: EntityIdField,
    #[serde(default)]
    entity_kind: Option<EntityKind>,
    #[serde(default)]
    entity_name: Option<String>,
    #[serde(default)]
    tag_id: Option<i64>,
    tag_name: String,
    #[serde(default)]
    category_id: Option<i64>,
    #[serde(default)]
    category_name: Option<String>,
}

/// Ids arrive as numbers from integer-keyed tables and as strings otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum EntityIdField {
    Int(i64),
    Text(String),
}

impl From<EntityIdField> for EntityId {
    fn from(v: EntityIdField) -> Self {
        match v {
            EntityIdField::Int(i) => i.to_string(),
            EntityIdField::Text(s) => s,
        }
    }
}

pub fn load_rows(path: &Path, kind: EntityKind) -> Result<Vec<TagAssociationRow>> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {} rows from {}", kind, path.display()))?;
    let rows = parse_rows(&content, kind).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(%kind, path = %path.display(), rows = rows.len(), "loaded tag rows");
    Ok(rows)
}

pub fn parse_rows(content: &str, kind: EntityKind) -> Result<Vec<TagAssociationRow>> {
    let mut rows = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() { continue; }
        let raw: RawRow = serde_json::from_str(line).with_context(|| format!("line {}", line_no + 1))?;
        if let Some(found) = raw.entity_kind {
            anyhow::ensure!(found == kind, "line {}: expected a {} row, found {}", line_no + 1, kind, found);
        }
        rows.push(TagAssociationRow {
            entity_id: raw.entity_id.into(),
            entity_kind: kind,
            entity_name: raw.entity_name,
            tag_id: raw.tag_id,
            tag_name: raw.tag_name,
            category_id: raw.category_id,
            category_name: raw.category_name,
        });
    }
    Ok(rows)
}
