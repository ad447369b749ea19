//! Turns flat tag rows into one characteristic text per entity.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::types::{EntityProfile, TagAssociationRow};

pub struct ProfileAggregator {
    delimiter: String,
}

impl ProfileAggregator {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self { delimiter: delimiter.into() }
    }

    /// Group `rows` by entity id, joining tag names in input order.
    ///
    /// Profiles come out in order of each entity's first row. Entities with
    /// no rows simply have no profile; an empty input yields an empty set.
    /// A tag name containing the delimiter is rejected.
    pub fn aggregate(&self, rows: &[TagAssociationRow]) -> Result<Vec<EntityProfile>> {
        let mut groups: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for row in rows {
            if row.tag_name.contains(self.delimiter.as_str()) {
                return Err(Error::DelimiterInTag { entity_id: row.entity_id.clone(), tag: row.tag_name.clone() });
            }
            groups.entry(row.entity_id.as_str()).or_default().push(row.tag_name.as_str());
        }
        Ok(groups
            .into_iter()
            .map(|(entity_id, tags)| EntityProfile {
                entity_id: entity_id.to_string(),
                characteristic_text: tags.join(self.delimiter.as_str()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_first_appearance() {
        let rows = vec![
            TagAssociationRow::user("7", "spicy"),
            TagAssociationRow::user("3", "vegan"),
            TagAssociationRow::user("7", "cheap"),
            TagAssociationRow::user("3", "quiet"),
            TagAssociationRow::user("1", "late night"),
        ];
        let profiles = ProfileAggregator::new(" | ").aggregate(&rows).expect("aggregate");
        let ids: Vec<&str> = profiles.iter().map(|p| p.entity_id.as_str()).collect();
        assert_eq!(ids, ["7", "3", "1"]);
        assert_eq!(profiles[0].characteristic_text, "spicy | cheap");
        assert_eq!(profiles[1].characteristic_text, "vegan | quiet");
        assert_eq!(profiles[2].characteristic_text, "late night");
    }

    #[test]
    fn empty_input_is_empty_output() {
        let profiles = ProfileAggregator::new(" ").aggregate(&[]).expect("aggregate");
        assert!(profiles.is_empty());
    }

    #[test]
    fn space_delimiter_joins_with_space() {
        let rows = vec![TagAssociationRow::restaurant("r1", "vegan"), TagAssociationRow::restaurant("r1", "cheap")];
        let profiles = ProfileAggregator::new(" ").aggregate(&rows).expect("aggregate");
        assert_eq!(profiles[0].characteristic_text, "vegan cheap");
    }

    #[test]
    fn tag_containing_delimiter_is_rejected() {
        let rows = vec![TagAssociationRow::user("u1", "fish | chips")];
        let err = ProfileAggregator::new(" | ").aggregate(&rows).unwrap_err();
        assert!(matches!(err, Error::DelimiterInTag { ref entity_id, .. } if entity_id == "u1"));
    }
}
