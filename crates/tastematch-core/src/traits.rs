use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::types::{EntityId, Recommendation, ReplaceOutcome};

/// Durable sink for recommendations.
///
/// `replace` deletes every stored recommendation for exactly `user_ids` and
/// inserts `recommendations` as one all-or-nothing unit. Every
/// recommendation must belong to a user in `user_ids`; users outside the set
/// are never touched.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    async fn replace(
        &self,
        user_ids: &BTreeSet<EntityId>,
        recommendations: &[Recommendation],
    ) -> anyhow::Result<ReplaceOutcome>;

    /// Stored recommendations for one user, in rank order.
    async fn fetch(&self, user_id: &str) -> anyhow::Result<Vec<Recommendation>>;
}

/// Rejects a replace batch that carries recommendations for users outside
/// the touched set. Stores call this before writing anything.
pub fn check_replace_batch(user_ids: &BTreeSet<EntityId>, recommendations: &[Recommendation]) -> anyhow::Result<()> {
    if let Some(stray) = recommendations.iter().find(|r| !user_ids.contains(&r.user_id)) {
        anyhow::bail!("recommendation for user {} is outside the replaced user set", stray.user_id);
    }
    Ok(())
}
