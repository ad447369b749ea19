//! In-process store. A single lock guards the whole map, so a replace is
//! observed either entirely or not at all.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use tastematch_core::traits::{check_replace_batch, RecommendationStore};
use tastematch_core::types::{EntityId, Recommendation, ReplaceOutcome};

#[derive(Default)]
pub struct MemoryRecommendationStore {
    by_user: Mutex<BTreeMap<EntityId, Vec<Recommendation>>>,
}

impl MemoryRecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored recommendation, grouped by user id ascending.
    pub fn snapshot(&self) -> Result<Vec<Recommendation>> {
        let guard = self.by_user.lock().map_err(|_| anyhow!("recommendation map poisoned"))?;
        Ok(guard.values().flatten().cloned().collect())
    }
}

#[async_trait]
impl RecommendationStore for MemoryRecommendationStore {
    async fn replace(&self, user_ids: &BTreeSet<EntityId>, recommendations: &[Recommendation]) -> Result<ReplaceOutcome> {
        check_replace_batch(user_ids, recommendations)?;
        let mut fresh: BTreeMap<EntityId, Vec<Recommendation>> = BTreeMap::new();
        for r in recommendations {
            fresh.entry(r.user_id.clone()).or_default().push(r.clone());
        }
        let mut guard = self.by_user.lock().map_err(|_| anyhow!("recommendation map poisoned"))?;
        let mut superseded = 0;
        for user in user_ids {
            superseded += guard.remove(user).map_or(0, |old| old.len());
        }
        guard.extend(fresh);
        Ok(ReplaceOutcome { superseded, inserted: recommendations.len() })
    }

    async fn fetch(&self, user_id: &str) -> Result<Vec<Recommendation>> {
        let guard = self.by_user.lock().map_err(|_| anyhow!("recommendation map poisoned"))?;
        let mut out = guard.get(user_id).cloned().unwrap_or_default();
        out.sort_by_key(|r| r.rank);
        Ok(out)
    }
}
