//! tastematch-pipeline
//!
//! The five-stage batch: aggregate tag rows into profiles, fit one TF-IDF
//! space over both sides, score every user against every restaurant, rank,
//! and hand the ranked lists to a store as one replace-for-user write.
//!
//! Stages run strictly in sequence over complete inputs. Nothing is written
//! unless every scoring stage succeeded.

use serde::Serialize;
use std::collections::BTreeSet;

use tastematch_core::config::PipelineSettings;
use tastematch_core::error::{Error, Result};
use tastematch_core::profile::ProfileAggregator;
use tastematch_core::traits::RecommendationStore;
use tastematch_core::types::{EntityId, EntityKind, EntityProfile, Recommendation, TagAssociationRow};
use tastematch_score::{SimilarityEngine, TopKSelector};
use tastematch_text::TfidfVectorizer;

const PREVIEW: usize = 5;

/// Counts describing one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub users: usize,
    pub restaurants: usize,
    pub vocabulary: usize,
    pub recommendations: usize,
    pub superseded: usize,
    pub inserted: usize,
}

/// Output of the scoring stages, ready for the replace write.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRun {
    /// Every user with a profile; their stored lists are replaced wholesale.
    pub touched_users: BTreeSet<EntityId>,
    pub recommendations: Vec<Recommendation>,
    pub summary: RunSummary,
}

pub struct RecommendationPipeline {
    settings: PipelineSettings,
    vectorizer: TfidfVectorizer,
}

impl RecommendationPipeline {
    pub fn new(settings: PipelineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, vectorizer: TfidfVectorizer::new() })
    }

    /// Run the scoring stages without touching any store.
    pub fn score(&self, user_rows: &[TagAssociationRow], restaurant_rows: &[TagAssociationRow]) -> Result<ScoredRun> {
        check_rows(user_rows, EntityKind::User)?;
        check_rows(restaurant_rows, EntityKind::Restaurant)?;

        let aggregator = ProfileAggregator::new(self.settings.delimiter.as_str());
        let user_profiles = profiles(&aggregator, user_rows, EntityKind::User)?;
        let restaurant_profiles = profiles(&aggregator, restaurant_rows, EntityKind::Restaurant)?;
        tracing::info!(stage = 1, users = user_profiles.len(), restaurants = restaurant_profiles.len(), "profiles aggregated");

        let corpus: Vec<&str> = user_profiles
            .iter()
            .chain(restaurant_profiles.iter())
            .map(|p| p.characteristic_text.as_str())
            .collect();
        let space = self.vectorizer.fit(&corpus)?;
        let user_vecs = space.project(&user_profiles);
        let restaurant_vecs = space.project(&restaurant_profiles);
        tracing::info!(stage = 2, vocabulary = space.len(), documents = space.documents(), "tf-idf space fitted");

        let matrix = SimilarityEngine::compute(&user_vecs, &restaurant_vecs)?;
        tracing::info!(stage = 3, rows = matrix.dim().0, cols = matrix.dim().1, "similarity computed");

        let recommendations = TopKSelector::from_settings(&self.settings).select(&matrix);
        tracing::info!(stage = 4, selection = ?self.settings.selection, recommendations = recommendations.len(), "recommendations ranked");
        for r in recommendations.iter().take(PREVIEW) {
            tracing::debug!(user = %r.user_id, restaurant = %r.restaurant_id, score = r.score, rank = r.rank, "recommendation");
        }

        let summary = RunSummary {
            users: user_profiles.len(),
            restaurants: restaurant_profiles.len(),
            vocabulary: space.len(),
            recommendations: recommendations.len(),
            ..RunSummary::default()
        };
        let touched_users = user_profiles.into_iter().map(|p| p.entity_id).collect();
        Ok(ScoredRun { touched_users, recommendations, summary })
    }

    /// Score, then replace the stored lists of every profiled user in one
    /// atomic write. Store failures surface as `Error::Store`; no retry.
    pub async fn run<S>(&self, user_rows: &[TagAssociationRow], restaurant_rows: &[TagAssociationRow], store: &S) -> Result<RunSummary>
    where
        S: RecommendationStore + ?Sized,
    {
        let scored = self.score(user_rows, restaurant_rows)?;
        let outcome = store
            .replace(&scored.touched_users, &scored.recommendations)
            .await
            .map_err(|e| Error::Store(format!("{e:#}")))?;
        tracing::info!(stage = 5, users = scored.touched_users.len(), superseded = outcome.superseded, inserted = outcome.inserted, "recommendations replaced");
        Ok(RunSummary { superseded: outcome.superseded, inserted: outcome.inserted, ..scored.summary })
    }
}

fn check_rows(rows: &[TagAssociationRow], kind: EntityKind) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::EmptyInput(kind));
    }
    if let Some(row) = rows.iter().find(|r| r.entity_kind != kind) {
        return Err(Error::InvalidInput(format!("{} row for entity {} in the {} input", row.entity_kind, row.entity_id, kind)));
    }
    Ok(())
}

fn profiles(aggregator: &ProfileAggregator, rows: &[TagAssociationRow], kind: EntityKind) -> Result<Vec<EntityProfile>> {
    let profiles = aggregator.aggregate(rows)?;
    if profiles.is_empty() {
        return Err(Error::NoProfiles(kind));
    }
    for p in profiles.iter().take(PREVIEW) {
        tracing::debug!(%kind, id = %p.entity_id, text = %p.characteristic_text, "profile");
    }
    Ok(profiles)
}
