//! LanceDB-backed recommendation table.
//!
//! `replace` runs as one merge-insert keyed on `(user_id, restaurant_id)`:
//! new pairs are inserted, rows of the touched users absent from the new batch
//! are deleted, and pairs present on both sides are overwritten with every
//! column of the new row (score, rank, created_at). Readers therefore see the
//! same thing as a delete followed by an insert, and no column of an old row
//! survives. The merge commits a single table version, so a failure leaves the
//! previous version (and every prior recommendation) in place.
//!
//! `ReplaceOutcome::superseded` counts every prior row of the touched users,
//! whether the merge deleted or overwrote it.

use anyhow::{anyhow, Result};
use arrow_array::{Array, Float64Array, RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray, UInt32Array};
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Connection;
use std::collections::BTreeSet;
use std::sync::Arc;

use tastematch_core::traits::{check_replace_batch, RecommendationStore};
use tastematch_core::types::{EntityId, Recommendation, ReplaceOutcome};

use crate::schema::{build_recommendation_schema, RANK, RESTAURANT_ID, SCORE, USER_ID};
use crate::table::{ensure_table, in_filter, open_db, quote};

pub struct LanceRecommendationStore {
	db: Connection,
	table_name: String,
}

impl LanceRecommendationStore {
	pub async fn new(uri: &str, table_name: &str) -> Result<Self> {
		let db = open_db(uri).await?;
		ensure_table(&db, table_name, build_recommendation_schema()).await?;
		tracing::debug!(uri, table = table_name, "opened recommendation table");
		Ok(Self { db, table_name: table_name.to_string() })
	}

	pub async fn count_rows(&self) -> Result<usize> {
		let t = self.db.open_table(&self.table_name).execute().await?;
		Ok(t.count_rows(None).await?)
	}

	fn to_record_batch(recommendations: &[Recommendation]) -> Result<RecordBatch> {
		let now = Utc::now().timestamp_millis();
		let mut user_ids = Vec::with_capacity(recommendations.len());
		let mut restaurant_ids = Vec::with_capacity(recommendations.len());
		let mut scores = Vec::with_capacity(recommendations.len());
		let mut ranks = Vec::with_capacity(recommendations.len());
		for r in recommendations {
			user_ids.push(r.user_id.clone());
			restaurant_ids.push(r.restaurant_id.clone());
			scores.push(r.score);
			ranks.push(r.rank);
		}
		let batch = RecordBatch::try_new(
			build_recommendation_schema(),
			vec![
				Arc::new(StringArray::from(user_ids)),
				Arc::new(StringArray::from(restaurant_ids)),
				Arc::new(Float64Array::from(scores)),
				Arc::new(UInt32Array::from(ranks)),
				Arc::new(TimestampMillisecondArray::from(vec![now; recommendations.len()])),
			],
		)?;
		Ok(batch)
	}
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
	batch
		.column_by_name(name)
		.and_then(|c| c.as_any().downcast_ref::<T>())
		.ok_or_else(|| anyhow!("recommendation.{} column missing", name))
}

#[async_trait]
impl RecommendationStore for LanceRecommendationStore {
	async fn replace(&self, user_ids: &BTreeSet<EntityId>, recommendations: &[Recommendation]) -> Result<ReplaceOutcome> {
		check_replace_batch(user_ids, recommendations)?;
		if user_ids.is_empty() { return Ok(ReplaceOutcome::default()); }
		let t = self.db.open_table(&self.table_name).execute().await?;
		let filter = in_filter(USER_ID, user_ids);
		let prior = t.count_rows(Some(filter.clone())).await?;
		if recommendations.is_empty() {
			t.delete(&filter).await?;
			return Ok(ReplaceOutcome { superseded: prior, inserted: 0 });
		}
		let batch = Self::to_record_batch(recommendations)?;
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), build_recommendation_schema()));
		let mut mi = t.merge_insert(&[USER_ID, RESTAURANT_ID]);
		mi.when_matched_update_all(None)
			.when_not_matched_insert_all()
			.when_not_matched_by_source_delete(Some(filter));
		let res = mi.execute(reader).await?;
		tracing::debug!(
			table = %self.table_name,
			users = user_ids.len(),
			updated = res.num_updated_rows,
			inserted = res.num_inserted_rows,
			"merge-insert committed"
		);
		Ok(ReplaceOutcome { superseded: prior, inserted: recommendations.len() })
	}

	async fn fetch(&self, user_id: &str) -> Result<Vec<Recommendation>> {
		let t = self.db.open_table(&self.table_name).execute().await?;
		let mut stream = t.query().only_if(format!("{} = {}", USER_ID, quote(user_id))).execute().await?;
		let mut out = Vec::new();
		while let Some(batch) = stream.try_next().await? {
			let users = column::<StringArray>(&batch, USER_ID)?;
			let restaurants = column::<StringArray>(&batch, RESTAURANT_ID)?;
			let scores = column::<Float64Array>(&batch, SCORE)?;
			let ranks = column::<UInt32Array>(&batch, RANK)?;
			for i in 0..batch.num_rows() {
				out.push(Recommendation {
					user_id: users.value(i).to_string(),
					restaurant_id: restaurants.value(i).to_string(),
					score: scores.value(i),
					rank: ranks.value(i),
				});
			}
		}
		out.sort_by_key(|r| r.rank);
		Ok(out)
	}
}
