use arrow_schema::{DataType, Field, Schema, TimeUnit};
use std::sync::Arc;

pub const USER_ID: &str = "user_id";
pub const RESTAURANT_ID: &str = "restaurant_id";
pub const SCORE: &str = "score";
pub const RANK: &str = "rank";
pub const CREATED_AT: &str = "created_at";

/// One row per (user, restaurant) pair; the pair is the merge key.
pub fn build_recommendation_schema() -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new(USER_ID, DataType::Utf8, false),
		Field::new(RESTAURANT_ID, DataType::Utf8, false),
		Field::new(SCORE, DataType::Float64, false),
		Field::new(RANK, DataType::UInt32, false),
		Field::new(CREATED_AT, DataType::Timestamp(TimeUnit::Millisecond, None), false),
	]))
}
