use ndarray::{Array2, ArrayView1};

use tastematch_core::error::{Error, Result};
use tastematch_core::types::EntityId;
use tastematch_text::VectorSet;

/// Row per user, column per restaurant, both in profile order.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    users: Vec<EntityId>,
    restaurants: Vec<EntityId>,
    scores: Array2<f64>,
}

impl SimilarityMatrix {
    pub fn users(&self) -> &[EntityId] {
        &self.users
    }

    pub fn restaurants(&self) -> &[EntityId] {
        &self.restaurants
    }

    /// `(users, restaurants)`
    pub fn dim(&self) -> (usize, usize) {
        self.scores.dim()
    }

    pub fn row(&self, user: usize) -> ArrayView1<'_, f64> {
        self.scores.row(user)
    }

    pub fn get(&self, user: usize, restaurant: usize) -> f64 {
        self.scores[[user, restaurant]]
    }
}

pub struct SimilarityEngine;

impl SimilarityEngine {
    /// `sim[u][r] = dot(user_u, restaurant_r)`, clamped to `[0, 1]`.
    ///
    /// Both sets must come from the same fitted space. A zero vector scores
    /// 0 against everything.
    pub fn compute(users: &VectorSet, restaurants: &VectorSet) -> Result<SimilarityMatrix> {
        if users.space() != restaurants.space() {
            return Err(Error::InvalidInput("user and restaurant vectors come from different feature spaces".into()));
        }
        let mut scores = Array2::<f64>::zeros((users.len(), restaurants.len()));
        for (u, user_vec) in users.vectors().iter().enumerate() {
            if user_vec.is_zero() { continue; }
            for (r, restaurant_vec) in restaurants.vectors().iter().enumerate() {
                scores[[u, r]] = user_vec.dot(restaurant_vec).clamp(0.0, 1.0);
            }
        }
        let zero_users = users.vectors().iter().filter(|v| v.is_zero()).count();
        let zero_restaurants = restaurants.vectors().iter().filter(|v| v.is_zero()).count();
        if zero_users + zero_restaurants > 0 {
            tracing::warn!(zero_users, zero_restaurants, "profiles with no in-vocabulary term score 0 everywhere");
        }
        Ok(SimilarityMatrix { users: users.ids().to_vec(), restaurants: restaurants.ids().to_vec(), scores })
    }
}
