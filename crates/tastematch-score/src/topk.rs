use std::cmp::Ordering;

use tastematch_core::config::{PipelineSettings, Selection, TieBreak};
use tastematch_core::types::{compare_ids, Recommendation};

use crate::similarity::SimilarityMatrix;

/// Reduces each user's similarity row to a ranked list.
///
/// Rows are ordered by `(score desc, tie-break asc)`, a total order, then
/// truncated to `k` in top-k mode. Output is grouped by user in matrix row
/// order with ranks starting at 1.
#[derive(Debug, Clone, Copy)]
pub struct TopKSelector {
    selection: Selection,
    tie_break: TieBreak,
    drop_zero_scores: bool,
}

impl TopKSelector {
    pub fn new(selection: Selection, tie_break: TieBreak) -> Self {
        Self { selection, tie_break, drop_zero_scores: false }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(settings.selection, settings.tie_break).drop_zero_scores(settings.drop_zero_scores)
    }

    #[must_use]
    pub fn drop_zero_scores(mut self, drop: bool) -> Self {
        self.drop_zero_scores = drop;
        self
    }

    pub fn select(&self, matrix: &SimilarityMatrix) -> Vec<Recommendation> {
        let (users, restaurants) = matrix.dim();
        let limit = match self.selection {
            Selection::TopK { k } => k.min(restaurants),
            Selection::CrossProduct => restaurants,
        };
        let mut out = Vec::with_capacity(users * limit);
        for u in 0..users {
            let row = matrix.row(u);
            let mut order: Vec<usize> = (0..restaurants).filter(|&r| !(self.drop_zero_scores && row[r] <= 0.0)).collect();
            order.sort_by(|&a, &b| row[b].total_cmp(&row[a]).then_with(|| self.tie(matrix, a, b)));
            order.truncate(limit);
            let user_id = &matrix.users()[u];
            out.extend(order.into_iter().zip(1u32..).map(|(r, rank)| Recommendation {
                user_id: user_id.clone(),
                restaurant_id: matrix.restaurants()[r].clone(),
                score: row[r],
                rank,
            }));
        }
        out
    }

    fn tie(&self, matrix: &SimilarityMatrix, a: usize, b: usize) -> Ordering {
        match self.tie_break {
            TieBreak::RestaurantId => compare_ids(&matrix.restaurants()[a], &matrix.restaurants()[b]),
            TieBreak::ProfileOrder => a.cmp(&b),
        }
    }
}
