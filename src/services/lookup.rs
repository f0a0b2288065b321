use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, Recommendation, RecommendationResult, SimilarityMatrix},
    services::loader,
};

/// Handling of `k` values outside `1..=N-1`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KPolicy {
    /// Pull `k` into range, never fail
    #[default]
    Clamp,
    /// Fail with `InvalidK`
    Reject,
}

impl KPolicy {
    /// Resolves a requested `k` against the number of candidate neighbors.
    pub fn resolve(self, requested: i64, max: usize) -> AppResult<usize> {
        let in_range = requested >= 1 && (requested as u64) <= max as u64;
        match self {
            _ if in_range => Ok(requested as usize),
            KPolicy::Clamp if requested < 1 => Ok(max.min(1)),
            KPolicy::Clamp => Ok(max),
            KPolicy::Reject => Err(AppError::InvalidK { requested, max }),
        }
    }
}

/// How the query movie is removed from its own ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfExclusion {
    /// Remove the entry whose index is the query's index
    #[default]
    ExcludeQuery,
    /// Remove whatever sorts first, assuming self-similarity is the row maximum
    DropFirst,
}

/// Read-only recommendation engine over a loaded catalog and matrix
#[derive(Debug)]
pub struct LookupEngine {
    catalog: Catalog,
    similarity: SimilarityMatrix,
    k_policy: KPolicy,
    self_exclusion: SelfExclusion,
}

impl LookupEngine {
    /// Creates an engine; the matrix size must match the catalog size.
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> AppResult<Self> {
        loader::check_shape(&catalog, &similarity)?;

        Ok(Self {
            catalog,
            similarity,
            k_policy: KPolicy::default(),
            self_exclusion: SelfExclusion::default(),
        })
    }

    pub fn with_k_policy(mut self, k_policy: KPolicy) -> Self {
        self.k_policy = k_policy;
        self
    }

    pub fn with_self_exclusion(mut self, self_exclusion: SelfExclusion) -> Self {
        self.self_exclusion = self_exclusion;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the `k` movies most similar to `title`, best first.
    ///
    /// Equal scores keep ascending catalog order.
    pub fn recommend(&self, title: &str, k: i64) -> AppResult<RecommendationResult> {
        let query = self
            .catalog
            .position(title)
            .ok_or_else(|| AppError::NotFound(title.to_string()))?;

        let row = self.similarity.row(query).ok_or_else(|| {
            AppError::Internal(format!("no similarity row for catalog index {}", query))
        })?;

        let k = self.k_policy.resolve(k, self.catalog.len().saturating_sub(1))?;

        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        // sort_by is stable, so ties stay in index order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        match self.self_exclusion {
            SelfExclusion::ExcludeQuery => ranked.retain(|(index, _)| *index != query),
            SelfExclusion::DropFirst => {
                if !ranked.is_empty() {
                    ranked.remove(0);
                }
            }
        }

        let recommendations = ranked
            .into_iter()
            .take(k)
            .enumerate()
            .filter_map(|(position, (index, score))| {
                self.catalog
                    .get(index)
                    .map(|entry| Recommendation::new(position + 1, index, entry.title.clone(), score))
            })
            .collect();

        Ok(recommendations)
    }
}
