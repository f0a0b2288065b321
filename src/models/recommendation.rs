use serde::{Deserialize, Serialize};

/// One ranked neighbor of the query movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// 1-based position in the result
    pub rank: usize,
    /// Catalog index of the recommended movie
    pub index: usize,
    pub title: String,
    /// Raw similarity score, used for ordering
    pub score: f64,
    /// Score rescaled to a percentage for display
    pub percent: f64,
}

impl Recommendation {
    pub fn new(rank: usize, index: usize, title: String, score: f64) -> Self {
        Self {
            rank,
            index,
            title,
            score,
            percent: to_percent(score),
        }
    }
}

/// Ordered neighbors, best first
pub type RecommendationResult = Vec<Recommendation>;

/// Rescales a score to a percentage rounded to one decimal place
fn to_percent(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        let rec = Recommendation::new(1, 3, "Alien".to_string(), 0.87654);
        assert_eq!(rec.percent, 87.7);
        assert_eq!(rec.score, 0.87654);
    }
}
