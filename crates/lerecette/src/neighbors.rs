// Nearest Neighbor Search
//
// *Le Voisin* (The Neighbor) - Brute-force cosine distance search over standardized rows

use crate::recipe::NutritionVector;
use serde::{Deserialize, Serialize};

/// A single search hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Position of the row in the searched matrix
    pub index: usize,

    /// Cosine distance to the query, when requested
    pub distance: Option<f64>,
}

/// Brute-force cosine index over one request's standardized rows
///
/// Every query scans all rows. The rows are the filtered candidates of a
/// single request, so there is nothing to maintain between queries.
#[derive(Debug, Clone)]
pub struct NeighborSearcher {
    rows: Vec<NutritionVector>,
}

impl NeighborSearcher {
    /// Build the index from standardized rows
    ///
    /// # Example
    ///
    /// ```
    /// use lerecette::{NeighborSearcher, NutritionVector};
    ///
    /// let searcher = NeighborSearcher::new(vec![
    ///     NutritionVector([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ///     NutritionVector([0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    /// ]);
    /// let query = NutritionVector([1.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    /// let hits = searcher.kneighbors(&query, 1, false).unwrap();
    /// assert_eq!(hits[0].index, 0);
    /// ```
    pub fn new(rows: Vec<NutritionVector>) -> Self {
        Self { rows }
    }

    /// Number of indexed rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the `k` rows closest to `query`
    ///
    /// Results are sorted by ascending distance; equal distances keep row
    /// order.
    ///
    /// # Arguments
    ///
    /// * `query` - Standardized query vector
    /// * `k` - Number of neighbors, `1..=len()`
    /// * `return_distance` - Whether to fill [`Neighbor::distance`]
    pub fn kneighbors(
        &self,
        query: &NutritionVector,
        k: usize,
        return_distance: bool,
    ) -> Result<Vec<Neighbor>, Error> {
        if k == 0 {
            return Err(Error::InvalidK);
        }
        if k > self.rows.len() {
            return Err(Error::NotEnoughRows {
                requested: k,
                available: self.rows.len(),
            });
        }

        let mut scored: Vec<(usize, f64)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| (index, cosine_distance(query.as_slice(), row.as_slice())))
            .collect();

        // sort_by is stable, so ties stay in row order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(index, distance)| Neighbor {
                index,
                distance: return_distance.then_some(distance),
            })
            .collect())
    }
}

/// Cosine distance between two vectors
///
/// Distance = 1 - (A · B) / (||A|| * ||B||), in `[0, 2]`.
/// A zero-magnitude vector on either side gives 1.0.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let mut dot_product = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    // Rounding can push the ratio just past +-1
    let similarity = (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0);
    1.0 - similarity
}

/// Neighbor search errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Zero neighbors requested
    #[error("Number of neighbors must be positive")]
    InvalidK,

    /// More neighbors requested than rows indexed
    #[error("Requested {requested} neighbors but only {available} rows are indexed")]
    NotEnoughRows {
        /// Neighbors requested
        requested: usize,
        /// Rows available
        available: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(i: usize) -> NutritionVector {
        let mut v = [0.0; 9];
        v[i] = 1.0;
        NutritionVector(v)
    }

    #[test]
    fn test_cosine_distance() {
        let a = unit(0).0;
        assert!(cosine_distance(&a, &a).abs() < 1e-12);
        assert!((cosine_distance(&a, &unit(1).0) - 1.0).abs() < 1e-12);

        let neg: Vec<f64> = a.iter().map(|v| -v).collect();
        assert!((cosine_distance(&a, &neg) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_zero_vector() {
        let zero = [0.0; 9];
        assert_eq!(cosine_distance(&zero, &unit(3).0), 1.0);
        assert_eq!(cosine_distance(&unit(3).0, &zero), 1.0);
        assert_eq!(cosine_distance(&zero, &zero), 1.0);
    }

    #[test]
    fn test_kneighbors_order() {
        let mut near = [0.0; 9];
        near[0] = 0.9;
        near[1] = 0.1;
        let searcher = NeighborSearcher::new(vec![unit(1), NutritionVector(near), unit(0)]);

        let hits = searcher.kneighbors(&unit(0), 2, true).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 2);
        assert_eq!(hits[1].index, 1);
        assert!(hits[0].distance.unwrap() <= hits[1].distance.unwrap());
    }

    #[test]
    fn test_kneighbors_without_distance() {
        let searcher = NeighborSearcher::new(vec![unit(0), unit(1)]);
        let hits = searcher.kneighbors(&unit(0), 2, false).unwrap();
        assert!(hits.iter().all(|h| h.distance.is_none()));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let searcher = NeighborSearcher::new(vec![unit(1), unit(2), unit(3), unit(0)]);
        let hits = searcher.kneighbors(&unit(0), 4, true).unwrap();
        let indices: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_zero_query_ties_everything() {
        let searcher = NeighborSearcher::new(vec![unit(4), unit(5), unit(6)]);
        let hits = searcher
            .kneighbors(&NutritionVector::default(), 3, true)
            .unwrap();
        assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(hits.iter().all(|h| h.distance == Some(1.0)));
    }

    #[test]
    fn test_kneighbors_preconditions() {
        let searcher = NeighborSearcher::new(vec![unit(0)]);
        assert_eq!(searcher.kneighbors(&unit(0), 0, false), Err(Error::InvalidK));
        assert_eq!(
            searcher.kneighbors(&unit(0), 2, false),
            Err(Error::NotEnoughRows {
                requested: 2,
                available: 1
            })
        );
    }
}
