//! Dimensionality reduction for visualization.
//!
//! - **t-SNE**: document map from topic-probability vectors
//! - **MDS**: classical (Torgerson) scaling of topic distances for the
//!   intertopic map

pub mod mds;
pub mod tsne;

pub use mds::{classical_mds, jensen_shannon};
pub use tsne::{sample_points, Tsne, TsneParams};

/// Compute squared Euclidean distance
#[inline]
pub fn squared_euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Pairwise squared distance matrix
pub fn pairwise_squared_distances(data: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = data.len();
    let mut distances = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = squared_euclidean_distance(&data[i], &data[j]);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairwise_squared_distances() {
        let data = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![0.0, 1.0]];
        let d = pairwise_squared_distances(&data);
        assert_eq!(d[0][1], 25.0);
        assert_eq!(d[1][0], 25.0);
        assert_eq!(d[0][2], 1.0);
        assert_eq!(d[2][2], 0.0);
    }
}
