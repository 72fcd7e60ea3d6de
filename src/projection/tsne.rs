//! Exact t-SNE (van der Maaten & Hinton, 2008).
//!
//! O(n²) per iteration, which is fine for survey-sized corpora of a few
//! thousand responses. Input rows are topic-probability vectors.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

use super::pairwise_squared_distances;

#[derive(Debug, Clone)]
pub struct TsneParams {
    pub perplexity: f64,
    pub learning_rate: f64,
    pub iterations: usize,
    pub early_exaggeration: f64,
    /// Iterations that use early exaggeration and the low momentum
    pub exaggeration_iterations: usize,
    pub seed: u64,
}

impl Default for TsneParams {
    fn default() -> Self {
        Self {
            perplexity: 30.0,
            learning_rate: 200.0,
            iterations: 1000,
            early_exaggeration: 12.0,
            exaggeration_iterations: 250,
            seed: 42,
        }
    }
}

pub struct Tsne {
    params: TsneParams,
}

impl Tsne {
    pub fn new(params: TsneParams) -> Self {
        Self { params }
    }

    /// Perplexity actually used for `n` points: the configured value,
    /// clamped so each point has enough neighbours to reach it.
    pub fn effective_perplexity(&self, n: usize) -> f64 {
        let limit = (n.saturating_sub(1)) as f64 / 3.0;
        self.params.perplexity.min(limit).max(1.0)
    }

    /// Project rows of `data` to 2-D.
    pub fn fit_transform(&self, data: &[Vec<f64>]) -> Vec<[f64; 2]> {
        let n = data.len();
        match n {
            0 => return Vec::new(),
            1 => return vec![[0.0, 0.0]],
            _ => {}
        }

        let perplexity = self.effective_perplexity(n);
        let p = joint_probabilities(&pairwise_squared_distances(data), perplexity);

        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut y: Vec<[f64; 2]> = (0..n)
            .map(|_| [initial_coordinate(&mut rng), initial_coordinate(&mut rng)])
            .collect();
        let mut update = vec![[0.0f64; 2]; n];
        let mut gains = vec![[1.0f64; 2]; n];
        let mut num = vec![vec![0.0f64; n]; n];

        for it in 0..self.params.iterations {
            let early = it < self.params.exaggeration_iterations;
            let exaggeration = if early { self.params.early_exaggeration } else { 1.0 };
            let momentum = if early { 0.5 } else { 0.8 };

            // Student-t affinities in the embedding
            let mut sum_num = 0.0;
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = y[i][0] - y[j][0];
                    let dy = y[i][1] - y[j][1];
                    let q = 1.0 / (1.0 + dx * dx + dy * dy);
                    num[i][j] = q;
                    num[j][i] = q;
                    sum_num += 2.0 * q;
                }
            }
            let sum_num = sum_num.max(f64::MIN_POSITIVE);

            for i in 0..n {
                let mut grad = [0.0f64; 2];
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let q = (num[i][j] / sum_num).max(1e-12);
                    let mult = 4.0 * (exaggeration * p[i][j] - q) * num[i][j];
                    grad[0] += mult * (y[i][0] - y[j][0]);
                    grad[1] += mult * (y[i][1] - y[j][1]);
                }

                for d in 0..2 {
                    let same_direction = (grad[d] > 0.0) == (update[i][d] > 0.0);
                    gains[i][d] = if same_direction {
                        (gains[i][d] * 0.8).max(0.01)
                    } else {
                        gains[i][d] + 0.2
                    };
                    update[i][d] =
                        momentum * update[i][d] - self.params.learning_rate * gains[i][d] * grad[d];
                }
            }

            for i in 0..n {
                y[i][0] += update[i][0];
                y[i][1] += update[i][1];
            }
            center(&mut y);

            if (it + 1) % 250 == 0 {
                debug!(iteration = it + 1, total = self.params.iterations, "t-SNE step");
            }
        }

        y
    }
}

/// Indices of the documents to project: all of them when `n <= max_points`,
/// otherwise a seeded uniform sample of `max_points`, in ascending order.
pub fn sample_points(n: usize, max_points: usize, seed: u64) -> Vec<usize> {
    if n <= max_points {
        return (0..n).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, n, max_points).into_vec();
    picked.sort_unstable();
    picked
}

/// Symmetrized input affinities P with a per-point Gaussian bandwidth found by
/// binary search so each conditional distribution hits the target perplexity.
fn joint_probabilities(distances: &[Vec<f64>], perplexity: f64) -> Vec<Vec<f64>> {
    let n = distances.len();
    let target_entropy = perplexity.ln();
    let mut conditional = vec![vec![0.0f64; n]; n];

    for i in 0..n {
        let mut beta = 1.0f64;
        let mut beta_min = f64::NEG_INFINITY;
        let mut beta_max = f64::INFINITY;

        for _ in 0..100 {
            let mut sum = 0.0;
            for j in 0..n {
                let v = if i == j { 0.0 } else { (-distances[i][j] * beta).exp() };
                conditional[i][j] = v;
                sum += v;
            }
            let sum = sum.max(1e-300);

            let mut weighted = 0.0;
            for j in 0..n {
                conditional[i][j] /= sum;
                weighted += distances[i][j] * conditional[i][j];
            }
            let entropy = sum.ln() + beta * weighted;

            let diff = entropy - target_entropy;
            if diff.abs() < 1e-5 {
                break;
            }
            if diff > 0.0 {
                beta_min = beta;
                beta = if beta_max.is_finite() { (beta + beta_max) / 2.0 } else { beta * 2.0 };
            } else {
                beta_max = beta;
                beta = if beta_min.is_finite() { (beta + beta_min) / 2.0 } else { beta / 2.0 };
            }
        }
    }

    let scale = 2.0 * n as f64;
    let mut joint = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                joint[i][j] = ((conditional[i][j] + conditional[j][i]) / scale).max(1e-12);
            }
        }
    }
    joint
}

fn center(y: &mut [[f64; 2]]) {
    let n = y.len() as f64;
    let mean_x = y.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = y.iter().map(|p| p[1]).sum::<f64>() / n;
    for p in y.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
    }
}

/// Small Gaussian jitter, N(0, 1e-4²), for the initial embedding.
fn initial_coordinate(rng: &mut StdRng) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * 1e-4
}
