//! Latent Dirichlet Allocation via collapsed Gibbs sampling.
//!
//! Each token position carries a topic assignment. A sweep resamples every
//! assignment from
//!
//! ```text
//! p(z = t | rest) ∝ (n_dt + α) · (n_tw + η) / (n_t + V·η)
//! ```
//!
//! with the token's own assignment removed from the counts. After the last
//! sweep the document-topic (θ) and topic-word (φ) distributions are read off
//! the counts.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::dictionary::Corpus;
use super::traits::TopicModeler;
use super::EmptyCorpus;

/// LDA hyperparameters.
#[derive(Debug, Clone)]
pub struct LdaParams {
    pub num_topics: usize,
    /// Full Gibbs sweeps over the corpus
    pub iterations: usize,
    /// Document-topic prior; defaults to 1/K
    pub alpha: Option<f64>,
    /// Topic-word prior; defaults to 1/K
    pub eta: Option<f64>,
    pub seed: u64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            num_topics: 10,
            iterations: 200,
            alpha: None,
            eta: None,
            seed: 42,
        }
    }
}

impl LdaParams {
    fn priors(&self) -> (f64, f64) {
        let symmetric = 1.0 / self.num_topics as f64;
        (
            self.alpha.unwrap_or(symmetric),
            self.eta.unwrap_or(symmetric),
        )
    }
}

/// Collapsed Gibbs sampler.
pub struct GibbsLda {
    pub params: LdaParams,
}

impl GibbsLda {
    pub fn new(params: LdaParams) -> Self {
        Self { params }
    }
}

impl TopicModeler for GibbsLda {
    fn fit(&self, corpus: &Corpus) -> Result<LdaModel> {
        let k = self.params.num_topics;
        if k == 0 {
            anyhow::bail!("Number of topics must be positive");
        }
        if corpus.dictionary.is_empty() {
            return Err(EmptyCorpus {
                documents: corpus.num_documents(),
            }
            .into());
        }

        let (alpha, eta) = self.params.priors();
        if alpha <= 0.0 || eta <= 0.0 {
            anyhow::bail!("LDA priors must be positive (alpha={alpha}, eta={eta})");
        }

        let mut sampler = Sampler::init(corpus, k, alpha, eta, self.params.seed);

        info!(
            documents = corpus.num_documents(),
            vocabulary = corpus.dictionary.len(),
            tokens = sampler.total_tokens(),
            topics = k,
            iterations = self.params.iterations,
            "Fitting LDA"
        );

        for it in 0..self.params.iterations {
            sampler.sweep();
            if (it + 1) % 50 == 0 {
                debug!(iteration = it + 1, total = self.params.iterations, "Gibbs sweep");
            }
        }

        Ok(sampler.into_model(corpus))
    }
}

/// Count tables and assignments for one sampling run.
struct Sampler {
    k: usize,
    vocab_size: usize,
    alpha: f64,
    eta: f64,
    /// Word id at each token position, per document
    words: Vec<Vec<usize>>,
    /// Topic assignment at each token position, per document
    z: Vec<Vec<usize>>,
    /// [doc][topic]
    ndk: Vec<Vec<u32>>,
    /// [topic][word]
    nkw: Vec<Vec<u32>>,
    /// [topic]
    nk: Vec<u32>,
    weights: Vec<f64>,
    rng: StdRng,
}

impl Sampler {
    fn init(corpus: &Corpus, k: usize, alpha: f64, eta: f64, seed: u64) -> Self {
        let vocab_size = corpus.dictionary.len();
        let mut rng = StdRng::seed_from_u64(seed);

        let words: Vec<Vec<usize>> = corpus
            .documents
            .iter()
            .map(|bow| {
                bow.iter()
                    .flat_map(|&(id, count)| std::iter::repeat(id).take(count as usize))
                    .collect()
            })
            .collect();

        let mut ndk = vec![vec![0u32; k]; words.len()];
        let mut nkw = vec![vec![0u32; vocab_size]; k];
        let mut nk = vec![0u32; k];
        let mut z = Vec::with_capacity(words.len());

        for (d, doc) in words.iter().enumerate() {
            let mut assignments = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = rng.random_range(0..k);
                assignments.push(t);
                ndk[d][t] += 1;
                nkw[t][w] += 1;
                nk[t] += 1;
            }
            z.push(assignments);
        }

        Self {
            k,
            vocab_size,
            alpha,
            eta,
            words,
            z,
            ndk,
            nkw,
            nk,
            weights: vec![0.0; k],
            rng,
        }
    }

    fn total_tokens(&self) -> usize {
        self.words.iter().map(Vec::len).sum()
    }

    fn sweep(&mut self) {
        let v_eta = self.vocab_size as f64 * self.eta;

        for d in 0..self.words.len() {
            for pos in 0..self.words[d].len() {
                let w = self.words[d][pos];
                let old = self.z[d][pos];

                self.ndk[d][old] -= 1;
                self.nkw[old][w] -= 1;
                self.nk[old] -= 1;

                let mut total = 0.0;
                for t in 0..self.k {
                    let doc_part = self.ndk[d][t] as f64 + self.alpha;
                    let word_part =
                        (self.nkw[t][w] as f64 + self.eta) / (self.nk[t] as f64 + v_eta);
                    total += doc_part * word_part;
                    self.weights[t] = total;
                }

                let new = self.draw(total);

                self.z[d][pos] = new;
                self.ndk[d][new] += 1;
                self.nkw[new][w] += 1;
                self.nk[new] += 1;
            }
        }
    }

    /// Pick a topic from the cumulative weights in `self.weights`.
    fn draw(&mut self, total: f64) -> usize {
        if total <= f64::EPSILON || !total.is_finite() {
            return self.rng.random_range(0..self.k);
        }
        let u = self.rng.random::<f64>() * total;
        self.weights
            .iter()
            .position(|&cumulative| u < cumulative)
            .unwrap_or(self.k - 1)
    }

    fn into_model(self, corpus: &Corpus) -> LdaModel {
        let k = self.k;
        let k_alpha = k as f64 * self.alpha;
        let v_eta = self.vocab_size as f64 * self.eta;

        let theta = self
            .ndk
            .iter()
            .zip(&self.words)
            .map(|(counts, doc)| {
                let denom = doc.len() as f64 + k_alpha;
                counts
                    .iter()
                    .map(|&c| (c as f64 + self.alpha) / denom)
                    .collect()
            })
            .collect();

        let phi = self
            .nkw
            .iter()
            .zip(&self.nk)
            .map(|(counts, &total)| {
                let denom = total as f64 + v_eta;
                counts
                    .iter()
                    .map(|&c| (c as f64 + self.eta) / denom)
                    .collect()
            })
            .collect();

        LdaModel {
            vocabulary: corpus.dictionary.tokens().to_vec(),
            theta,
            phi,
            doc_lengths: self.words.iter().map(|d| d.len() as u64).collect(),
            alpha: self.alpha,
            eta: self.eta,
        }
    }
}

/// A fitted topic model.
#[derive(Debug, Clone)]
pub struct LdaModel {
    vocabulary: Vec<String>,
    /// [doc][topic]
    theta: Vec<Vec<f64>>,
    /// [topic][word]
    phi: Vec<Vec<f64>>,
    doc_lengths: Vec<u64>,
    pub alpha: f64,
    pub eta: f64,
}

impl LdaModel {
    pub fn num_topics(&self) -> usize {
        self.phi.len()
    }

    pub fn num_documents(&self) -> usize {
        self.theta.len()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Topic-word distributions, one row per topic.
    pub fn topic_word(&self) -> &[Vec<f64>] {
        &self.phi
    }

    /// Top `topn` words of a topic by probability, highest first.
    /// An unknown topic yields an empty list.
    pub fn show_topic(&self, topic: usize, topn: usize) -> Vec<(String, f64)> {
        let Some(row) = self.phi.get(topic) else {
            return Vec::new();
        };
        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(topn)
            .map(|(w, p)| (self.vocabulary[w].clone(), p))
            .collect()
    }

    /// Full topic distribution of a document (no probability cutoff).
    pub fn document_topics(&self, doc: usize) -> &[f64] {
        self.theta.get(doc).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All document-topic rows.
    pub fn document_topic_matrix(&self) -> &[Vec<f64>] {
        &self.theta
    }

    /// Most probable topic of a document; ties go to the lowest topic id.
    pub fn dominant_topic(&self, doc: usize) -> Option<(usize, f64)> {
        let row = self.theta.get(doc)?;
        row.iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (t, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((t, p)),
            })
    }

    /// Share of corpus tokens attributed to each topic. Sums to 1.
    pub fn topic_prevalence(&self) -> Vec<f64> {
        let mut mass = vec![0.0f64; self.num_topics()];
        for (row, &len) in self.theta.iter().zip(&self.doc_lengths) {
            for (t, p) in row.iter().enumerate() {
                mass[t] += p * len as f64;
            }
        }
        let total: f64 = mass.iter().sum();
        if total > 0.0 {
            for m in &mut mass {
                *m /= total;
            }
        }
        mass
    }
}
