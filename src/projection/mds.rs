// Classical multidimensional scaling and the Jensen-Shannon distance used to
// lay out topics relative to each other.

/// Jensen-Shannon divergence between two discrete distributions (natural log).
pub fn jensen_shannon(p: &[f64], q: &[f64]) -> f64 {
    let mut divergence = 0.0;
    for (&a, &b) in p.iter().zip(q) {
        let m = 0.5 * (a + b);
        if a > 0.0 {
            divergence += 0.5 * a * (a / m).ln();
        }
        if b > 0.0 {
            divergence += 0.5 * b * (b / m).ln();
        }
    }
    divergence.max(0.0)
}

/// Embed points into 2-D from a symmetric distance matrix.
///
/// Double-centres the squared distances and takes the two leading
/// eigenvectors by power iteration with deflation. Axes with negative
/// eigenvalues (non-Euclidean input) are skipped; missing axes stay zero.
pub fn classical_mds(distances: &[Vec<f64>]) -> Vec<[f64; 2]> {
    let n = distances.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![[0.0, 0.0]],
        _ => {}
    }

    // B = -1/2 · J D² J
    let sq: Vec<Vec<f64>> = distances
        .iter()
        .map(|row| row.iter().map(|d| d * d).collect())
        .collect();
    let row_means: Vec<f64> = sq.iter().map(|r| r.iter().sum::<f64>() / n as f64).collect();
    let grand_mean = row_means.iter().sum::<f64>() / n as f64;
    let mut b = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            b[i][j] = -0.5 * (sq[i][j] - row_means[i] - row_means[j] + grand_mean);
        }
    }

    let mut coords = vec![[0.0f64; 2]; n];
    let mut axis = 0;
    let mut first_lambda = 0.0f64;
    for attempt in 0..n {
        if axis == 2 {
            break;
        }
        let (lambda, v) = leading_eigenpair(&b, attempt);
        if lambda.abs() < 1e-15 {
            break;
        }
        // Deflate so the next pass finds the following eigenpair.
        for i in 0..n {
            for j in 0..n {
                b[i][j] -= lambda * v[i] * v[j];
            }
        }
        if first_lambda == 0.0 && lambda > 0.0 {
            first_lambda = lambda;
        }
        if lambda <= 1e-9 * first_lambda.max(1.0) {
            continue;
        }
        let scale = lambda.sqrt();
        for i in 0..n {
            coords[i][axis] = v[i] * scale;
        }
        axis += 1;
    }
    coords
}

fn leading_eigenpair(m: &[Vec<f64>], salt: usize) -> (f64, Vec<f64>) {
    let n = m.len();
    // Deterministic, non-degenerate start vector.
    let mut v: Vec<f64> = (0..n)
        .map(|i| 1.0 + ((i + salt * 7) % 5) as f64 * 0.1)
        .collect();
    normalize(&mut v);

    for _ in 0..500 {
        let mut next = vec![0.0f64; n];
        for i in 0..n {
            next[i] = m[i].iter().zip(&v).map(|(a, b)| a * b).sum();
        }
        let norm = normalize(&mut next);
        if norm < 1e-15 {
            return (0.0, v);
        }
        let delta: f64 = next.iter().zip(&v).map(|(a, b)| (a - b).abs()).sum();
        v = next;
        if delta < 1e-10 {
            break;
        }
    }

    // Rayleigh quotient keeps the sign (power iteration norm does not).
    let mv: Vec<f64> = m
        .iter()
        .map(|row| row.iter().zip(&v).map(|(a, b)| a * b).sum())
        .collect();
    let rayleigh: f64 = mv.iter().zip(&v).map(|(a, b)| a * b).sum();
    (rayleigh, v)
}

fn normalize(v: &mut [f64]) -> f64 {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 1e-15 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    norm
}
