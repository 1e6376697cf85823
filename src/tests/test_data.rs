//! Small deterministic datasets shared by the test modules.

/// `n` points on the x axis at x = 0, 1, ..., n-1.
pub fn line_2d(n: usize) -> Vec<Vec<f64>> {
    (0..n).map(|i| vec![i as f64, 0.0]).collect()
}

/// Two well separated Gaussian-ish blobs built from trig offsets.
pub fn two_blobs(per_blob: usize) -> Vec<Vec<f64>> {
    let mut rows = Vec::with_capacity(per_blob * 2);
    for i in 0..per_blob {
        let t = i as f64;
        rows.push(vec![0.3 * t.sin(), 0.3 * t.cos(), 0.1 * (t / 3.0).sin()]);
    }
    for i in 0..per_blob {
        let t = i as f64;
        rows.push(vec![
            10.0 + 0.3 * t.cos(),
            10.0 + 0.3 * t.sin(),
            0.1 * (t / 2.0).cos(),
        ]);
    }
    rows
}

/// Distinct points spread over a spiral.
pub fn spiral(n: usize, n_features: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.37;
            (0..n_features)
                .map(|j| (t + j as f64).sin() * (1.0 + t) + j as f64 * 0.01 * t)
                .collect()
        })
        .collect()
}
