//! Vector math shared by every scorer.

/// Euclidean (L2) magnitude.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// In-place L2 normalization helper to keep allocations down during hot paths.
/// Zero vectors are left untouched.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns `0.0` when either vector has zero magnitude, when the inputs differ
/// in length, or when the arithmetic produces NaN. The result is clamped to
/// `[-1, 1]` so rounding never pushes it outside the mathematical range.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    // Accumulate in f64; f32 sums drift enough on 1024-d vectors to matter at
    // the 0.5/0.6 decision thresholds.
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
    if sim.is_nan() {
        return 0.0;
    }
    sim.clamp(-1.0, 1.0) as f32
}
