pub fn l2_norm(v: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for x in v {
        sum += x * x;
    }
    sum.sqrt()
}

const UNIT_TOLERANCE: f32 = 1e-6;

/// Scale `v` to unit length. `None` for zero or non-finite norms.
pub fn normalize(v: &[f32]) -> Option<Vec<f32>> {
    let norm = l2_norm(v);
    if !norm.is_finite() || norm == 0.0 {
        return None;
    }
    if (norm - 1.0).abs() <= UNIT_TOLERANCE {
        return Some(v.to_vec());
    }
    Some(v.iter().map(|x| x / norm).collect())
}

/// Squared Euclidean distance. For unit vectors this equals `2 - 2cos(theta)`.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        let d = x - y;
        sum += d * d;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_scales_to_unit_length() {
        let v = normalize(&[3.0, 4.0]).expect("non-zero");
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_rejects_zero_and_nan() {
        assert!(normalize(&[0.0, 0.0]).is_none());
        assert!(normalize(&[f32::NAN, 1.0]).is_none());
    }

    #[test]
    fn squared_distance_matches_cosine_identity() {
        let a = normalize(&[1.0, 0.0]).expect("a");
        let b = normalize(&[1.0, 1.0]).expect("b");
        let cos: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        assert!((squared_l2(&a, &b) - (2.0 - 2.0 * cos)).abs() < 1e-6);
        assert_eq!(squared_l2(&a, &a), 0.0);
    }
}
