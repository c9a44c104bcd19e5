//! Vector Similarity Functions
//!
//! Dot products and normalization over `f32` slices.

/// Compute dot product of two vectors
///
/// Uses unrolled loop for better CPU performance.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let len = a.len().min(b.len());
    let mut sum = 0.0f32;

    // Process 4 elements at a time (manual unrolling)
    let chunks = len / 4;
    let remainder = len % 4;

    for i in 0..chunks {
        let idx = i * 4;
        sum += a[idx] * b[idx];
        sum += a[idx + 1] * b[idx + 1];
        sum += a[idx + 2] * b[idx + 2];
        sum += a[idx + 3] * b[idx + 3];
    }

    // Handle remainder
    for i in (len - remainder)..len {
        sum += a[i] * b[i];
    }

    sum
}

/// Euclidean length of a vector
#[inline]
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize a vector in place.
///
/// A zero vector is left as-is.
pub fn normalize_vector(v: &mut [f32]) {
    let mag = magnitude(v);
    if mag > 0.0 {
        for x in v.iter_mut() {
            *x /= mag;
        }
    }
}

/// Similarity of two unit vectors as `|a · b|`, clamped to `[0, 1]`.
///
/// The absolute value keeps the score non-negative even for embedders that
/// emit negative components; opposite directions count as related.
#[inline]
pub fn abs_similarity(a: &[f32], b: &[f32]) -> f32 {
    dot_product(a, b).abs().min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        assert!((dot_product(&a, &b) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_unrolled_remainder() {
        let a: Vec<f32> = (1..=7).map(|x| x as f32).collect();
        let b = vec![1.0f32; 7];
        assert!((dot_product(&a, &b) - 28.0).abs() < 1e-6);
    }

    #[test]
    fn test_abs_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((abs_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_abs_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(abs_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_abs_similarity_clamped() {
        let a = vec![1.0000001f32, 0.0];
        assert!(abs_similarity(&a, &a) <= 1.0);
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0, 0.0];
        normalize_vector(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert!(v[2].abs() < 1e-6);
        assert!((magnitude(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let mut v = vec![0.0f32; 4];
        normalize_vector(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
