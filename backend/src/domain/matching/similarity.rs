//! Cosine similarity over integer preference vectors.

use super::ScoreContractError;

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Returns exactly `0.0` when either vector has zero magnitude. Unequal
/// lengths are a contract violation and are reported rather than truncated.
/// Accumulation is sequential in `f64`, so identical inputs always yield
/// bit-identical output.
///
/// # Examples
/// ```
/// use matchmaking::domain::matching::cosine_similarity;
///
/// assert_eq!(cosine_similarity(&[1, 1, 0, 0], &[1, 1, 0, 0]).ok(), Some(1.0));
/// assert_eq!(cosine_similarity(&[1, 1, 0, 0], &[0, 0, 1, 1]).ok(), Some(0.0));
/// assert!(cosine_similarity(&[1, 2], &[1, 2, 3]).is_err());
/// ```
pub fn cosine_similarity(a: &[i32], b: &[i32]) -> Result<f64, ScoreContractError> {
    if a.len() != b.len() {
        return Err(ScoreContractError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (dot, norm_a, norm_b) =
        a.iter()
            .zip(b)
            .fold((0.0_f64, 0.0_f64, 0.0_f64), |(dot, na, nb), (&x, &y)| {
                let (x, y) = (f64::from(x), f64::from(y));
                (dot + x * y, na + x * x, nb + y * y)
            });

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
