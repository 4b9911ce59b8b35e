//! Normalization of sampling weights.

use rollbatch_core::TreeError;

/// Scale weights so they sum to one.
///
/// The sum is accumulated in `f64` before dividing, so weights that are
/// individually tiny still normalize to a total within rounding of 1.
/// Signs are not checked: a negative weight stays negative as long as the
/// total is positive.
///
/// # Errors
///
/// [`TreeError::InvalidConfig`] if `weights` is empty or the sum is not a
/// finite positive number.
///
/// # Examples
///
/// ```
/// use rollbatch_ops::normalize_probs;
///
/// let p = normalize_probs(&[1.0, 1.0, 2.0]).unwrap();
/// assert_eq!(p, vec![0.25, 0.25, 0.5]);
/// ```
pub fn normalize_probs(weights: &[f64]) -> Result<Vec<f64>, TreeError> {
    if weights.is_empty() {
        return Err(TreeError::InvalidConfig {
            reason: "cannot normalize an empty weight list".into(),
        });
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(TreeError::InvalidConfig {
            reason: format!("weights sum to {total}, expected a finite positive total"),
        });
    }
    Ok(weights.iter().map(|w| w / total).collect())
}
