//! Parameter transforms keeping ARMA polynomials stationary
//!
//! Optimisers search over an unbounded vector. Each element is squashed into
//! a partial autocorrelation in (-1, 1) and the Durbin-Levinson recursion
//! turns those into lag coefficients whose polynomial `1 - sum(phi_i L^i)`
//! has all roots outside the unit circle (Monahan 1984, Jones 1980).

/// Map unconstrained values to stationary autoregressive coefficients
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let n = unconstrained.len();
    let partials: Vec<f64> = unconstrained
        .iter()
        .map(|x| x / (1.0 + x * x).sqrt())
        .collect();

    let mut previous = vec![0.0; n];
    let mut current = vec![0.0; n];
    for k in 0..n {
        for i in 0..k {
            current[i] = previous[i] + partials[k] * previous[k - i - 1];
        }
        current[k] = partials[k];
        previous[..=k].copy_from_slice(&current[..=k]);
    }

    previous.into_iter().map(|v| -v).collect()
}

/// Inverse of [`constrain_stationary`].
///
/// Returns `None` when the coefficients do not describe a stationary
/// polynomial (a partial autocorrelation at or beyond unit magnitude).
pub fn unconstrain_stationary(constrained: &[f64]) -> Option<Vec<f64>> {
    let n = constrained.len();
    let mut partials = vec![0.0; n];
    let mut row: Vec<f64> = constrained.iter().map(|v| -v).collect();

    for k in (0..n).rev() {
        let rk = row[k];
        if rk.is_nan() || rk.abs() >= 1.0 {
            return None;
        }
        partials[k] = rk;

        let denom = 1.0 - rk * rk;
        row = (0..k)
            .map(|i| (row[i] - rk * row[k - i - 1]) / denom)
            .collect();
    }

    Some(
        partials
            .into_iter()
            .map(|r| r / (1.0 - r * r).sqrt())
            .collect(),
    )
}

/// Map unconstrained values to invertible moving-average coefficients
/// for the polynomial `1 + sum(theta_j L^j)`.
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|v| -v)
        .collect()
}

/// Inverse of [`constrain_invertible`]
pub fn unconstrain_invertible(constrained: &[f64]) -> Option<Vec<f64>> {
    let flipped: Vec<f64> = constrained.iter().map(|v| -v).collect();
    unconstrain_stationary(&flipped)
}

/// Whether `1 - sum(phi_i L^i)` is stationary
pub fn is_stationary(coefficients: &[f64]) -> bool {
    unconstrain_stationary(coefficients).is_some()
}
