//! ARIMA estimation and prediction
//!
//! Contains:
//! - Hannan-Rissanen start values from two least-squares regressions
//! - Conditional sum of squares (CSS) fitting with Levenberg-Marquardt
//! - One-step in-sample predictions and recursive out-of-sample forecasts

use std::fmt;

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt, TerminationReason};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector, Dyn, Owned};
use serde::{Deserialize, Serialize};

use crate::differencing::{difference, Integrator};
use crate::transform::{
    constrain_invertible, constrain_stationary, unconstrain_invertible, unconstrain_stationary,
};
use crate::{MathError, Result};

/// Relative step for central-difference Jacobians
const JACOBIAN_STEP: f64 = 1e-6;

/// Singular values below this (relative) are dropped in least squares solves
const SVD_EPS: f64 = 1e-12;

/// Model order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Number of observations needed before a fit is attempted.
    ///
    /// After differencing and dropping the first `p` conditioning values,
    /// the innovations must outnumber the `p + q` coefficients.
    pub fn min_observations(&self) -> usize {
        self.d + 2 * self.p + self.q + 1
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Fits ARIMA models by conditional sum of squares
#[derive(Debug, Clone)]
pub struct ArimaEstimator {
    order: ArimaOrder,
    patience: usize,
}

impl ArimaEstimator {
    /// Create an estimator for the given order
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            order,
            patience: 200,
        }
    }

    /// Change the optimiser's evaluation budget (multiplied by parameter count + 1)
    pub fn with_patience(mut self, patience: usize) -> Result<Self> {
        if patience == 0 {
            return Err(MathError::InvalidInput(
                "Patience must be at least 1".to_string(),
            ));
        }
        self.patience = patience;
        Ok(self)
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Fit the model to the full series
    pub fn fit(&self, observations: &[f64]) -> Result<ArimaFit> {
        let ArimaOrder { p, d, q } = self.order;

        if let Some(bad) = observations.iter().position(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Observation {} is not a finite number",
                bad
            )));
        }
        if observations.len() < self.order.min_observations() {
            return Err(MathError::InsufficientData(format!(
                "Insufficient data for {}. Need at least {} observations, got {}.",
                self.order,
                self.order.min_observations(),
                observations.len()
            )));
        }

        let differenced = difference(observations, d);

        let (ar, ma) = if p + q == 0 {
            (Vec::new(), Vec::new())
        } else {
            let start = match hannan_rissanen(&differenced, p, q) {
                Some((ar0, ma0)) => {
                    match (unconstrain_stationary(&ar0), unconstrain_invertible(&ma0)) {
                        (Some(mut x), Some(y)) => {
                            debug!("{} start values from Hannan-Rissanen", self.order);
                            x.extend(y);
                            x
                        }
                        _ => {
                            debug!(
                                "{} Hannan-Rissanen start is not stationary/invertible; starting from zero",
                                self.order
                            );
                            vec![0.0; p + q]
                        }
                    }
                }
                None => {
                    debug!("{} has too little data for Hannan-Rissanen", self.order);
                    vec![0.0; p + q]
                }
            };

            let problem = CssProblem {
                differenced: differenced.clone(),
                p,
                q,
                params: DVector::from_vec(start),
            };

            let (problem, report) = LevenbergMarquardt::new()
                .with_patience(self.patience)
                .minimize(problem);

            debug!(
                "{} optimiser finished after {} evaluations: {:?}",
                self.order, report.number_of_evaluations, report.termination
            );

            if !report.termination.was_successful() {
                match report.termination {
                    TerminationReason::NoImprovementPossible(reason) => {
                        warn!(
                            "{} stopped early ({}); keeping the best parameters found",
                            self.order, reason
                        );
                    }
                    TerminationReason::LostPatience => {
                        warn!(
                            "{} hit the evaluation limit before converging; keeping the best parameters found",
                            self.order
                        );
                    }
                    other => {
                        return Err(MathError::CalculationError(format!(
                            "{} failed to converge: {:?}",
                            self.order, other
                        )));
                    }
                }
            }
            if !report.objective_function.is_finite() {
                return Err(MathError::CalculationError(format!(
                    "{} produced a non-finite objective",
                    self.order
                )));
            }

            unpack(problem.params.as_slice(), p)
        };

        let innovations = innovations(&differenced, &ar, &ma);
        let effective = differenced.len() - p;
        let ssr: f64 = innovations[p..].iter().map(|e| e * e).sum();
        let sigma2 = ssr / effective as f64;
        let log_likelihood =
            -(effective as f64) / 2.0 * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0);

        let standard_errors = coefficient_standard_errors(&differenced, &ar, &ma, sigma2);

        Ok(ArimaFit {
            order: self.order,
            observations: observations.to_vec(),
            differenced,
            ar,
            ma,
            innovations,
            sigma2,
            log_likelihood,
            standard_errors,
        })
    }
}

/// A fitted ARIMA model. Read-only once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ArimaFit {
    order: ArimaOrder,
    observations: Vec<f64>,
    differenced: Vec<f64>,
    ar: Vec<f64>,
    ma: Vec<f64>,
    innovations: Vec<f64>,
    sigma2: f64,
    log_likelihood: f64,
    standard_errors: Vec<f64>,
}

impl ArimaFit {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Number of observations the model was fitted on
    pub fn nobs(&self) -> usize {
        self.observations.len()
    }

    /// Number of innovations entering the likelihood
    pub fn effective_nobs(&self) -> usize {
        self.differenced.len() - self.order.p
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Standard errors of the AR then MA coefficients. NaN when the
    /// information matrix is singular.
    pub fn standard_errors(&self) -> &[f64] {
        &self.standard_errors
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Estimated parameters including the innovation variance
    pub fn parameter_count(&self) -> usize {
        self.order.p + self.order.q + 1
    }

    /// Akaike Information Criterion
    pub fn aic(&self) -> f64 {
        2.0 * self.parameter_count() as f64 - 2.0 * self.log_likelihood
    }

    /// Bayesian Information Criterion
    pub fn bic(&self) -> f64 {
        self.parameter_count() as f64 * (self.effective_nobs() as f64).ln()
            - 2.0 * self.log_likelihood
    }

    /// One-step-ahead prediction for an in-sample offset
    pub fn fitted_value(&self, offset: usize) -> Result<f64> {
        let observed = *self.observations.get(offset).ok_or_else(|| {
            MathError::InvalidInput(format!(
                "Offset {} is outside the {} fitted observations",
                offset,
                self.observations.len()
            ))
        })?;

        if offset < self.order.d {
            return Ok(observed);
        }
        Ok(observed - self.innovations[offset - self.order.d])
    }

    /// Forecast `horizon` values past the last observation
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let mut integrator = Integrator::from_series(&self.observations, self.order.d)?;
        let mut history = self.differenced.clone();
        let mut shocks = self.innovations.clone();
        let mut forecasts = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let t = history.len();
            let mut next = 0.0;
            for (i, phi) in self.ar.iter().enumerate() {
                if t > i {
                    next += phi * history[t - 1 - i];
                }
            }
            for (j, theta) in self.ma.iter().enumerate() {
                if t > j {
                    next += theta * shocks[t - 1 - j];
                }
            }

            history.push(next);
            shocks.push(0.0);
            forecasts.push(integrator.integrate(next));
        }

        Ok(forecasts)
    }

    /// Point predictions for every offset in `[start, end]`.
    ///
    /// Offsets inside the sample give one-step-ahead predictions, later
    /// offsets give the recursive forecast.
    pub fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        if start > end {
            return Err(MathError::InvalidInput(format!(
                "Prediction start {} is after end {}",
                start, end
            )));
        }

        let n = self.observations.len();
        let mut predictions = Vec::with_capacity(end - start + 1);

        for offset in start..=end.min(n - 1) {
            predictions.push(self.fitted_value(offset)?);
        }
        if end >= n {
            let forecasts = self.forecast(end - n + 1)?;
            predictions.extend(forecasts.into_iter().skip(start.saturating_sub(n)));
        }

        Ok(predictions)
    }
}

/// Split an unconstrained parameter vector into AR and MA coefficients
fn unpack(params: &[f64], p: usize) -> (Vec<f64>, Vec<f64>) {
    let (ar, ma) = params.split_at(p);
    (constrain_stationary(ar), constrain_invertible(ma))
}

/// Conditional innovations of an ARMA process.
///
/// The first `p` values are conditioned on and get a zero innovation.
fn innovations(w: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut e = vec![0.0; w.len()];

    for t in p..w.len() {
        let mut predicted = 0.0;
        for (i, phi) in ar.iter().enumerate() {
            predicted += phi * w[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                predicted += theta * e[t - 1 - j];
            }
        }
        e[t] = w[t] - predicted;
    }

    e
}

struct CssProblem {
    differenced: Vec<f64>,
    p: usize,
    q: usize,
    params: DVector<f64>,
}

impl CssProblem {
    fn residuals_at(&self, params: &DVector<f64>) -> DVector<f64> {
        let (ar, ma) = unpack(params.as_slice(), self.p);
        debug_assert_eq!(ma.len(), self.q);
        let e = innovations(&self.differenced, &ar, &ma);
        DVector::from_column_slice(&e[self.p..])
    }
}

impl LeastSquaresProblem<f64, Dyn, Dyn> for CssProblem {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, x: &DVector<f64>) {
        self.params.copy_from(x);
    }

    fn params(&self) -> DVector<f64> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        let r = self.residuals_at(&self.params);
        if r.iter().all(|v| v.is_finite()) {
            Some(r)
        } else {
            None
        }
    }

    fn jacobian(&self) -> Option<DMatrix<f64>> {
        numerical_jacobian(|x| self.residuals_at(x), &self.params)
    }
}

/// Central-difference Jacobian of `f` at `x`
fn numerical_jacobian<F>(f: F, x: &DVector<f64>) -> Option<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let rows = f(x).len();
    let mut jacobian = DMatrix::zeros(rows, x.len());

    for j in 0..x.len() {
        let h = JACOBIAN_STEP * x[j].abs().max(1.0);
        let mut forward = x.clone();
        forward[j] += h;
        let mut backward = x.clone();
        backward[j] -= h;

        let column = (f(&forward) - f(&backward)) / (2.0 * h);
        jacobian.set_column(j, &column);
    }

    if jacobian.iter().all(|v| v.is_finite()) {
        Some(jacobian)
    } else {
        None
    }
}

/// Standard errors from `sigma2 * (J'J)^-1`, with J taken with respect to
/// the AR and MA coefficients themselves
fn coefficient_standard_errors(w: &[f64], ar: &[f64], ma: &[f64], sigma2: f64) -> Vec<f64> {
    let p = ar.len();
    let k = p + ma.len();
    if k == 0 {
        return Vec::new();
    }

    let mut coefficients = ar.to_vec();
    coefficients.extend_from_slice(ma);
    let point = DVector::from_vec(coefficients);

    let residuals = |x: &DVector<f64>| {
        let (phi, theta) = x.as_slice().split_at(p);
        DVector::from_column_slice(&innovations(w, phi, theta)[p..])
    };

    let covariance = numerical_jacobian(residuals, &point)
        .and_then(|j| (j.transpose() * &j).try_inverse())
        .map(|inverse| inverse * sigma2);

    match covariance {
        Some(cov) => (0..k)
            .map(|i| {
                let variance = cov[(i, i)];
                if variance >= 0.0 {
                    variance.sqrt()
                } else {
                    f64::NAN
                }
            })
            .collect(),
        None => vec![f64::NAN; k],
    }
}

/// Ordinary least squares through an SVD
fn least_squares(design: DMatrix<f64>, target: DVector<f64>) -> Option<DVector<f64>> {
    design.svd(true, true).solve(&target, SVD_EPS).ok()
}

/// Hannan-Rissanen start values for ARMA(p, q) on a differenced series.
///
/// Stage one fits a long autoregression to estimate the innovations; stage
/// two regresses the series on its own lags and lagged innovations.
fn hannan_rissanen(w: &[f64], p: usize, q: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    let n = w.len();

    let shocks = if q == 0 {
        vec![0.0; n]
    } else {
        let long = (2 * (p + q)).min(n.saturating_sub(1) / 3);
        if long < p.max(q) || long == 0 {
            return None;
        }
        let rows = n - long;
        let design = DMatrix::from_fn(rows, long, |i, j| w[long + i - 1 - j]);
        let target = DVector::from_fn(rows, |i, _| w[long + i]);
        let beta = least_squares(design, target)?;

        let mut shocks = vec![0.0; n];
        for t in long..n {
            let fitted: f64 = (0..long).map(|j| beta[j] * w[t - 1 - j]).sum();
            shocks[t] = w[t] - fitted;
        }
        shocks
    };

    let first = if q == 0 {
        p
    } else {
        (2 * (p + q)).min(n.saturating_sub(1) / 3) + q
    };
    let first = first.max(p);
    if n <= first || n - first <= p + q {
        return None;
    }

    let rows = n - first;
    let design = DMatrix::from_fn(rows, p + q, |i, j| {
        let t = first + i;
        if j < p {
            w[t - 1 - j]
        } else {
            shocks[t - 1 - (j - p)]
        }
    });
    let target = DVector::from_fn(rows, |i, _| w[first + i]);
    let beta = least_squares(design, target)?;

    let (ar, ma) = beta.as_slice().split_at(p);
    Some((ar.to_vec(), ma.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    /// AR(1) with coefficient `phi`, integrated `d` times
    fn simulate(phi: f64, d: usize, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 1.0).unwrap();

        let mut w = Vec::with_capacity(n);
        let mut prev = 0.0;
        for _ in 0..n {
            prev = phi * prev + noise.sample(&mut rng);
            w.push(prev);
        }

        let mut series = w;
        for _ in 0..d {
            let mut level = 100.0;
            series = series
                .into_iter()
                .map(|v| {
                    level += v;
                    level
                })
                .collect();
        }
        series
    }

    #[test]
    fn test_order_display_and_minimum() {
        let order = ArimaOrder::new(13, 3, 3);
        assert_eq!(order.to_string(), "ARIMA(13,3,3)");
        assert_eq!(order.min_observations(), 33);
    }

    #[test]
    fn test_insufficient_data() {
        let estimator = ArimaEstimator::new(ArimaOrder::new(13, 3, 3));
        let result = estimator.fit(&[1.0; 20]);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let estimator = ArimaEstimator::new(ArimaOrder::new(1, 0, 0));
        let result = estimator.fit(&[1.0, f64::NAN, 2.0, 3.0, 4.0]);
        assert!(matches!(result, Err(MathError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_patience_rejected() {
        let estimator = ArimaEstimator::new(ArimaOrder::new(1, 0, 0));
        assert!(estimator.with_patience(0).is_err());
    }

    #[test]
    fn test_recovers_ar_coefficient() {
        let data = simulate(0.6, 0, 400, 7);
        let fit = ArimaEstimator::new(ArimaOrder::new(1, 0, 0))
            .fit(&data)
            .unwrap();

        let phi = fit.ar_coefficients()[0];
        assert!((phi - 0.6).abs() < 0.1, "phi = {}", phi);
        assert!((fit.sigma2() - 1.0).abs() < 0.25);
        assert!(fit.standard_errors()[0] > 0.0 && fit.standard_errors()[0] < 0.1);
        assert!(fit.aic() < fit.bic());
    }

    #[test]
    fn test_coefficients_stay_stationary_and_invertible() {
        let data = simulate(0.5, 1, 150, 11);
        let fit = ArimaEstimator::new(ArimaOrder::new(3, 1, 2))
            .fit(&data)
            .unwrap();

        assert!(crate::transform::is_stationary(fit.ar_coefficients()));
        assert!(unconstrain_invertible(fit.ma_coefficients()).is_some());
    }

    #[test]
    fn test_random_walk_forecast_is_flat() {
        // ARIMA(0,1,0): the forecast repeats the last observation
        let data = [10.0, 12.0, 11.0, 15.0, 14.0];
        let fit = ArimaEstimator::new(ArimaOrder::new(0, 1, 0))
            .fit(&data)
            .unwrap();

        assert_eq!(fit.forecast(3).unwrap(), vec![14.0, 14.0, 14.0]);
        // One step ahead in sample is the previous value
        assert_relative_eq!(fit.fitted_value(3).unwrap(), 11.0);
        assert_relative_eq!(fit.fitted_value(0).unwrap(), 10.0);
    }

    #[test]
    fn test_double_difference_extends_line() {
        // ARIMA(0,2,0) continues the last slope
        let data = [1.0, 3.0, 5.0, 7.0, 9.0];
        let fit = ArimaEstimator::new(ArimaOrder::new(0, 2, 0))
            .fit(&data)
            .unwrap();

        let forecast = fit.forecast(2).unwrap();
        assert_relative_eq!(forecast[0], 11.0);
        assert_relative_eq!(forecast[1], 13.0);
    }

    #[test]
    fn test_predict_spans_sample_boundary() {
        let data = simulate(0.4, 1, 60, 3);
        let fit = ArimaEstimator::new(ArimaOrder::new(2, 1, 1))
            .fit(&data)
            .unwrap();

        let predictions = fit.predict(50, 70).unwrap();
        assert_eq!(predictions.len(), 21);

        let forecast = fit.forecast(11).unwrap();
        assert_eq!(&predictions[10..], &forecast[..]);
        assert_eq!(predictions[0], fit.fitted_value(50).unwrap());

        // Entirely past the sample
        let future = fit.predict(65, 70).unwrap();
        assert_eq!(future.len(), 6);
        assert_eq!(&future[..], &forecast[5..]);
    }

    #[test]
    fn test_predict_rejects_reversed_range() {
        let data = simulate(0.4, 0, 30, 5);
        let fit = ArimaEstimator::new(ArimaOrder::new(1, 0, 0))
            .fit(&data)
            .unwrap();
        assert!(fit.predict(10, 5).is_err());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = simulate(0.3, 3, 120, 21);
        let estimator = ArimaEstimator::new(ArimaOrder::new(13, 3, 3));

        let first = estimator.fit(&data).unwrap();
        let second = estimator.fit(&data).unwrap();
        assert_eq!(first.predict(100, 158).unwrap(), second.predict(100, 158).unwrap());
        assert_eq!(first.aic(), second.aic());
    }
}
