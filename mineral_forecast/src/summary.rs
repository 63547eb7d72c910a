//! Printable diagnostics for fitted ARIMA models

use forecast_math::ArimaFit;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

/// One row of the coefficient table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterEstimate {
    pub name: String,
    pub coef: f64,
    pub std_err: f64,
    pub z: f64,
    pub p_value: f64,
    /// Lower end of the 95% interval
    pub lower: f64,
    /// Upper end of the 95% interval
    pub upper: f64,
}

/// Fit statistics and coefficient estimates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub model: String,
    pub nobs: usize,
    pub effective_nobs: usize,
    pub sample_start: i32,
    pub sample_end: i32,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub parameters: Vec<ParameterEstimate>,
}

impl FitSummary {
    /// Build the summary for a fit whose first observation is `base_year`
    pub fn from_fit(fit: &ArimaFit, base_year: i32, last_year: i32) -> Self {
        let order = fit.order();
        let names = (1..=order.p)
            .map(|i| format!("ar.L{}", i))
            .chain((1..=order.q).map(|j| format!("ma.L{}", j)));
        let coefficients = fit
            .ar_coefficients()
            .iter()
            .chain(fit.ma_coefficients().iter())
            .copied();

        let mut parameters: Vec<ParameterEstimate> = names
            .zip(coefficients)
            .zip(fit.standard_errors().iter().copied())
            .map(|((name, coef), std_err)| estimate(name, coef, std_err))
            .collect();

        // Asymptotic standard error of a Gaussian variance estimate
        let sigma2 = fit.sigma2();
        let sigma2_se = (2.0 * sigma2 * sigma2 / fit.effective_nobs() as f64).sqrt();
        parameters.push(estimate("sigma2".to_string(), sigma2, sigma2_se));

        Self {
            model: order.to_string(),
            nobs: fit.nobs(),
            effective_nobs: fit.effective_nobs(),
            sample_start: base_year,
            sample_end: last_year,
            log_likelihood: fit.log_likelihood(),
            aic: fit.aic(),
            bic: fit.bic(),
            parameters,
        }
    }

    /// Parameter names and estimates, one per line
    pub fn parameter_listing(&self) -> String {
        self.parameters
            .iter()
            .map(|p| format!("{:<8} {:>14.6}", p.name, p.coef))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn estimate(name: String, coef: f64, std_err: f64) -> ParameterEstimate {
    let z = coef / std_err;
    let (p_value, lower, upper) = match Normal::new(0.0, 1.0) {
        Ok(normal) if std_err.is_finite() => {
            let critical = normal.inverse_cdf(0.975);
            (
                2.0 * (1.0 - normal.cdf(z.abs())),
                coef - critical * std_err,
                coef + critical * std_err,
            )
        }
        _ => (f64::NAN, f64::NAN, f64::NAN),
    };

    ParameterEstimate {
        name,
        coef,
        std_err,
        z,
        p_value,
        lower,
        upper,
    }
}

impl fmt::Display for FitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(78);
        let thin = "-".repeat(78);

        writeln!(f, "{:^78}", "ARIMA Results")?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Model:            {:<20} No. Observations: {:>14}",
            self.model, self.nobs
        )?;
        writeln!(
            f,
            "Sample:           {:<20} Log Likelihood:   {:>14.3}",
            format!("{} - {}", self.sample_start, self.sample_end),
            self.log_likelihood
        )?;
        writeln!(
            f,
            "Method:           {:<20} AIC:              {:>14.3}",
            "css", self.aic
        )?;
        writeln!(
            f,
            "Innovations:      {:<20} BIC:              {:>14.3}",
            self.effective_nobs, self.bic
        )?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "{:<8} {:>12} {:>12} {:>9} {:>8} {:>12} {:>12}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]"
        )?;
        writeln!(f, "{}", thin)?;
        for p in &self.parameters {
            writeln!(
                f,
                "{:<8} {:>12.4} {:>12.4} {:>9.3} {:>8.3} {:>12.4} {:>12.4}",
                p.name, p.coef, p.std_err, p.z, p.p_value, p.lower, p.upper
            )?;
        }
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_estimate_interval() {
        let row = estimate("ar.L1".to_string(), 0.5, 0.1);
        assert_relative_eq!(row.z, 5.0);
        assert!(row.p_value < 1e-5);
        assert_relative_eq!(row.lower, 0.5 - 0.195_996_4, epsilon = 1e-6);
        assert_relative_eq!(row.upper, 0.5 + 0.195_996_4, epsilon = 1e-6);
    }

    #[test]
    fn test_estimate_without_standard_error() {
        let row = estimate("ma.L1".to_string(), 0.2, f64::NAN);
        assert!(row.p_value.is_nan());
        assert!(row.lower.is_nan());
    }
}
