//! Differencing and integration of series

use crate::{MathError, Result};

/// Apply `order` rounds of first differencing.
///
/// Each round shortens the series by one value.
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut current = values.to_vec();
    for _ in 0..order {
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    current
}

/// Turns values on the differenced scale back into levels.
///
/// Holds the most recent value of every differencing level, from the raw
/// series (index 0) up to the series differenced `order - 1` times.
#[derive(Debug, Clone)]
pub struct Integrator {
    tails: Vec<f64>,
}

impl Integrator {
    /// Create an integrator positioned after the last observation
    pub fn from_series(values: &[f64], order: usize) -> Result<Self> {
        if values.len() <= order {
            return Err(MathError::InsufficientData(format!(
                "Differencing of order {} needs more than {} observations, got {}",
                order,
                order,
                values.len()
            )));
        }

        let mut tails = Vec::with_capacity(order);
        let mut current = values.to_vec();
        for _ in 0..order {
            // Non-empty: length stays above zero while the loop runs
            tails.push(current[current.len() - 1]);
            current = difference(&current, 1);
        }

        Ok(Self { tails })
    }

    /// Differencing order this integrator undoes
    pub fn order(&self) -> usize {
        self.tails.len()
    }

    /// Feed the next value of the fully differenced series and get the next level
    pub fn integrate(&mut self, next: f64) -> f64 {
        let mut value = next;
        for tail in self.tails.iter_mut().rev() {
            value += *tail;
            *tail = value;
        }
        value
    }
}
