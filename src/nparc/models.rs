//! Dose-response models compared by NPARC
//!
//! The null model ignores concentration entirely; the alternative is a
//! four-parameter log-logistic curve
//!
//! ```text
//! f(c) = d + (a - d) / (1 + (c / EC50)^b)
//! ```
//!
//! evaluated in log space as `d + (a - d) * expit(-b * (ln c - ln EC50))`.

use argmin::{
    core::{CostFunction, Error, Executor, State, TerminationReason},
    solver::neldermead::NelderMead,
};
use serde::{Deserialize, Serialize};

use super::types::FitSettings;

const CONC_MIN: f64 = 1e-12;
const CONC_MAX: f64 = 1e12;
const SLOPE_LIMIT: f64 = 8.0;
const Z_LIMIT: f64 = 500.0;

/// Model families available to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoseResponseModel {
    /// Mean signal, independent of concentration
    Constant,
    /// Four-parameter log-logistic curve
    LogLogistic4,
}

/// A fitted model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FittedModel {
    Constant {
        mean: f64,
    },
    LogLogistic4 {
        /// Plateau approached as concentration goes to zero (for b > 0)
        a: f64,
        /// Plateau approached at high concentration (for b > 0)
        d: f64,
        ec50: f64,
        b: f64,
    },
}

impl DoseResponseModel {
    /// Fit the model to (concentration, signal) pairs
    ///
    /// Returns `None` when there is nothing to fit or the optimizer did not
    /// converge.
    pub fn fit(&self, x: &[f64], y: &[f64], settings: &FitSettings) -> Option<FittedModel> {
        if x.is_empty() || x.len() != y.len() {
            return None;
        }
        match self {
            DoseResponseModel::Constant => Some(FittedModel::Constant { mean: mean(y) }),
            DoseResponseModel::LogLogistic4 => fit_log_logistic(x, y, settings),
        }
    }
}

impl FittedModel {
    pub fn evaluate(&self, c: f64) -> f64 {
        match *self {
            FittedModel::Constant { mean } => mean,
            FittedModel::LogLogistic4 { a, d, ec50, b } => {
                d + (a - d) * logistic_weight(c.ln_clamped(), ec50.ln(), b)
            }
        }
    }

    /// Residual sum of squares over the given points
    pub fn rss(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter()
            .zip(y)
            .map(|(&c, &v)| (v - self.evaluate(c)).powi(2))
            .sum()
    }

    /// Parameter values in declaration order
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            FittedModel::Constant { mean } => vec![mean],
            FittedModel::LogLogistic4 { a, d, ec50, b } => vec![a, d, ec50, b],
        }
    }
}

trait LnClamped {
    fn ln_clamped(self) -> f64;
}

impl LnClamped for f64 {
    fn ln_clamped(self) -> f64 {
        self.clamp(CONC_MIN, CONC_MAX).ln()
    }
}

/// `expit(-z)` with `z = b * (ln c - ln EC50)` clamped to avoid overflow
fn logistic_weight(ln_c: f64, ln_ec50: f64, b: f64) -> f64 {
    let z = (b * (ln_c - ln_ec50)).clamp(-Z_LIMIT, Z_LIMIT);
    1.0 / (1.0 + z.exp())
}

fn mean(y: &[f64]) -> f64 {
    y.iter().sum::<f64>() / y.len() as f64
}

/// Least-squares fit of the 4PL curve
///
/// The simplex searches over (ln EC50, b); for every candidate the plateaus
/// (a, d) enter linearly and are solved exactly.
struct LogLogisticProblem<'a> {
    ln_x: Vec<f64>,
    y: &'a [f64],
}

/// Best plateaus for a fixed shape, together with their RSS
struct Projection {
    a: f64,
    d: f64,
    rss: f64,
}

impl LogLogisticProblem<'_> {
    fn bounded(point: &[f64]) -> (f64, f64) {
        (
            point[0].clamp(CONC_MIN.ln(), CONC_MAX.ln()),
            point[1].clamp(-SLOPE_LIMIT, SLOPE_LIMIT),
        )
    }

    fn project(&self, ln_ec50: f64, b: f64) -> Projection {
        let s: Vec<f64> = self
            .ln_x
            .iter()
            .map(|&lx| logistic_weight(lx, ln_ec50, b))
            .collect();

        // y ~ a * s + d * (1 - s)
        let (mut suu, mut suv, mut svv, mut suy, mut svy) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (&u, &y) in s.iter().zip(self.y) {
            let v = 1.0 - u;
            suu += u * u;
            suv += u * v;
            svv += v * v;
            suy += u * y;
            svy += v * y;
        }
        let det = suu * svv - suv * suv;
        let (a, d) = if det > f64::EPSILON * suu * svv {
            ((suy * svv - svy * suv) / det, (svy * suu - suy * suv) / det)
        } else {
            let m = mean(self.y);
            (m, m)
        };

        let rss = s
            .iter()
            .zip(self.y)
            .map(|(&u, &y)| (y - (d + (a - d) * u)).powi(2))
            .sum();
        Projection { a, d, rss }
    }
}

impl CostFunction for LogLogisticProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, point: &Self::Param) -> Result<Self::Output, Error> {
        let (ln_ec50, b) = Self::bounded(point);
        Ok(self.project(ln_ec50, b).rss)
    }
}

fn fit_log_logistic(x: &[f64], y: &[f64], settings: &FitSettings) -> Option<FittedModel> {
    let ln_x: Vec<f64> = x.iter().map(|c| c.ln_clamped()).collect();

    let mut positive: Vec<f64> = x.iter().copied().filter(|&c| c > 0.0).collect();
    let ec50_0 = if positive.is_empty() {
        1.0
    } else {
        median(&mut positive)
    };
    let start = vec![ec50_0.ln_clamped(), 1.0];

    let m = mean(y);
    let tss: f64 = y.iter().map(|v| (v - m).powi(2)).sum();
    let scale: f64 = y.iter().map(|v| v * v).sum();
    // costs cannot be resolved below rounding error of the signal itself
    let sd_tolerance = (settings.tolerance * tss)
        .max(f64::EPSILON * scale)
        .max(f64::MIN_POSITIVE);

    let solver: NelderMead<Vec<f64>, f64> = NelderMead::new(initial_simplex(&start))
        .with_sd_tolerance(sd_tolerance)
        .ok()?;
    let problem = LogLogisticProblem {
        ln_x: ln_x.clone(),
        y,
    };
    let res = Executor::new(problem, solver)
        .configure(|state| state.max_iters(settings.max_iters))
        .run()
        .ok()?;

    let converged = matches!(
        res.state.get_termination_reason(),
        Some(TerminationReason::SolverConverged) | Some(TerminationReason::TargetCostReached)
    );
    if !converged {
        tracing::debug!(
            reason = ?res.state.get_termination_reason(),
            "4PL fit did not converge"
        );
        return None;
    }

    let best = res.state.best_param.as_ref()?;
    let (ln_ec50, b) = LogLogisticProblem::bounded(best);
    let Projection { a, d, rss } = LogLogisticProblem { ln_x, y }.project(ln_ec50, b);
    if !rss.is_finite() {
        return None;
    }
    Some(FittedModel::LogLogistic4 {
        a,
        d,
        ec50: ln_ec50.exp(),
        b,
    })
}

fn initial_simplex(start: &[f64]) -> Vec<Vec<f64>> {
    // one step of about an order of magnitude in EC50 and half a unit in slope
    let steps = [2.0, 0.5];
    let mut vertices = vec![start.to_vec()];
    for (i, step) in steps.iter().enumerate() {
        let mut vertex = start.to_vec();
        vertex[i] += step;
        vertices.push(vertex);
    }
    vertices
}

pub(crate) fn median(values: &mut [f64]) -> f64 {
    use statrs::statistics::{Data, OrderStatistics};

    let mut data = Data::new(values);
    data.median()
}
