//! Finite-difference stencils for the linear transport equation
//!
//! With Courant number `C = c * dt / dx`:
//!
//! ```text
//! upwind (corner):  u[k+1][m] = u[k][m] - C * (u[k][m] - u[k][m-1]) + dt * f(t_k, x_m)
//! cross (leapfrog): u[k+1][m] = u[k-1][m] + C * (u[k][m-1] - u[k][m+1]) + 2 * dt * f(t_k, x_m)
//! ```
//!
//! The cross scheme needs two previous layers and both neighbours, so the
//! first layer and the rightmost column fall back to the upwind stencil.

use super::problem::TransportProblem;
use rayon::prelude::*;

/// Step sizes shared by every stencil evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steps {
    /// Time step `dt`
    pub dt: f64,
    /// Space step `dx`
    pub dx: f64,
    /// Courant number `c * dt / dx`
    pub courant: f64,
}

impl Steps {
    /// Steps for speed `c`
    #[must_use]
    pub fn new(dt: f64, dx: f64, c: f64) -> Self {
        Self {
            dt,
            dx,
            courant: c * dt / dx,
        }
    }
}

/// Two-level upwind stencil
#[inline]
#[must_use]
pub fn upwind(left: f64, here: f64, source: f64, steps: Steps) -> f64 {
    here - steps.courant * (here - left) + steps.dt * source
}

/// Three-level cross stencil
#[inline]
#[must_use]
pub fn cross(before: f64, left: f64, right: f64, source: f64, steps: Steps) -> f64 {
    before + steps.courant * (left - right) + 2.0 * steps.dt * source
}

/// Fill layer `k + 1` from layer `k` (and `k - 1` when available)
///
/// `next[0]` is the inflow boundary value; the remaining columns are
/// computed in parallel.
///
/// # Arguments
/// * `before` - Layer `k - 1`, `None` when `k == 0`
/// * `current` - Layer `k`
/// * `next` - Output layer `k + 1`, same length as `current`
/// * `k` - Index of `current`
pub fn advance_layer<P: TransportProblem + ?Sized>(
    problem: &P,
    before: Option<&[f64]>,
    current: &[f64],
    next: &mut [f64],
    k: usize,
    steps: Steps,
) {
    debug_assert_eq!(current.len(), next.len());
    let Some((edge, interior)) = next.split_first_mut() else {
        return;
    };

    let t_k = steps.dt * k as f64;
    *edge = problem.boundary(steps.dt * (k + 1) as f64);

    let last = current.len() - 1;
    interior.par_iter_mut().enumerate().for_each(|(idx, cell)| {
        let m = idx + 1;
        let source = problem.source(t_k, steps.dx * m as f64);
        *cell = match before {
            Some(before) if m < last => {
                cross(before[m], current[m - 1], current[m + 1], source, steps)
            }
            _ => upwind(current[m - 1], current[m], source, steps),
        };
    });
}
