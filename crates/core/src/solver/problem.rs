//! Transport problem definition
//!
//! A problem supplies the right-hand side and the initial/boundary data of
//!
//! ```text
//! du/dt + c * du/dx = f(t, x),   u(0, x) = initial(x),   u(t, 0) = boundary(t)
//! ```
//!
//! The speed `c` and the domain come from [`GridConfig`](crate::GridConfig).

/// Source term and initial/boundary conditions of a transport equation
///
/// Implementations are evaluated from worker threads, one call per grid
/// cell, so they must be `Send + Sync` and cheap.
pub trait TransportProblem: Send + Sync {
    /// Right-hand side `f(t, x)`
    fn source(&self, t: f64, x: f64) -> f64;

    /// Initial condition `u(0, x)`
    fn initial(&self, x: f64) -> f64;

    /// Inflow boundary condition `u(t, 0)`
    fn boundary(&self, t: f64) -> f64;
}

/// Homogeneous equation with constant initial and boundary values
///
/// `ConstantProblem::default()` is `f = 0`, `u(0, x) = 1`, `u(t, 0) = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantProblem {
    /// Value of `u(0, x)`
    pub initial: f64,
    /// Value of `u(t, 0)`
    pub boundary: f64,
}

impl Default for ConstantProblem {
    fn default() -> Self {
        Self {
            initial: 1.0,
            boundary: 1.0,
        }
    }
}

impl TransportProblem for ConstantProblem {
    fn source(&self, _t: f64, _x: f64) -> f64 {
        0.0
    }

    fn initial(&self, _x: f64) -> f64 {
        self.initial
    }

    fn boundary(&self, _t: f64) -> f64 {
        self.boundary
    }
}

/// Problem assembled from three closures
///
/// # Example
/// ```rust
/// use transport_plot_core::solver::{FnProblem, TransportProblem};
///
/// let problem = FnProblem::new(|_t, _x| 0.0, |x| x.sin(), |_t| 0.0);
/// assert_eq!(problem.initial(0.0), 0.0);
/// ```
pub struct FnProblem<F, I, B> {
    source: F,
    initial: I,
    boundary: B,
}

impl<F, I, B> FnProblem<F, I, B>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
    I: Fn(f64) -> f64 + Send + Sync,
    B: Fn(f64) -> f64 + Send + Sync,
{
    /// Wrap `source(t, x)`, `initial(x)` and `boundary(t)`
    pub fn new(source: F, initial: I, boundary: B) -> Self {
        Self {
            source,
            initial,
            boundary,
        }
    }
}

impl<F, I, B> TransportProblem for FnProblem<F, I, B>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
    I: Fn(f64) -> f64 + Send + Sync,
    B: Fn(f64) -> f64 + Send + Sync,
{
    fn source(&self, t: f64, x: f64) -> f64 {
        (self.source)(t, x)
    }

    fn initial(&self, x: f64) -> f64 {
        (self.initial)(x)
    }

    fn boundary(&self, t: f64) -> f64 {
        (self.boundary)(t)
    }
}
