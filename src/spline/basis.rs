//! Uniform B-spline basis evaluation.
//!
//! The knot vector is uniform on [0, 1]: `subdiv` interior knot subdivisions
//! split the domain into `subdiv + 1` equal spans, and knots continue on the
//! same uniform lattice past both ends, so exactly `order` translated copies
//! of the cardinal basis function are nonzero at any point of the domain.

use crate::util::{ScintilocError, ScintilocResult};

/// Largest supported basis order (nonzero functions per span).
pub const MAX_ORDER: usize = 8;

/// Shape of a 1D uniform B-spline basis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BasisSpec {
    order: usize,
    subdiv: usize,
}

impl BasisSpec {
    /// Creates a basis shape with `order` nonzero functions per span and
    /// `subdiv` interior knot subdivisions.
    pub fn new(order: usize, subdiv: usize) -> ScintilocResult<Self> {
        if order < 2 || order > MAX_ORDER {
            return Err(ScintilocError::UnsupportedOrder {
                order,
                max: MAX_ORDER,
            });
        }
        Ok(Self { order, subdiv })
    }

    /// Number of basis functions nonzero at any point.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of interior knot subdivisions.
    pub fn subdiv(&self) -> usize {
        self.subdiv
    }

    /// Number of coefficients (basis functions) along this axis.
    pub fn num_coefs(&self) -> usize {
        self.order + self.subdiv
    }

    /// Returns the knot span containing `x`, or `None` outside [0, 1].
    ///
    /// The right boundary belongs to the last span, so `find_span(1.0)` is
    /// `Some(subdiv)` rather than `None`.
    pub fn find_span(&self, x: f64) -> Option<usize> {
        if !(0.0..=1.0).contains(&x) {
            return None;
        }
        if x == 1.0 {
            Some(self.subdiv)
        } else {
            Some((x * (self.subdiv + 1) as f64) as usize)
        }
    }

    /// Evaluates the `order` nonzero basis functions at `x` within `span`,
    /// writing them to `out[..order]`.
    ///
    /// Uses the Cox-de Boor triangular recurrence, building order 1 up to
    /// `order` with a two-row rolling buffer. For x strictly inside (0, 1)
    /// the values are non-negative and sum to 1.
    pub fn eval_basis(&self, x: f64, span: usize, out: &mut [f64]) {
        let order = self.order;
        debug_assert!(span <= self.subdiv);
        debug_assert!(out.len() >= order);
        let spans = (self.subdiv + 1) as f64;
        let mut buff = [[0.0f64; MAX_ORDER]; 2];

        buff[0][0] = 1.0;
        for ord in 1..order - 1 {
            let cur = ord & 1;
            let prev = cur ^ 1;
            let mut saved = 0.0;
            for j in 0..ord {
                let weight = buff[prev][j] * spans / ord as f64;
                let right = (span + j + 1) as f64 / spans;
                buff[cur][j] = saved + (right - x) * weight;
                let left = (span as f64 + j as f64 - ord as f64 + 1.0) / spans;
                saved = (x - left) * weight;
            }
            buff[cur][ord] = saved;
        }

        // Final order: write straight into the output slice. The last row
        // written above has index (order - 2) & 1 == order & 1.
        let last = order & 1;
        let mut saved = 0.0;
        for j in 0..order - 1 {
            let weight = buff[last][j] * spans / (order - 1) as f64;
            let right = (span + j + 1) as f64 / spans;
            out[j] = saved + (right - x) * weight;
            let left = (span as f64 + j as f64 - order as f64 + 2.0) / spans;
            saved = (x - left) * weight;
        }
        out[order - 1] = saved;
    }
}
