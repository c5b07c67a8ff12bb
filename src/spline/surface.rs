//! Immutable tensor-product spline surfaces.

use crate::spline::basis::{BasisSpec, MAX_ORDER};
use crate::util::{ScintilocError, ScintilocResult};

/// Tensor-product 2D B-spline defined by a coefficient grid.
///
/// Coefficients are stored row-major: the coefficient for basis `ix` along x
/// and `iy` along y lives at `iy * spec_x.num_coefs() + ix`. The surface is
/// immutable once constructed and safe to share across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct SplineSurface {
    spec_x: BasisSpec,
    spec_y: BasisSpec,
    coefs: Vec<f64>,
}

impl SplineSurface {
    /// All-zero surface.
    pub fn zero(spec_x: BasisSpec, spec_y: BasisSpec) -> Self {
        Self {
            spec_x,
            spec_y,
            coefs: vec![0.0; spec_x.num_coefs() * spec_y.num_coefs()],
        }
    }

    /// Constant surface: every coefficient is `value`, so by partition of
    /// unity the surface evaluates to `value` on the whole domain.
    pub fn constant(spec_x: BasisSpec, spec_y: BasisSpec, value: f64) -> Self {
        Self {
            spec_x,
            spec_y,
            coefs: vec![value; spec_x.num_coefs() * spec_y.num_coefs()],
        }
    }

    /// Creates a surface from a row-major coefficient grid of shape
    /// `spec_y.num_coefs()` x `spec_x.num_coefs()`.
    pub fn from_coefs(
        spec_x: BasisSpec,
        spec_y: BasisSpec,
        coefs: Vec<f64>,
    ) -> ScintilocResult<Self> {
        let needed = spec_x.num_coefs() * spec_y.num_coefs();
        if coefs.len() != needed {
            return Err(ScintilocError::BufferTooSmall {
                needed,
                got: coefs.len(),
            });
        }
        Ok(Self {
            spec_x,
            spec_y,
            coefs,
        })
    }

    /// Basis shape along x.
    pub fn spec_x(&self) -> BasisSpec {
        self.spec_x
    }

    /// Basis shape along y.
    pub fn spec_y(&self) -> BasisSpec {
        self.spec_y
    }

    /// Returns the row-major coefficient grid.
    pub fn coefs(&self) -> &[f64] {
        &self.coefs
    }

    /// Evaluates the surface at `(x, y)`.
    ///
    /// A coordinate without a knot span on either axis contributes nothing
    /// and yields 0; callers that need domain membership must test the
    /// coordinates themselves rather than rely on a zero return.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let (Some(span_x), Some(span_y)) = (self.spec_x.find_span(x), self.spec_y.find_span(y))
        else {
            return 0.0;
        };
        let mut basis_x = [0.0f64; MAX_ORDER];
        let mut basis_y = [0.0f64; MAX_ORDER];
        self.spec_x.eval_basis(x, span_x, &mut basis_x);
        self.spec_y.eval_basis(y, span_y, &mut basis_y);

        let stride = self.spec_x.num_coefs();
        let mut sum = 0.0;
        for iy in 0..self.spec_y.order() {
            let row = (span_y + iy) * stride + span_x;
            for (ix, &bx) in basis_x[..self.spec_x.order()].iter().enumerate() {
                sum += self.coefs[row + ix] * bx * basis_y[iy];
            }
        }
        sum
    }
}
