//! Spline surface fitting from sampled data.
//!
//! Both entry points exploit separability: the tensor-product equations
//! decouple per axis, so a 2D fit runs as sequential 1D passes. The
//! least-squares path aggregates the sample grid along y into basis-row
//! space first, then solves along x for each row and along y for each
//! column.

use crate::grid::SampleGrid;
use crate::spline::basis::BasisSpec;
use crate::spline::solve::invert;
use crate::spline::surface::SplineSurface;
use crate::util::{ScintilocError, ScintilocResult};

/// Uniformly spaced sample sites `i / (len - 1)` covering [0, 1].
pub fn uniform_sites(len: usize) -> Vec<f64> {
    if len < 2 {
        return vec![0.0; len];
    }
    (0..len).map(|i| i as f64 / (len - 1) as f64).collect()
}

/// Per-site span indices and local basis rows for one axis.
struct BasisTable {
    spans: Vec<usize>,
    rows: Vec<f64>,
    order: usize,
}

impl BasisTable {
    fn build(spec: BasisSpec, sites: &[f64], axis: &'static str) -> ScintilocResult<Self> {
        let order = spec.order();
        let mut spans = Vec::with_capacity(sites.len());
        let mut rows = vec![0.0; sites.len() * order];
        for (i, &site) in sites.iter().enumerate() {
            let span = spec
                .find_span(site)
                .ok_or(ScintilocError::SampleOutOfDomain { axis, value: site })?;
            spec.eval_basis(site, span, &mut rows[i * order..(i + 1) * order]);
            spans.push(span);
        }
        Ok(Self { spans, rows, order })
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.rows[i * self.order..(i + 1) * self.order]
    }
}

/// Inverse of the collocation matrix (basis values at the sample sites).
fn collocation_inverse(spec: BasisSpec, table: &BasisTable) -> ScintilocResult<Vec<f64>> {
    let n = spec.num_coefs();
    let mut mat = vec![0.0; n * n];
    for (i, &span) in table.spans.iter().enumerate() {
        for (j, &value) in table.row(i).iter().enumerate() {
            mat[i * n + span + j] = value;
        }
    }
    invert(&mat, n)
}

/// Inverse of the least-squares normal matrix, scatter-accumulated from
/// outer products of the local basis rows; banded symmetric thanks to the
/// finite basis support.
fn normal_inverse(spec: BasisSpec, table: &BasisTable) -> ScintilocResult<Vec<f64>> {
    let n = spec.num_coefs();
    let order = table.order;
    let mut mat = vec![0.0; n * n];
    for (l, &span) in table.spans.iter().enumerate() {
        let row = table.row(l);
        for i in 0..order {
            for j in 0..=i {
                mat[(span + i) * n + span + j] += row[i] * row[j];
            }
        }
    }
    for i in 0..n {
        for j in (i + 1)..n {
            mat[i * n + j] = mat[j * n + i];
        }
    }
    invert(&mat, n)
}

fn check_grid_shape(values: &SampleGrid, lx: usize, ly: usize) -> ScintilocResult<()> {
    if values.width() != lx {
        return Err(ScintilocError::SampleCountMismatch {
            axis: "x",
            expected: lx,
            got: values.width(),
        });
    }
    if values.height() != ly {
        return Err(ScintilocError::SampleCountMismatch {
            axis: "y",
            expected: ly,
            got: values.height(),
        });
    }
    Ok(())
}

/// Fits a surface by exact interpolation.
///
/// The sample counts must equal the coefficient counts per axis; the
/// collocation matrix is inverted once per axis and applied along x for
/// every sampled row, then along y for every coefficient column.
pub fn interpolate_surface(
    spec_x: BasisSpec,
    spec_y: BasisSpec,
    xs: &[f64],
    ys: &[f64],
    values: &SampleGrid,
) -> ScintilocResult<SplineSurface> {
    let nx = spec_x.num_coefs();
    let ny = spec_y.num_coefs();
    if xs.len() != nx {
        return Err(ScintilocError::SampleCountMismatch {
            axis: "x",
            expected: nx,
            got: xs.len(),
        });
    }
    if ys.len() != ny {
        return Err(ScintilocError::SampleCountMismatch {
            axis: "y",
            expected: ny,
            got: ys.len(),
        });
    }
    check_grid_shape(values, nx, ny)?;

    let table_x = BasisTable::build(spec_x, xs, "x")?;
    let inv_x = collocation_inverse(spec_x, &table_x)?;
    let mut mid = vec![0.0; ny * nx];
    for iy in 0..ny {
        for jx in 0..nx {
            let mut sum = 0.0;
            for ix in 0..nx {
                sum += inv_x[jx * nx + ix] * values.get(ix, iy);
            }
            mid[iy * nx + jx] = sum;
        }
    }

    let table_y = BasisTable::build(spec_y, ys, "y")?;
    let inv_y = collocation_inverse(spec_y, &table_y)?;
    let mut coefs = vec![0.0; ny * nx];
    for ix in 0..nx {
        for jy in 0..ny {
            let mut sum = 0.0;
            for iy in 0..ny {
                sum += inv_y[jy * ny + iy] * mid[iy * nx + ix];
            }
            coefs[jy * nx + ix] = sum;
        }
    }
    SplineSurface::from_coefs(spec_x, spec_y, coefs)
}

/// Fits a surface by least squares on an oversampled grid.
///
/// Requires at least as many samples as coefficients per axis. With sample
/// counts equal to the coefficient counts this reproduces
/// [`interpolate_surface`] up to rounding.
pub fn approximate_surface(
    spec_x: BasisSpec,
    spec_y: BasisSpec,
    xs: &[f64],
    ys: &[f64],
    values: &SampleGrid,
) -> ScintilocResult<SplineSurface> {
    let nx = spec_x.num_coefs();
    let ny = spec_y.num_coefs();
    let lx = xs.len();
    let ly = ys.len();
    if lx < nx {
        return Err(ScintilocError::TooFewSamples {
            axis: "x",
            needed: nx,
            got: lx,
        });
    }
    if ly < ny {
        return Err(ScintilocError::TooFewSamples {
            axis: "y",
            needed: ny,
            got: ly,
        });
    }
    check_grid_shape(values, lx, ly)?;

    // Aggregate the sample rows along y into basis-row space.
    let table_y = BasisTable::build(spec_y, ys, "y")?;
    let mut agg = vec![0.0; ny * lx];
    for (l, &span_y) in table_y.spans.iter().enumerate() {
        for (iy, &weight) in table_y.row(l).iter().enumerate() {
            let dst = (span_y + iy) * lx;
            for ix in 0..lx {
                agg[dst + ix] += weight * values.get(ix, l);
            }
        }
    }

    // Least-squares solve along x for every aggregated row.
    let table_x = BasisTable::build(spec_x, xs, "x")?;
    let inv_x = normal_inverse(spec_x, &table_x)?;
    let mut mid = vec![0.0; ny * nx];
    let mut rhs = vec![0.0; nx];
    for iy in 0..ny {
        rhs.fill(0.0);
        for (l, &span_x) in table_x.spans.iter().enumerate() {
            for (ix, &weight) in table_x.row(l).iter().enumerate() {
                rhs[span_x + ix] += weight * agg[iy * lx + l];
            }
        }
        for jx in 0..nx {
            let mut sum = 0.0;
            for ix in 0..nx {
                sum += inv_x[jx * nx + ix] * rhs[ix];
            }
            mid[iy * nx + jx] = sum;
        }
    }

    // Least-squares solve along y for every coefficient column.
    let inv_y = normal_inverse(spec_y, &table_y)?;
    let mut coefs = vec![0.0; ny * nx];
    for jx in 0..nx {
        for jy in 0..ny {
            let mut sum = 0.0;
            for iy in 0..ny {
                sum += inv_y[jy * ny + iy] * mid[iy * nx + jx];
            }
            coefs[jy * nx + jx] = sum;
        }
    }
    SplineSurface::from_coefs(spec_x, spec_y, coefs)
}

#[cfg(test)]
mod tests {
    use super::uniform_sites;

    #[test]
    fn uniform_sites_cover_the_unit_interval() {
        let sites = uniform_sites(5);
        assert_eq!(sites, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(uniform_sites(1), vec![0.0]);
        assert!(uniform_sites(0).is_empty());
    }
}
