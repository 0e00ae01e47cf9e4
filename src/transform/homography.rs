//! Planar projective transform solved from four point correspondences.

use crate::{
    foundation::error::{CardError, CardResult},
    geometry::quad::Quad,
};

/// Pivots smaller than this fraction of the largest system coefficient count as zero.
const PIVOT_EPSILON: f64 = 1e-10;

/// 3x3 projective matrix in row-major order with the last coefficient fixed to 1.
///
/// Maps destination coordinates to source coordinates, which is the direction a resampler
/// walks: for each output pixel, find where to read from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: [f64; 9],
}

impl Homography {
    /// Maps every point to itself.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Solve for the matrix taking each `dst` corner to the matching `src` corner.
    ///
    /// Fails with [`CardError::SingularTransform`] when the correspondences are degenerate
    /// (for example three collinear destination corners).
    pub fn solve(src: &Quad, dst: &Quad) -> CardResult<Self> {
        if !src.is_finite() || !dst.is_finite() {
            return Err(CardError::singular_transform(
                "quad corners must be finite",
            ));
        }

        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];
        for (i, (s, d)) in src.points().iter().zip(dst.points()).enumerate() {
            let (x, y) = (d.x, d.y);
            let (u, v) = (s.x, s.y);
            a[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u];
            b[2 * i] = u;
            a[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v];
            b[2 * i + 1] = v;
        }

        let h = solve_linear_system(a, b)?;
        let m = [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0];
        if m.iter().any(|c| !c.is_finite()) {
            return Err(CardError::singular_transform(
                "homography coefficients are not finite",
            ));
        }
        Ok(Self { m })
    }

    /// Row-major coefficients; element 8 is always 1.
    pub fn coefficients(&self) -> [f64; 9] {
        self.m
    }

    /// Apply the matrix with homogeneous division.
    ///
    /// Points on the horizon line (`w == 0`) come back non-finite; callers treat those as
    /// unmapped.
    #[inline]
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        let w = m[6] * x + m[7] * y + m[8];
        let u = (m[0] * x + m[1] * y + m[2]) / w;
        let v = (m[3] * x + m[4] * y + m[5]) / w;
        (u, v)
    }
}

/// Gaussian elimination with partial pivoting followed by back substitution.
fn solve_linear_system(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> CardResult<[f64; 8]> {
    const N: usize = 8;

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);
    let epsilon = PIVOT_EPSILON * scale;

    for col in 0..N {
        let mut pivot_row = col;
        let mut pivot_abs = a[col][col].abs();
        for (row, r) in a.iter().enumerate().skip(col + 1) {
            if r[col].abs() > pivot_abs {
                pivot_abs = r[col].abs();
                pivot_row = row;
            }
        }
        if !(pivot_abs > epsilon) {
            return Err(CardError::singular_transform(format!(
                "near-zero pivot {pivot_abs:e} in column {col}"
            )));
        }
        if pivot_row != col {
            a.swap(col, pivot_row);
            b.swap(col, pivot_row);
        }

        let pivot = a[col][col];
        for row in (col + 1)..N {
            let factor = a[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..N {
                a[row][j] -= factor * a[col][j];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; N];
    for i in (0..N).rev() {
        let mut sum = b[i];
        for j in (i + 1)..N {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }
    Ok(x)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/homography.rs"]
mod tests;
