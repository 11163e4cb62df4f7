// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Closed-form eigendecomposition of a symmetric 2x2 matrix.
//!
//! A dedicated linear-algebra crate is overkill for a single fixed-size
//! problem with a textbook closed form, so this is solved directly.

/// The eigendecomposition of a symmetric 2x2 matrix `[[xx, xy], [xy, yy]]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eigen2x2 {
    /// The larger eigenvalue.
    pub lambda1: f64,
    /// The smaller eigenvalue.
    pub lambda2: f64,
    /// Unit eigenvector corresponding to `lambda1`.
    pub v1: (f64, f64),
}

/// Eigendecompose the symmetric matrix `[[xx, xy], [xy, yy]]`, returning the
/// eigenvalues in descending order and the eigenvector of the larger one.
pub fn eigen_sym_2x2(xx: f64, xy: f64, yy: f64) -> Eigen2x2 {
    let tr = xx + yy;
    let diff = xx - yy;
    let disc = ((diff * diff) / 4.0 + xy * xy).max(0.0).sqrt();
    let lambda1 = tr / 2.0 + disc;
    let lambda2 = tr / 2.0 - disc;

    // Eigenvector of lambda1 solves (xx - lambda1) vx + xy vy = 0.
    let v1 = if xy.abs() > 1e-300 {
        let vx = lambda1 - yy;
        let vy = xy;
        let norm = (vx * vx + vy * vy).sqrt();
        (vx / norm, vy / norm)
    } else if xx >= yy {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    };

    Eigen2x2 {
        lambda1,
        lambda2,
        v1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn diagonal_matrix() {
        let e = eigen_sym_2x2(4.0, 0.0, 1.0);
        assert_abs_diff_eq!(e.lambda1, 4.0);
        assert_abs_diff_eq!(e.lambda2, 1.0);
        assert_abs_diff_eq!(e.v1.0.abs(), 1.0);
    }

    #[test]
    fn symmetric_matrix_reconstructs_eigenvalue_equation() {
        let (xx, xy, yy) = (3.0, 1.0, 2.0);
        let e = eigen_sym_2x2(xx, xy, yy);
        // M v1 == lambda1 v1
        let (vx, vy) = e.v1;
        let mx = xx * vx + xy * vy;
        let my = xy * vx + yy * vy;
        assert_abs_diff_eq!(mx, e.lambda1 * vx, epsilon = 1e-10);
        assert_abs_diff_eq!(my, e.lambda1 * vy, epsilon = 1e-10);
        assert!(e.lambda1 >= e.lambda2);
    }
}
