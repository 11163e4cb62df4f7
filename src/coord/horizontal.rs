// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The horizontal (sky) frame: altitude and azimuth on the unit sphere.

use serde::{Deserialize, Serialize};

use crate::math::clamped_acos;

/// A direction on the sky, in the horizontal (alt/az) frame. Both fields
/// are radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoord {
    pub alt: f64,
    pub az: f64,
}

impl HorizontalCoord {
    pub fn new(alt: f64, az: f64) -> Self {
        Self { alt, az }
    }

    /// The great-circle angular separation between two sky points, with
    /// the `acos` argument clamped to `[-1, 1]`.
    pub fn separation(&self, other: &Self) -> f64 {
        let d_az = self.az - other.az;
        let cos_sep = self.alt.sin() * other.alt.sin() + self.alt.cos() * other.alt.cos() * d_az.cos();
        clamped_acos(cos_sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn separation_to_self_is_zero() {
        let a = HorizontalCoord::new(0.5, 1.0);
        assert_abs_diff_eq!(a.separation(&a), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn separation_is_symmetric() {
        let a = HorizontalCoord::new(0.4, 0.1);
        let b = HorizontalCoord::new(0.6, 0.9);
        assert_abs_diff_eq!(a.separation(&b), b.separation(&a), epsilon = 1e-12);
    }
}
