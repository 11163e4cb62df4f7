// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Camera-frame (meters) to array-nominal-frame (radians) mapping:
//! `(x/f_eff, y/f_eff)` in the telescope's own pointing tangent plane,
//! re-projected into the array's common nominal frame.

use super::horizontal::HorizontalCoord;
use super::nominal::{nominal_to_sky, sky_to_nominal, NominalCoord};

/// A small angular step, in camera-plane meters, used to numerically
/// transport a direction vector from the telescope frame into the array's
/// nominal frame (see [camera_to_nominal]).
const AXIS_STEP_METERS: f64 = 1e-6;

/// Map a Hillas centroid `(x, y)` \[camera meters\] and major-axis
/// orientation `psi` \[radians\] from telescope-camera coordinates into the
/// array's common nominal frame, given the telescope's own pointing
/// direction and the array's pointing center.
///
/// Returns the projected centroid and the (unit) major-axis direction in
/// the array nominal frame. The axis direction is found by projecting a
/// second point offset along the camera axis and differencing, rather than
/// deriving the projection's Jacobian by hand -- accurate because the
/// offset step is tiny compared to the field of view.
pub fn camera_to_nominal(
    x: f64,
    y: f64,
    psi: f64,
    effective_focal_length: f64,
    tel_pointing: HorizontalCoord,
    array_pointing: HorizontalCoord,
) -> (NominalCoord, (f64, f64)) {
    let project = |cx: f64, cy: f64| -> NominalCoord {
        let xi = cx / effective_focal_length;
        let eta = cy / effective_focal_length;
        let sky = nominal_to_sky(NominalCoord::new(xi, eta), tel_pointing);
        sky_to_nominal(sky, array_pointing)
    };

    let cog = project(x, y);
    let ahead = project(
        x + AXIS_STEP_METERS * psi.cos(),
        y + AXIS_STEP_METERS * psi.sin(),
    );

    let dx = ahead.xi - cog.xi;
    let dy = ahead.eta - cog.eta;
    let norm = dx.hypot(dy);
    let axis = if norm > 0.0 {
        (dx / norm, dy / norm)
    } else {
        (psi.cos(), psi.sin())
    };

    (cog, axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn telescope_pointing_equal_to_array_pointing_is_identity_projection() {
        let pointing = HorizontalCoord::new(1.3, 0.4);
        let (cog, axis) = camera_to_nominal(0.0, 0.0, 0.0, 28.0, pointing, pointing);
        assert_abs_diff_eq!(cog.xi, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cog.eta, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(axis.0, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(axis.1, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn axis_direction_is_unit_length() {
        let pointing = HorizontalCoord::new(0.9, 1.2);
        let (_, axis) = camera_to_nominal(0.3, -0.2, 0.7, 28.0, pointing, pointing);
        let len = (axis.0 * axis.0 + axis.1 * axis.1).sqrt();
        assert_abs_diff_eq!(len, 1.0, epsilon = 1e-6);
    }
}
