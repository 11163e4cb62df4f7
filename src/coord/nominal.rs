// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The nominal (tangent-plane) frame: a gnomonic projection centered on a
//! pointing direction, used to linearize small-angle sky geometry.

use serde::{Deserialize, Serialize};

use super::horizontal::HorizontalCoord;

/// A point in the tangent-plane ("nominal") frame at some pointing center,
/// in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NominalCoord {
    pub xi: f64,
    pub eta: f64,
}

impl NominalCoord {
    pub fn new(xi: f64, eta: f64) -> Self {
        Self { xi, eta }
    }

    pub fn radius(&self) -> f64 {
        self.xi.hypot(self.eta)
    }
}

/// Gnomonic (tangent-plane) projection of a sky point onto the tangent
/// plane at `center`.
pub fn sky_to_nominal(point: HorizontalCoord, center: HorizontalCoord) -> NominalCoord {
    let d_az = point.az - center.az;
    let (sin_alt, cos_alt) = (point.alt.sin(), point.alt.cos());
    let (sin_c_alt, cos_c_alt) = (center.alt.sin(), center.alt.cos());
    let (sin_daz, cos_daz) = (d_az.sin(), d_az.cos());

    let l = cos_alt * sin_daz;
    let m = sin_alt * cos_c_alt - cos_alt * sin_c_alt * cos_daz;
    let n = sin_alt * sin_c_alt + cos_alt * cos_c_alt * cos_daz;

    NominalCoord::new(l / n, m / n)
}

/// Inverse gnomonic projection: given a tangent-plane point and the
/// pointing center, recover the sky direction.
pub fn nominal_to_sky(point: NominalCoord, center: HorizontalCoord) -> HorizontalCoord {
    let rho = point.radius();
    if rho < 1e-15 {
        return center;
    }
    let c = rho.atan();
    let (sin_c, cos_c) = (c.sin(), c.cos());
    let (sin_c_alt, cos_c_alt) = (center.alt.sin(), center.alt.cos());

    let alt = (cos_c * sin_c_alt + (point.eta * sin_c * cos_c_alt) / rho)
        .clamp(-1.0, 1.0)
        .asin();
    let az = center.az
        + (point.xi * sin_c).atan2(rho * cos_c_alt * cos_c - point.eta * sin_c_alt * sin_c);

    HorizontalCoord::new(alt, az)
}
