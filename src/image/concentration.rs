// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Concentration: how tightly the charge is packed relative to the Hillas
//! ellipse.

use serde::{Deserialize, Serialize};

use super::hillas::HillasParameters;
use crate::geom::CameraGeometry;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationParameters {
    pub concentration_cog: f64,
    pub concentration_core: f64,
    pub concentration_pixel: f64,
}

impl ConcentrationParameters {
    pub fn nan() -> Self {
        Self {
            concentration_cog: f64::NAN,
            concentration_core: f64::NAN,
            concentration_pixel: f64::NAN,
        }
    }
}

/// Computes concentration given already-valid (non-`NaN`) Hillas
/// parameters. Callers must check `hillas.intensity` beforehand.
pub fn concentration_parameters(
    geom: &CameraGeometry,
    image: &[f64],
    mask: &[bool],
    hillas: &HillasParameters,
) -> ConcentrationParameters {
    let w = hillas.intensity;
    let (cos_psi, sin_psi) = (hillas.psi.cos(), hillas.psi.sin());

    let mut cog_sum = 0.0;
    let mut core_sum = 0.0;
    let mut pixel_max = 0.0_f64;

    for i in 0..image.len() {
        if !mask[i] {
            continue;
        }
        let dx = geom.pix_x[i] - hillas.x;
        let dy = geom.pix_y[i] - hillas.y;

        if dx.hypot(dy) <= hillas.length {
            cog_sum += image[i];
        }

        let u = dx * cos_psi + dy * sin_psi;
        let v = -dx * sin_psi + dy * cos_psi;
        let inside_ellipse = if hillas.length > 0.0 && hillas.width > 0.0 {
            (u / hillas.length).powi(2) + (v / hillas.width).powi(2) <= 1.0
        } else {
            dx == 0.0 && dy == 0.0
        };
        if inside_ellipse {
            core_sum += image[i];
        }

        pixel_max = pixel_max.max(image[i]);
    }

    ConcentrationParameters {
        concentration_cog: cog_sum / w,
        concentration_core: core_sum / w,
        concentration_pixel: pixel_max / w,
    }
}
