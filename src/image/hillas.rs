// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hillas moments: the charge-weighted ellipse that summarizes a cleaned
//! shower image.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::constants::MIN_PIXELS_FOR_HILLAS;
use crate::geom::CameraGeometry;
use crate::math::eigen_sym_2x2;

/// Hillas moments of a cleaned image. All angles are radians; `x`/`y` are
/// camera-frame meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HillasParameters {
    pub intensity: f64,
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
    pub psi: f64,
    pub r: f64,
    pub phi: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl HillasParameters {
    pub fn nan() -> Self {
        Self {
            intensity: f64::NAN,
            x: f64::NAN,
            y: f64::NAN,
            length: f64::NAN,
            width: f64::NAN,
            psi: f64::NAN,
            r: f64::NAN,
            phi: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
        }
    }
}

/// Reduce an angle to `(-pi/2, pi/2]`, the convention for a headless
/// (undirected) major-axis orientation.
fn reduce_psi(mut psi: f64) -> f64 {
    while psi <= -FRAC_PI_2 {
        psi += std::f64::consts::PI;
    }
    while psi > FRAC_PI_2 {
        psi -= std::f64::consts::PI;
    }
    psi
}

/// Compute Hillas moments over the pixels selected by `mask`. Pixels not in
/// the mask contribute nothing. Returns all-`NaN` when the mask selects
/// fewer than [MIN_PIXELS_FOR_HILLAS] pixels or the masked intensity sum
/// is not positive.
pub fn hillas_parameters(
    geom: &CameraGeometry,
    image: &[f64],
    mask: &[bool],
) -> HillasParameters {
    let indices: Vec<usize> = (0..image.len()).filter(|&i| mask[i]).collect();
    if indices.len() < MIN_PIXELS_FOR_HILLAS {
        return HillasParameters::nan();
    }
    let w: f64 = indices.iter().map(|&i| image[i]).sum();
    if !(w > 0.0) {
        return HillasParameters::nan();
    }

    let xs: Vec<f64> = indices.iter().map(|&i| geom.pix_x[i]).collect();
    let ys: Vec<f64> = indices.iter().map(|&i| geom.pix_y[i]).collect();
    let ws: Vec<f64> = indices.iter().map(|&i| image[i]).collect();

    let x_bar: f64 = ws.iter().zip(&xs).map(|(w, x)| w * x).sum::<f64>() / w;
    let y_bar: f64 = ws.iter().zip(&ys).map(|(w, y)| w * y).sum::<f64>() / w;

    let mut cxx = 0.0;
    let mut cyy = 0.0;
    let mut cxy = 0.0;
    for ((&wi, &xi), &yi) in ws.iter().zip(&xs).zip(&ys) {
        let dx = xi - x_bar;
        let dy = yi - y_bar;
        cxx += wi * dx * dx;
        cyy += wi * dy * dy;
        cxy += wi * dx * dy;
    }
    cxx /= w;
    cyy /= w;
    cxy /= w;

    let eigen = eigen_sym_2x2(cxx, cxy, cyy);
    let length = eigen.lambda1.max(0.0).sqrt();
    let width = eigen.lambda2.max(0.0).sqrt();
    let psi = reduce_psi(eigen.v1.1.atan2(eigen.v1.0));

    let r = x_bar.hypot(y_bar);
    let phi = y_bar.atan2(x_bar);

    let (cos_psi, sin_psi) = (psi.cos(), psi.sin());
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for ((&wi, &xi), &yi) in ws.iter().zip(&xs).zip(&ys) {
        let t = (xi - x_bar) * cos_psi + (yi - y_bar) * sin_psi;
        m3 += wi * t.powi(3);
        m4 += wi * t.powi(4);
    }
    m3 /= w;
    m4 /= w;
    let skewness = m3 / length.powi(3);
    let kurtosis = m4 / length.powi(4);

    HillasParameters {
        intensity: w,
        x: x_bar,
        y: y_bar,
        length,
        width,
        psi,
        r,
        phi,
        skewness,
        kurtosis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_mask_is_nan() {
        let geom = CameraGeometry::square_grid(4);
        let image = vec![0.0; 16];
        let mask = vec![false; 16];
        let hillas = hillas_parameters(&geom, &image, &mask);
        assert!(hillas.intensity.is_nan());
        assert!(hillas.length.is_nan());
    }

    #[test]
    fn diagonal_line_has_45_degree_psi() {
        let geom = CameraGeometry::square_grid(4);
        let mut image = vec![0.0; 16];
        let mut mask = vec![false; 16];
        for &i in &[0usize, 5, 10, 15] {
            image[i] = 1.0;
            mask[i] = true;
        }
        let hillas = hillas_parameters(&geom, &image, &mask);
        assert_abs_diff_eq!(hillas.intensity, 4.0);
        assert_abs_diff_eq!(hillas.x, 1.5);
        assert_abs_diff_eq!(hillas.y, 1.5);
        assert_abs_diff_eq!(hillas.psi, std::f64::consts::FRAC_PI_4, epsilon = 1e-9);
        assert!(hillas.length >= hillas.width);
    }
}
