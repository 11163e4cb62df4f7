// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Leakage: how much of a cleaned image sits at the camera edge, a proxy
//! for truncation.

use serde::{Deserialize, Serialize};

use crate::cleaning::dilate;
use crate::geom::CameraGeometry;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeakageParameters {
    pub pixels_width_1: f64,
    pub pixels_width_2: f64,
    pub intensity_width_1: f64,
    pub intensity_width_2: f64,
}

impl LeakageParameters {
    pub fn nan() -> Self {
        Self {
            pixels_width_1: f64::NAN,
            pixels_width_2: f64::NAN,
            intensity_width_1: f64::NAN,
            intensity_width_2: f64::NAN,
        }
    }
}

/// Edge ring one is those pixels whose neighbor count is below the camera's
/// modal (fully-connected) neighbor count -- an adjacency-count deficit;
/// edge ring two is one dilation step further in.
pub fn leakage_parameters(geom: &CameraGeometry, image: &[f64], mask: &[bool]) -> LeakageParameters {
    let n_mask = mask.iter().filter(|&&m| m).count();
    let w: f64 = (0..image.len()).filter(|&i| mask[i]).map(|i| image[i]).sum();
    if n_mask == 0 || !(w > 0.0) {
        return LeakageParameters::nan();
    }

    let outer1 = geom.outer_ring();
    let outer2 = dilate(geom, &outer1);

    let pixels_width_1 = mask.iter().zip(&outer1).filter(|(&m, &o)| m && o).count() as f64 / n_mask as f64;
    let pixels_width_2 = mask.iter().zip(&outer2).filter(|(&m, &o)| m && o).count() as f64 / n_mask as f64;

    let intensity_width_1: f64 = (0..image.len())
        .filter(|&i| mask[i] && outer1[i])
        .map(|i| image[i])
        .sum::<f64>()
        / w;
    let intensity_width_2: f64 = (0..image.len())
        .filter(|&i| mask[i] && outer2[i])
        .map(|i| image[i])
        .sum::<f64>()
        / w;

    LeakageParameters {
        pixels_width_1,
        pixels_width_2,
        intensity_width_1,
        intensity_width_2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn five_by_five_leakage_matches_worked_example() {
        let geom = CameraGeometry::square_grid(5);
        let mut image = vec![1.0; 25];
        image[0] = 10.0;
        let mask = vec![true; 25];
        let leakage = leakage_parameters(&geom, &image, &mask);
        assert_abs_diff_eq!(leakage.pixels_width_1, 16.0 / 25.0);
        assert_abs_diff_eq!(leakage.pixels_width_2, 24.0 / 25.0);
        assert_abs_diff_eq!(leakage.intensity_width_1, 25.0 / 34.0, epsilon = 1e-12);
        assert_abs_diff_eq!(leakage.intensity_width_2, 33.0 / 34.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_mask_is_nan() {
        let geom = CameraGeometry::square_grid(4);
        let image = vec![0.0; 16];
        let mask = vec![false; 16];
        let leakage = leakage_parameters(&geom, &image, &mask);
        assert!(leakage.pixels_width_1.is_nan());
    }
}
