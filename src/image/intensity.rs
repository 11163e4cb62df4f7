// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Straight (unweighted) statistics of the per-pixel intensity values over
//! the cleaned mask.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntensityParameters {
    pub intensity_max: f64,
    pub intensity_mean: f64,
    pub intensity_std: f64,
    pub intensity_skewness: f64,
    pub intensity_kurtosis: f64,
}

impl IntensityParameters {
    pub fn nan() -> Self {
        Self {
            intensity_max: f64::NAN,
            intensity_mean: f64::NAN,
            intensity_std: f64::NAN,
            intensity_skewness: f64::NAN,
            intensity_kurtosis: f64::NAN,
        }
    }
}

pub fn intensity_parameters(image: &[f64], mask: &[bool]) -> IntensityParameters {
    let values: Vec<f64> = (0..image.len()).filter(|&i| mask[i]).map(|i| image[i]).collect();
    if values.is_empty() {
        return IntensityParameters::nan();
    }

    let n = values.len() as f64;
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let mean = values.iter().sum::<f64>() / n;
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n;
    let m4 = values.iter().map(|v| (v - mean).powi(4)).sum::<f64>() / n;
    let std = m2.sqrt();

    IntensityParameters {
        intensity_max: max,
        intensity_mean: mean,
        intensity_std: std,
        intensity_skewness: m3 / std.powi(3),
        intensity_kurtosis: m4 / std.powi(4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_values_have_zero_std() {
        let image = vec![5.0; 10];
        let mask = vec![true; 10];
        let stats = intensity_parameters(&image, &mask);
        assert_abs_diff_eq!(stats.intensity_mean, 5.0);
        assert_abs_diff_eq!(stats.intensity_std, 0.0);
        assert_abs_diff_eq!(stats.intensity_max, 5.0);
    }

    #[test]
    fn empty_mask_is_nan() {
        let image = vec![0.0; 4];
        let mask = vec![false; 4];
        assert!(intensity_parameters(&image, &mask).intensity_mean.is_nan());
    }
}
