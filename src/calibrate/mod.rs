// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Waveform-to-image calibration: the first pipeline stage, turning raw
//! per-pixel samples (R1) into a calibrated image and peak time (DL1).

use ndarray::Array2;

use crate::config::LocalPeakExtractorConfig;

/// Extracts a per-pixel charge and timing estimate from a waveform.
pub trait Calibrator {
    /// Given `(pixel, sample)` waveforms, return `(image, peak_time)`.
    fn extract(&self, waveforms: &Array2<f32>) -> (Vec<f64>, Vec<f64>);
}

/// A fixed window around each pixel's peak sample, summed to estimate
/// charge (`calibrator.LocalPeakExtractor`).
pub struct LocalPeakExtractor {
    pub config: LocalPeakExtractorConfig,
}

impl LocalPeakExtractor {
    pub fn new(config: LocalPeakExtractorConfig) -> Self {
        Self { config }
    }
}

impl Calibrator for LocalPeakExtractor {
    fn extract(&self, waveforms: &Array2<f32>) -> (Vec<f64>, Vec<f64>) {
        let (n_pixels, n_samples) = waveforms.dim();
        let mut image = vec![0.0; n_pixels];
        let mut peak_time = vec![0.0; n_pixels];

        for pix in 0..n_pixels {
            let trace = waveforms.row(pix);
            let (peak_sample, _) = trace
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .unwrap_or((0, &0.0));

            let lo = peak_sample.saturating_sub(self.config.window_shift.max(0) as usize);
            let hi = (peak_sample + self.config.window_width.max(0) as usize).min(n_samples);

            let mut sum = 0.0f64;
            let mut weighted_time = 0.0f64;
            for s in lo..hi {
                let v = trace[s] as f64;
                sum += v;
                weighted_time += v * s as f64;
            }

            let charge = if self.config.apply_correction && hi > lo {
                // Rescale by the fraction of a full window actually
                // integrated, to correct for windows truncated at the
                // edge of the trace.
                let full_width = (self.config.window_shift.max(0) + self.config.window_width.max(0)) as f64;
                let actual_width = (hi - lo) as f64;
                if actual_width > 0.0 {
                    sum * (full_width / actual_width)
                } else {
                    sum
                }
            } else {
                sum
            };

            image[pix] = charge;
            peak_time[pix] = if sum.abs() > 1e-12 {
                weighted_time / sum
            } else {
                peak_sample as f64
            };
        }

        (image, peak_time)
    }
}
