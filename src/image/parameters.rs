// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [ImageParameters]: the full set of per-telescope, per-event image
//! statistics, aggregating Hillas, leakage, concentration, morphology and
//! intensity into one record.

use serde::{Deserialize, Serialize};

use super::concentration::{concentration_parameters, ConcentrationParameters};
use super::hillas::{hillas_parameters, HillasParameters};
use super::intensity::{intensity_parameters, IntensityParameters};
use super::leakage::{leakage_parameters, LeakageParameters};
use super::morphology::{morphology_parameters, MorphologyParameters};
use crate::constants::MIN_PIXELS_FOR_HILLAS;
use crate::geom::CameraGeometry;

/// Truth-comparison fields, only populated when simulation truth is
/// available for the event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct ExtraParameters {
    pub miss: Option<f64>,
    pub disp: Option<f64>,
    pub theta: Option<f64>,
    pub true_psi: Option<f64>,
    pub cog_err: Option<f64>,
    pub beta_err: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageParameters {
    pub hillas: HillasParameters,
    pub leakage: LeakageParameters,
    pub concentration: ConcentrationParameters,
    pub morphology: MorphologyParameters,
    pub intensity: IntensityParameters,
    pub extra: ExtraParameters,
}

impl ImageParameters {
    /// All-NaN/zero parameters, used for a mask with fewer than
    /// [MIN_PIXELS_FOR_HILLAS] surviving pixels or non-positive intensity.
    pub fn invalid() -> Self {
        Self {
            hillas: HillasParameters::nan(),
            leakage: LeakageParameters::nan(),
            concentration: ConcentrationParameters::nan(),
            morphology: MorphologyParameters::zero(),
            intensity: IntensityParameters::nan(),
            extra: ExtraParameters::default(),
        }
    }
}

/// Compute the full set of image parameters over the cleaned `mask`. A
/// mask with fewer than three surviving pixels, or a non-positive
/// intensity sum, yields [ImageParameters::invalid].
pub fn compute_image_parameters(
    geom: &CameraGeometry,
    image: &[f64],
    mask: &[bool],
) -> ImageParameters {
    let n_mask = mask.iter().filter(|&&m| m).count();
    let w: f64 = (0..image.len()).filter(|&i| mask[i]).map(|i| image[i]).sum();
    if n_mask < MIN_PIXELS_FOR_HILLAS || !(w > 0.0) {
        return ImageParameters::invalid();
    }

    let hillas = hillas_parameters(geom, image, mask);
    let leakage = leakage_parameters(geom, image, mask);
    let concentration = concentration_parameters(geom, image, mask, &hillas);
    let morphology = morphology_parameters(geom, mask);
    let intensity = intensity_parameters(image, mask);

    ImageParameters {
        hillas,
        leakage,
        concentration,
        morphology,
        intensity,
        extra: ExtraParameters::default(),
    }
}
