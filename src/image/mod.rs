// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [ImageParameters]: Hillas moments, leakage, concentration, morphology
//! and intensity statistics computed from a cleaned camera image, plus
//! the [ImageQuery] predicate language.

mod concentration;
mod hillas;
mod intensity;
mod leakage;
mod morphology;
mod parameters;
mod quality;

pub use concentration::ConcentrationParameters;
pub use hillas::{hillas_parameters, HillasParameters};
pub use intensity::IntensityParameters;
pub use leakage::LeakageParameters;
pub use morphology::MorphologyParameters;
pub use parameters::{compute_image_parameters, ExtraParameters, ImageParameters};
pub use quality::{ImageQuery, QualityPredicateError};
