// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stereoscopic geometry reconstruction: combining several telescopes'
//! Hillas parameters into one shower direction and core.

mod atmosphere;
mod hillas_stereo;
mod registry;

use crate::event::{ArrayEvent, ReconstructedGeometry, SubarrayDescription, TelId};

pub use atmosphere::{AtmosphereModel, ExponentialAtmosphere};
pub use hillas_stereo::HillasReconstructor;
pub use registry::default_registry;

/// A pluggable stereo geometry reconstruction algorithm.
pub trait GeometryReconstructor {
    /// The name this reconstructor is registered and reported under.
    fn name(&self) -> &'static str;

    /// Reconstruct one event's shower geometry from the telescopes listed
    /// in `tel_ids`. Telescopes missing pointing, position or Hillas data
    /// are silently skipped; if fewer than two usable telescopes remain,
    /// the result has `is_valid = false`.
    fn reconstruct(
        &self,
        event: &ArrayEvent,
        subarray: &SubarrayDescription,
        tel_ids: &[TelId],
    ) -> ReconstructedGeometry;
}
