// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Atmosphere column-density models, used only to turn a shower-maximum
//! height into a slant depth (`xmax`). A full tabulated, site-specific
//! profile is an external concern; this crate only specifies the
//! interface and ships one simple concrete model to exercise it.

/// Vertical atmospheric column density above a given height.
pub trait AtmosphereModel {
    /// Vertical column density \[g/cm^2\] integrated from `height_m` to the
    /// top of the atmosphere.
    fn depth_at_height(&self, height_m: f64) -> f64;
}

/// The standard single-exponential approximation `X(h) = X0 * exp(-h/h0)`.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialAtmosphere {
    /// Vertical depth at sea level, g/cm^2.
    pub x0: f64,
    /// Scale height, meters.
    pub h0: f64,
}

impl Default for ExponentialAtmosphere {
    fn default() -> Self {
        Self {
            x0: 1036.0,
            h0: 8_000.0,
        }
    }
}

impl AtmosphereModel for ExponentialAtmosphere {
    fn depth_at_height(&self, height_m: f64) -> f64 {
        self.x0 * (-height_m / self.h0).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_decreases_with_height() {
        let atmo = ExponentialAtmosphere::default();
        assert!(atmo.depth_at_height(0.0) > atmo.depth_at_height(5_000.0));
        assert!(atmo.depth_at_height(5_000.0) > atmo.depth_at_height(20_000.0));
    }

    #[test]
    fn depth_at_zero_is_x0() {
        let atmo = ExponentialAtmosphere::default();
        assert_eq!(atmo.depth_at_height(0.0), atmo.x0);
    }
}
