// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Small numeric helpers shared across the pipeline: 2x2 eigendecomposition,
//! weighted moments and a clamped `acos`.

mod eigen2x2;
mod stats;

pub use eigen2x2::{eigen_sym_2x2, Eigen2x2};
pub use stats::{weighted_mean, weighted_moment};

/// `acos`, but with the argument clamped to `[-1, 1]` first. Floating-point
/// round-off can otherwise push an otherwise-valid argument just outside the
/// domain of `acos` and yield `NaN`.
pub fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}
