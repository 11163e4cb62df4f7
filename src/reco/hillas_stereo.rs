// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stereoscopic Hillas reconstruction: intersect per-telescope image axes
//! to get a direction, weighted-least-squares the ground axes to get a
//! core position.

use crate::constants::PARALLEL_AXIS_EPSILON;
use crate::coord::{camera_to_nominal, nominal_to_sky, HorizontalCoord, NominalCoord};
use crate::event::{ArrayEvent, ReconstructedGeometry, SubarrayDescription, TelId};
use crate::image::{hillas_parameters, HillasParameters};
use crate::math::eigen_sym_2x2;

use super::atmosphere::{AtmosphereModel, ExponentialAtmosphere};
use super::GeometryReconstructor;

/// One telescope's contribution, already projected into the array's
/// common nominal frame.
struct Observation {
    tel_id: TelId,
    intensity: f64,
    /// Image centroid in the array nominal frame, radians.
    nominal: NominalCoord,
    /// Unit major-axis direction in the array nominal frame.
    axis: (f64, f64),
    /// Ground position, meters.
    ground: (f64, f64, f64),
    /// Telescope pointing, used to project the image axis to the ground.
    pointing: HorizontalCoord,
    psi: f64,
}

/// The sole production [GeometryReconstructor]: pairwise axis intersection
/// for direction, weighted least squares for core position.
pub struct HillasReconstructor {
    /// When set, each telescope's *measured* Hillas parameters are replaced
    /// by parameters recomputed from its noiseless simulation-truth image,
    /// to validate the stereo math independent of image-parameterization
    /// error.
    pub use_fake_hillas: bool,
    pub atmosphere: Box<dyn AtmosphereModel + Send + Sync>,
}

impl Default for HillasReconstructor {
    fn default() -> Self {
        Self {
            use_fake_hillas: false,
            atmosphere: Box::new(ExponentialAtmosphere::default()),
        }
    }
}

impl GeometryReconstructor for HillasReconstructor {
    fn name(&self) -> &'static str {
        "HillasReconstructor"
    }

    fn reconstruct(
        &self,
        event: &ArrayEvent,
        subarray: &SubarrayDescription,
        tel_ids: &[TelId],
    ) -> ReconstructedGeometry {
        let array_pointing = match &event.pointing {
            Some(p) => HorizontalCoord::new(p.array_altitude, p.array_azimuth),
            None => return ReconstructedGeometry::invalid(tel_ids.to_vec()),
        };

        let mut observations = Vec::new();
        for &tel_id in tel_ids {
            let Some(telescope) = subarray.telescope(tel_id) else {
                continue;
            };
            let Some(position) = subarray.position(tel_id) else {
                continue;
            };
            let Some(tel_pointing) = event
                .pointing
                .as_ref()
                .and_then(|p| p.tels.get(&tel_id))
                .map(|t| HorizontalCoord::new(t.altitude, t.azimuth))
            else {
                continue;
            };

            let hillas = if self.use_fake_hillas {
                let true_image = match event
                    .simulation
                    .as_ref()
                    .and_then(|s| s.tels.get(&tel_id))
                    .map(|t| &t.true_image)
                {
                    Some(img) => img,
                    None => continue,
                };
                let mask: Vec<bool> = true_image.iter().map(|&v| v > 0.0).collect();
                hillas_parameters(&telescope.camera_description, true_image, &mask)
            } else {
                match event
                    .dl1
                    .as_ref()
                    .and_then(|m| m.get(&tel_id))
                    .and_then(|c| c.image_parameters.as_ref())
                    .map(|p| p.hillas)
                {
                    Some(h) => h,
                    None => continue,
                }
            };
            if !(hillas.intensity > 0.0) {
                continue;
            }

            let efl = telescope.optics_description.effective_focal_length;
            let (nominal, axis) =
                camera_to_nominal(hillas.x, hillas.y, hillas.psi, efl, tel_pointing, array_pointing);

            observations.push(Observation {
                tel_id,
                intensity: hillas.intensity,
                nominal,
                axis,
                ground: (position[0], position[1], position[2]),
                pointing: tel_pointing,
                psi: hillas.psi,
            });
        }

        if observations.len() < 2 {
            return ReconstructedGeometry::invalid(tel_ids.to_vec());
        }

        let direction = match reconstruct_direction(&observations, array_pointing) {
            Some(d) => d,
            None => return ReconstructedGeometry::invalid(tel_ids.to_vec()),
        };

        let core = match reconstruct_core(&observations) {
            Some(c) => c,
            None => return ReconstructedGeometry::invalid(tel_ids.to_vec()),
        };

        let hmax = reconstruct_hmax(&observations, direction.alt, direction.az, core.0, core.1);
        let slant_factor = if direction.alt.sin() > 1e-6 {
            1.0 / direction.alt.sin()
        } else {
            f64::NAN
        };
        let xmax = self.atmosphere.depth_at_height(hmax) * slant_factor;

        let direction_error = event
            .simulation
            .as_ref()
            .and_then(|s| s.shower)
            .map(|truth| {
                let true_dir = HorizontalCoord::new(truth.alt, truth.az);
                HorizontalCoord::new(direction.alt, direction.az).separation(&true_dir)
            });

        ReconstructedGeometry {
            is_valid: true,
            alt: direction.alt,
            az: direction.az,
            alt_uncertainty: direction.alt_uncertainty,
            az_uncertainty: direction.az_uncertainty,
            core_x: core.0,
            core_y: core.1,
            core_pos_error: core.2,
            hmax,
            xmax,
            direction_error,
            telescopes: observations.iter().map(|o| o.tel_id).collect(),
        }
    }
}

struct DirectionEstimate {
    alt: f64,
    az: f64,
    alt_uncertainty: f64,
    az_uncertainty: f64,
}

fn line_intersection(
    p_a: NominalCoord,
    d_a: (f64, f64),
    p_b: NominalCoord,
    d_b: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let cross = d_a.0 * d_b.1 - d_a.1 * d_b.0;
    let sin2 = cross * cross;
    if sin2 < PARALLEL_AXIS_EPSILON {
        return None;
    }
    let t = ((p_b.xi - p_a.xi) * d_b.1 - (p_b.eta - p_a.eta) * d_b.0) / cross;
    let xi = p_a.xi + t * d_a.0;
    let eta = p_a.eta + t * d_a.1;
    Some((xi, eta, sin2))
}

fn reconstruct_direction(
    observations: &[Observation],
    array_pointing: HorizontalCoord,
) -> Option<DirectionEstimate> {
    let mut weighted_xi = 0.0;
    let mut weighted_eta = 0.0;
    let mut weight_sum = 0.0;
    let mut points = Vec::new();

    for i in 0..observations.len() {
        for j in (i + 1)..observations.len() {
            let a = &observations[i];
            let b = &observations[j];
            if let Some((xi, eta, sin2)) =
                line_intersection(a.nominal, a.axis, b.nominal, b.axis)
            {
                let w = a.intensity * b.intensity * sin2;
                weighted_xi += w * xi;
                weighted_eta += w * eta;
                weight_sum += w;
                points.push((xi, eta, w));
            }
        }
    }

    if !(weight_sum > 0.0) {
        return None;
    }

    let xi_hat = weighted_xi / weight_sum;
    let eta_hat = weighted_eta / weight_sum;
    let mean = nominal_to_sky(NominalCoord::new(xi_hat, eta_hat), array_pointing);

    let mut var_alt = 0.0;
    let mut var_az = 0.0;
    for (xi, eta, w) in &points {
        let sky = nominal_to_sky(NominalCoord::new(*xi, *eta), array_pointing);
        let d_alt = sky.alt - mean.alt;
        let d_az = (sky.az - mean.az) * mean.alt.cos();
        var_alt += w * d_alt * d_alt;
        var_az += w * d_az * d_az;
    }
    var_alt /= weight_sum;
    var_az /= weight_sum;

    Some(DirectionEstimate {
        alt: mean.alt,
        az: mean.az,
        alt_uncertainty: var_alt.sqrt(),
        az_uncertainty: var_az.sqrt(),
    })
}

fn reconstruct_core(observations: &[Observation]) -> Option<(f64, f64, f64)> {
    let mut m_xx = 0.0;
    let mut m_xy = 0.0;
    let mut m_yy = 0.0;
    let mut b_x = 0.0;
    let mut b_y = 0.0;

    for obs in observations {
        let theta = obs.pointing.az + obs.psi;
        let (nx, ny) = (theta.cos(), theta.sin());
        let w = obs.intensity;
        // Projector (I - n n^T) removes the component along the axis,
        // leaving only the perpendicular-distance penalty.
        let pxx = 1.0 - nx * nx;
        let pxy = -nx * ny;
        let pyy = 1.0 - ny * ny;

        m_xx += w * pxx;
        m_xy += w * pxy;
        m_yy += w * pyy;
        b_x += w * (pxx * obs.ground.0 + pxy * obs.ground.1);
        b_y += w * (pxy * obs.ground.0 + pyy * obs.ground.1);
    }

    let eigen = eigen_sym_2x2(m_xx, m_xy, m_yy);
    if !(eigen.lambda2 > 0.0) {
        return None;
    }
    if eigen.lambda1 / eigen.lambda2 > crate::constants::MAX_CONDITION_NUMBER {
        return None;
    }

    let det = m_xx * m_yy - m_xy * m_xy;
    if det.abs() < 1e-300 {
        return None;
    }
    let core_x = (b_x * m_yy - b_y * m_xy) / det;
    let core_y = (m_xx * b_y - m_xy * b_x) / det;
    let core_pos_error = (1.0 / eigen.lambda2).sqrt();

    Some((core_x, core_y, core_pos_error))
}

fn reconstruct_hmax(observations: &[Observation], alt: f64, az: f64, core_x: f64, core_y: f64) -> f64 {
    let (ux, uy, uz) = (alt.cos() * az.cos(), alt.cos() * az.sin(), alt.sin());
    let denom = ux * ux + uy * uy;
    if denom < 1e-12 {
        return f64::NAN;
    }

    let mut weighted_h = 0.0;
    let mut weight_sum = 0.0;
    for obs in observations {
        let s = ((core_x - obs.ground.0) * ux + (core_y - obs.ground.1) * uy) / denom;
        let h = obs.ground.2 + s * uz;
        weighted_h += obs.intensity * h;
        weight_sum += obs.intensity;
    }
    if weight_sum > 0.0 {
        weighted_h / weight_sum
    } else {
        f64::NAN
    }
}
