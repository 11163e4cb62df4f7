// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [ShowerProcessor]: selects contributing telescopes per reconstructor via
//! an [ImageQuery], runs each configured [GeometryReconstructor], and fills
//! in per-telescope impact parameters.

use std::collections::HashMap;

use itertools::Itertools;
use log::warn;

use crate::config::ShowerProcessorConfig;
use crate::event::{ArrayEvent, Dl2Tel, ImpactParameter, ReconstructedGeometry, SubarrayDescription, TelId};
use crate::image::{ImageQuery, QualityPredicateError};
use crate::reco::{default_registry, GeometryReconstructor};

/// Runs the configured [GeometryReconstructor]s over each event, selecting
/// contributing telescopes via each reconstructor's [ImageQuery].
pub struct ShowerProcessor {
    config: ShowerProcessorConfig,
    registry: HashMap<&'static str, fn() -> Box<dyn GeometryReconstructor>>,
    queries: HashMap<String, ImageQuery>,
}

impl ShowerProcessor {
    pub fn new(config: ShowerProcessorConfig) -> Result<Self, QualityPredicateError> {
        let mut queries = HashMap::new();
        for (name, reco_config) in config.reconstructors.iter() {
            queries.insert(name.clone(), ImageQuery::parse(&reco_config.image_query)?);
        }
        Ok(Self {
            config,
            registry: default_registry(),
            queries,
        })
    }

    /// Telescopes in `event.dl1` whose parameters satisfy `name`'s
    /// `ImageQuery`, in subarray iteration order.
    fn select_telescopes(&self, name: &str, event: &ArrayEvent, subarray: &SubarrayDescription) -> Vec<TelId> {
        let Some(query) = self.queries.get(name) else {
            return Vec::new();
        };
        let Some(dl1) = &event.dl1 else {
            return Vec::new();
        };
        subarray
            .tel_ids()
            .filter(|tel_id| {
                dl1.get(tel_id)
                    .and_then(|camera| camera.image_parameters.as_ref())
                    .map(|params| query.evaluate(params))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Perpendicular distance from `(tel_x, tel_y)` to the line through
    /// `(core_x, core_y)` along the shower axis projected onto the ground
    /// (the azimuth the shower arrives from), plus a propagated
    /// uncertainty from the core-position error.
    fn impact_parameter(geometry: &ReconstructedGeometry, tel_x: f64, tel_y: f64) -> ImpactParameter {
        // Ground-projected shower axis direction, pointing from the core
        // back along the incoming direction.
        let (dx, dy) = (
            geometry.az.cos() * geometry.alt.cos(),
            geometry.az.sin() * geometry.alt.cos(),
        );
        let norm = dx.hypot(dy);
        let (ux, uy) = if norm > 0.0 {
            (dx / norm, dy / norm)
        } else {
            (1.0, 0.0)
        };

        let (rx, ry) = (tel_x - geometry.core_x, tel_y - geometry.core_y);
        // Perpendicular component of (rx, ry) relative to the axis.
        let along = rx * ux + ry * uy;
        let perp_x = rx - along * ux;
        let perp_y = ry - along * uy;
        let distance = perp_x.hypot(perp_y);

        ImpactParameter {
            distance,
            distance_error: geometry.core_pos_error,
        }
    }

    /// Run every configured reconstructor over `event`, storing results in
    /// `event.dl2`.
    pub fn process(&self, event: &mut ArrayEvent, subarray: &SubarrayDescription) {
        let names = self.config.geometry_reconstruction_types.clone();
        for name in names {
            let Some(factory) = self.registry.get(name.as_str()) else {
                warn!(
                    "unrecognized geometry reconstructor '{name}'; available: {}",
                    self.registry.keys().sorted().join(", ")
                );
                continue;
            };
            let tel_ids = self.select_telescopes(&name, event, subarray);
            let reconstructor = factory();
            let geometry = reconstructor.reconstruct(event, subarray, &tel_ids);

            if geometry.is_valid {
                for &tel_id in &tel_ids {
                    let Some(position) = subarray.position(tel_id) else {
                        continue;
                    };
                    let impact = Self::impact_parameter(&geometry, position[0], position[1]);
                    let dl2 = event.dl2_mut();
                    dl2.tels
                        .entry(tel_id)
                        .or_insert_with(Dl2Tel::default)
                        .impact_parameters
                        .insert(name.clone(), impact);
                }
            }

            event.dl2_mut().geometry.insert(name, geometry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconstructorConfig;
    use crate::event::{DL1Camera, OpticsDescription, TelescopeDescription};
    use crate::geom::CameraGeometry;
    use crate::image::{compute_image_parameters, HillasParameters};
    use indexmap::IndexMap;

    fn subarray() -> SubarrayDescription {
        let mut telescopes = IndexMap::new();
        let mut positions = IndexMap::new();
        for (tel_id, x) in [(1u16, -50.0), (2u16, 50.0)] {
            telescopes.insert(
                tel_id,
                TelescopeDescription {
                    camera_description: CameraGeometry::square_grid(20),
                    optics_description: OpticsDescription {
                        mirror_area: 100.0,
                        equivalent_focal_length: 28.0,
                        effective_focal_length: 28.0,
                        num_mirrors: 1,
                        optics_name: "t".into(),
                    },
                },
            );
            positions.insert(tel_id, [x, 0.0, 0.0]);
        }
        SubarrayDescription {
            name: "t".into(),
            reference_position: [0.0, 0.0, 0.0],
            telescopes,
            positions,
        }
    }

    fn config() -> ShowerProcessorConfig {
        let mut config = ShowerProcessorConfig::default();
        config.geometry_reconstruction_types = vec!["HillasReconstructor".to_string()];
        let mut reco_config = ReconstructorConfig::default();
        reco_config.image_query = "hillas_intensity > 0".to_string();
        config
            .reconstructors
            .insert("HillasReconstructor".to_string(), reco_config);
        config
    }

    fn bright_image_camera(geom: &CameraGeometry, psi: f64) -> DL1Camera {
        let image = vec![20.0; geom.num_pixels];
        let peak_time = vec![0.0; geom.num_pixels];
        let mask = vec![true; geom.num_pixels];
        let mut hillas = HillasParameters::nan();
        hillas.intensity = 400.0;
        hillas.x = 0.0;
        hillas.y = 0.0;
        hillas.psi = psi;
        let mut params = compute_image_parameters(geom, &image, &mask);
        params.hillas = hillas;
        let mut camera = DL1Camera::new(image, peak_time);
        camera.mask = mask;
        camera.image_parameters = Some(params);
        camera
    }

    #[test]
    fn selects_only_telescopes_passing_the_query() {
        let array = subarray();
        let processor = ShowerProcessor::new(config()).unwrap();
        let mut event = ArrayEvent::new(0, 0);

        let geom = CameraGeometry::square_grid(20);
        let dl1 = event.dl1_mut();
        dl1.insert(1, bright_image_camera(&geom, 0.0));
        let mut dim = bright_image_camera(&geom, 0.0);
        dim.image_parameters.as_mut().unwrap().hillas.intensity = 0.0;
        dl1.insert(2, dim);

        let selected = processor.select_telescopes("HillasReconstructor", &event, &array);
        assert_eq!(selected, vec![1]);

        // Fewer than two usable telescopes: the reconstructor reports an
        // invalid geometry, so no impact parameters should be written.
        processor.process(&mut event, &array);
        let geometry = &event.dl2.as_ref().unwrap().geometry["HillasReconstructor"];
        assert!(!geometry.is_valid);
        assert!(event.dl2.as_ref().unwrap().tels.is_empty());
    }

    #[test]
    fn impact_parameter_is_zero_on_axis() {
        let geometry = ReconstructedGeometry {
            is_valid: true,
            alt: std::f64::consts::FRAC_PI_2,
            az: 0.0,
            alt_uncertainty: 0.0,
            az_uncertainty: 0.0,
            core_x: 0.0,
            core_y: 0.0,
            core_pos_error: 1.0,
            hmax: 0.0,
            xmax: 0.0,
            direction_error: None,
            telescopes: vec![1],
        };
        let impact = ShowerProcessor::impact_parameter(&geometry, 0.0, 0.0);
        assert!(impact.distance.abs() < 1e-9);
    }
}
