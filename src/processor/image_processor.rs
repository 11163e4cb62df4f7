// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [ImageProcessor]: cleans each telescope's calibrated image and computes
//! its [ImageParameters].

use std::collections::HashMap;

use crate::cleaning::{dilate, CleaningError, ImageCleaner, Tailcuts};
use crate::config::ImageProcessorConfig;
use crate::event::{ArrayEvent, SubarrayDescription, TelId};
use crate::image::compute_image_parameters;

/// A small xorshift PRNG, seeded per telescope per event, used only to
/// resynthesize a Poisson-noised image from simulation truth.
struct XorShift64(u64);

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Knuth's algorithm. Fine for the photo-electron counts this pipeline
/// deals with; not meant for large `lambda`.
fn poisson_sample(rng: &mut XorShift64, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 0.0;
    }
    let l = (-lambda).exp();
    let mut k: i64 = 0;
    let mut p = 1.0;
    loop {
        k += 1;
        p *= rng.next_f64();
        if p <= l {
            break;
        }
    }
    (k - 1) as f64
}

/// Cleans, optionally dilates and optionally FOV-cuts each telescope's
/// image, then computes its [ImageParameters].
pub struct ImageProcessor {
    config: ImageProcessorConfig,
    cleaner: Tailcuts,
    /// Per-telescope FOV-cut exclusion mask (pixels beyond `cut_radius`),
    /// keyed by tel_id: a pure function of static camera geometry and
    /// config, so it is computed once and reused across events.
    fov_exclude_cache: HashMap<TelId, Vec<bool>>,
}

impl ImageProcessor {
    pub fn new(config: ImageProcessorConfig) -> Result<Self, CleaningError> {
        let cleaner = Tailcuts::new(config.tailcuts_cleaner)?;
        Ok(Self {
            config,
            cleaner,
            fov_exclude_cache: HashMap::new(),
        })
    }

    fn fov_exclude_mask<'a>(
        &'a mut self,
        tel_id: TelId,
        subarray: &SubarrayDescription,
    ) -> Option<&'a Vec<bool>> {
        if !self.config.fov_cut.cut_pixel_distance {
            return None;
        }
        if !self.fov_exclude_cache.contains_key(&tel_id) {
            let telescope = subarray.telescope(tel_id)?;
            let geom = &telescope.camera_description;
            let focal_length = self.config.fov_cut.focal_length;
            let cut_radius_rad = self.config.fov_cut.cut_radius.to_radians();
            let mask: Vec<bool> = geom
                .pix_x
                .iter()
                .zip(&geom.pix_y)
                .map(|(&x, &y)| {
                    let theta = (x / focal_length).hypot(y / focal_length);
                    theta > cut_radius_rad
                })
                .collect();
            self.fov_exclude_cache.insert(tel_id, mask);
        }
        self.fov_exclude_cache.get(&tel_id)
    }

    /// Clean `image` and compute parameters for one telescope, applying
    /// dilation and the FOV cut per configuration.
    fn clean_and_parameterize(
        &mut self,
        tel_id: TelId,
        subarray: &SubarrayDescription,
        image: &[f64],
    ) -> (Vec<bool>, crate::image::ImageParameters) {
        let telescope = subarray.telescope(tel_id).expect("telescope in subarray");
        let geom = &telescope.camera_description;

        let mut mask = self.cleaner.clean(geom, image);
        if self.config.dilate {
            mask = dilate(geom, &mask);
        }
        if let Some(exclude) = self.fov_exclude_mask(tel_id, subarray) {
            for (m, &excluded) in mask.iter_mut().zip(exclude) {
                if excluded {
                    *m = false;
                }
            }
        }

        let telescope = subarray.telescope(tel_id).expect("telescope in subarray");
        let params = compute_image_parameters(&telescope.camera_description, image, &mask);
        (mask, params)
    }

    /// Clean every telescope present in `event.dl1`, write back the
    /// resulting mask and [ImageParameters], and, when configured,
    /// replace the image with a Poisson-resynthesized one drawn from
    /// simulation truth first.
    pub fn process(&mut self, event: &mut ArrayEvent, subarray: &SubarrayDescription) {
        let tel_ids: Vec<TelId> = match &event.dl1 {
            Some(dl1) => dl1.keys().copied().collect(),
            None => return,
        };

        for tel_id in tel_ids {
            if let Some(lambda) = self.config.poisson_noise {
                if let Some(true_image) = event
                    .simulation
                    .as_ref()
                    .and_then(|sim| sim.tels.get(&tel_id))
                    .map(|t| t.true_image.clone())
                {
                    let mut rng = XorShift64::new(
                        event
                            .event_id
                            .wrapping_mul(2654435761)
                            .wrapping_add(tel_id as u64)
                            .wrapping_add(1),
                    );
                    let resynthesized: Vec<f64> = true_image
                        .iter()
                        .map(|&pe| pe + poisson_sample(&mut rng, lambda))
                        .collect();
                    if let Some(dl1) = event.dl1.as_mut() {
                        if let Some(camera) = dl1.get_mut(&tel_id) {
                            camera.image = resynthesized;
                        }
                    }
                }
            }

            let image = event
                .dl1
                .as_ref()
                .and_then(|dl1| dl1.get(&tel_id))
                .map(|c| c.image.clone());
            let Some(image) = image else { continue };

            let (mask, params) = self.clean_and_parameterize(tel_id, subarray, &image);

            if let Some(dl1) = event.dl1.as_mut() {
                if let Some(camera) = dl1.get_mut(&tel_id) {
                    camera.mask = mask;
                    camera.image_parameters = Some(params);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TailcutsConfig;
    use crate::event::{DL1Camera, OpticsDescription, Simulation, SimulationTel, TelescopeDescription};
    use crate::geom::CameraGeometry;
    use indexmap::IndexMap;

    fn subarray() -> SubarrayDescription {
        let mut telescopes = IndexMap::new();
        let mut positions = IndexMap::new();
        telescopes.insert(
            1u16,
            TelescopeDescription {
                camera_description: CameraGeometry::square_grid(5),
                optics_description: OpticsDescription {
                    mirror_area: 100.0,
                    equivalent_focal_length: 28.0,
                    effective_focal_length: 28.0,
                    num_mirrors: 1,
                    optics_name: "t".into(),
                },
            },
        );
        positions.insert(1u16, [0.0, 0.0, 0.0]);
        SubarrayDescription {
            name: "t".into(),
            reference_position: [0.0, 0.0, 0.0],
            telescopes,
            positions,
        }
    }

    fn config() -> ImageProcessorConfig {
        let mut config = ImageProcessorConfig::default();
        config.tailcuts_cleaner = TailcutsConfig {
            picture_thresh: 5.0,
            boundary_thresh: 2.0,
            keep_isolated_pixels: false,
            min_number_picture_neighbors: 0,
        };
        config
    }

    #[test]
    fn cleans_and_parameterizes_a_bright_center_pixel() {
        let mut processor = ImageProcessor::new(config()).unwrap();
        let mut event = ArrayEvent::new(0, 0);
        let image = vec![10.0; 25];
        let peak_time = vec![0.0; 25];
        event.dl1_mut().insert(1, DL1Camera::new(image, peak_time));

        processor.process(&mut event, &subarray());

        let camera = &event.dl1.unwrap()[&1];
        assert!(camera.mask.iter().all(|&m| m));
        let params = camera.image_parameters.unwrap();
        assert!(params.hillas.intensity > 0.0);
    }

    #[test]
    fn fov_cut_excludes_pixels_beyond_radius() {
        let mut config = config();
        config.fov_cut.cut_pixel_distance = true;
        config.fov_cut.cut_radius = 0.0001;
        config.fov_cut.focal_length = 28.0;
        let mut processor = ImageProcessor::new(config).unwrap();

        let mut event = ArrayEvent::new(0, 0);
        let image = vec![10.0; 25];
        let peak_time = vec![0.0; 25];
        event.dl1_mut().insert(1, DL1Camera::new(image, peak_time));

        processor.process(&mut event, &subarray());

        let camera = &event.dl1.unwrap()[&1];
        assert!(!camera.mask.iter().all(|&m| m));
    }

    #[test]
    fn poisson_resynthesis_overwrites_image_from_truth() {
        let mut config = config();
        config.poisson_noise = Some(1.0);
        let mut processor = ImageProcessor::new(config).unwrap();

        let mut event = ArrayEvent::new(0, 0);
        let image = vec![0.0; 25];
        let peak_time = vec![0.0; 25];
        event.dl1_mut().insert(1, DL1Camera::new(image, peak_time));
        let mut sim_tels = IndexMap::new();
        sim_tels.insert(
            1u16,
            SimulationTel {
                true_image: vec![20.0; 25],
            },
        );
        event.simulation = Some(Simulation {
            shower: None,
            tels: sim_tels,
        });

        processor.process(&mut event, &subarray());

        let camera = &event.dl1.unwrap()[&1];
        assert!(camera.image.iter().all(|&v| v > 0.0));
    }
}
