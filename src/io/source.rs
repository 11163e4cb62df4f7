// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The [EventSource] contract: an iterable of [ArrayEvent]s plus the
//! array-level metadata that accompanies them. The real file-backed
//! sources are external collaborators; [SyntheticEventSource] exists to
//! exercise the contract and drive the pipeline in tests.

use indexmap::IndexMap;
use ndarray::Array2;

use crate::event::{
    ArrayEvent, Pointing, Simulation, SimulationShower, SimulationTel, SubarrayDescription,
    TelId, TelPointing, WaveformTel,
};

/// An iterable source of events, plus the metadata an [EventSource]
/// exposes once per run.
pub trait EventSource: Iterator<Item = ArrayEvent> {
    fn subarray(&self) -> &SubarrayDescription;
    fn simulation_config(&self) -> &serde_json::Value;
    fn atmosphere_model(&self) -> &str;
    fn metaparam(&self) -> &serde_json::Value;

    /// Bulk per-shower truth, independent of the per-event iteration.
    fn get_shower_array(&self) -> Vec<SimulationShower>;
}

/// A small xorshift PRNG, used only to scatter deterministic pulse shapes
/// and Poisson-like noise across synthetic waveforms without pulling in an
/// external RNG dependency for what is otherwise a fixed-seed fixture.
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

/// A synthetic source that manufactures a fixed number of events with a
/// single simulated point-source shower per event, for exercising the full
/// pipeline without a real instrument's data format.
pub struct SyntheticEventSource {
    subarray: SubarrayDescription,
    simulation_config: serde_json::Value,
    atmosphere_model: String,
    metaparam: serde_json::Value,
    n_events: u64,
    next_event: u64,
    n_samples: usize,
    true_alt: f64,
    true_az: f64,
    core_x: f64,
    core_y: f64,
}

impl SyntheticEventSource {
    pub fn new(subarray: SubarrayDescription, n_events: u64, n_samples: usize) -> Self {
        Self {
            subarray,
            simulation_config: serde_json::json!({"source": "synthetic"}),
            atmosphere_model: "ExponentialAtmosphere".to_string(),
            metaparam: serde_json::json!({}),
            n_events,
            next_event: 0,
            n_samples,
            true_alt: std::f64::consts::FRAC_PI_2 - 0.05,
            true_az: 0.0,
            core_x: 0.0,
            core_y: 0.0,
        }
    }

    fn synthesize(&self, event_id: u64) -> ArrayEvent {
        let mut event = ArrayEvent::new(event_id, 0);

        event.pointing = Some(Pointing {
            array_altitude: self.true_alt,
            array_azimuth: self.true_az,
            tels: self
                .subarray
                .tel_ids()
                .map(|tel_id| {
                    (
                        tel_id,
                        TelPointing {
                            azimuth: self.true_az,
                            altitude: self.true_alt,
                        },
                    )
                })
                .collect(),
        });

        let mut r1: IndexMap<TelId, WaveformTel> = IndexMap::new();
        let mut sim_tels: IndexMap<TelId, SimulationTel> = IndexMap::new();
        let mut rng = XorShift64::new(event_id.wrapping_mul(2654435761).wrapping_add(1));

        for tel_id in self.subarray.tel_ids() {
            let telescope = self.subarray.telescope(tel_id).unwrap();
            let n_pixels = telescope.camera_description.num_pixels;
            let mut waveforms = Array2::<f32>::zeros((n_pixels, self.n_samples));
            let mut true_image = vec![0.0; n_pixels];

            // A handful of pixels near the camera center carry a pulse;
            // everything else is zero baseline plus small dithered noise.
            for pix in 0..n_pixels.min(10) {
                let amplitude = 50.0 + 10.0 * rng.next_f64();
                true_image[pix] = amplitude;
                let peak_sample = self.n_samples / 2;
                for s in 0..self.n_samples {
                    let d = s as isize - peak_sample as isize;
                    waveforms[[pix, s]] = (amplitude * (-((d * d) as f64) / 8.0).exp()) as f32;
                }
            }
            for pix in n_pixels.min(10)..n_pixels {
                waveforms[[pix, self.n_samples / 2]] = (rng.next_f64() * 0.5) as f32;
            }

            r1.insert(tel_id, WaveformTel { samples: waveforms });
            sim_tels.insert(tel_id, SimulationTel { true_image });
        }
        event.r1 = Some(r1);

        event.simulation = Some(Simulation {
            shower: Some(SimulationShower {
                energy: 1.0,
                alt: self.true_alt,
                az: self.true_az,
                core_x: self.core_x,
                core_y: self.core_y,
                h_first_int: 15_000.0,
                x_max: 450.0,
                shower_primary_id: 0,
            }),
            tels: sim_tels,
        });

        event
    }
}

impl Iterator for SyntheticEventSource {
    type Item = ArrayEvent;

    fn next(&mut self) -> Option<ArrayEvent> {
        if self.next_event >= self.n_events {
            return None;
        }
        let event = self.synthesize(self.next_event);
        self.next_event += 1;
        Some(event)
    }
}

impl EventSource for SyntheticEventSource {
    fn subarray(&self) -> &SubarrayDescription {
        &self.subarray
    }

    fn simulation_config(&self) -> &serde_json::Value {
        &self.simulation_config
    }

    fn atmosphere_model(&self) -> &str {
        &self.atmosphere_model
    }

    fn metaparam(&self) -> &serde_json::Value {
        &self.metaparam
    }

    fn get_shower_array(&self) -> Vec<SimulationShower> {
        (0..self.n_events)
            .map(|_| SimulationShower {
                energy: 1.0,
                alt: self.true_alt,
                az: self.true_az,
                core_x: self.core_x,
                core_y: self.core_y,
                h_first_int: 15_000.0,
                x_max: 450.0,
                shower_primary_id: 0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{OpticsDescription, TelescopeDescription};
    use crate::geom::CameraGeometry;

    fn test_subarray() -> SubarrayDescription {
        let mut telescopes = IndexMap::new();
        let mut positions = IndexMap::new();
        telescopes.insert(
            1u16,
            TelescopeDescription {
                camera_description: CameraGeometry::square_grid(10),
                optics_description: OpticsDescription {
                    mirror_area: 100.0,
                    equivalent_focal_length: 28.0,
                    effective_focal_length: 29.0,
                    num_mirrors: 1,
                    optics_name: "test".into(),
                },
            },
        );
        positions.insert(1u16, [0.0, 0.0, 0.0]);
        SubarrayDescription {
            name: "test".into(),
            reference_position: [0.0, 0.0, 0.0],
            telescopes,
            positions,
        }
    }

    #[test]
    fn yields_exactly_n_events_then_stops() {
        let source = SyntheticEventSource::new(test_subarray(), 3, 40);
        let events: Vec<_> = source.collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_id, 0);
        assert_eq!(events[2].event_id, 2);
    }

    #[test]
    fn each_event_has_r1_and_simulation_for_every_telescope() {
        let source = SyntheticEventSource::new(test_subarray(), 1, 40);
        let event = source.into_iter().next().unwrap();
        assert!(event.r1.as_ref().unwrap().contains_key(&1));
        assert!(event.simulation.as_ref().unwrap().tels.contains_key(&1));
    }
}
