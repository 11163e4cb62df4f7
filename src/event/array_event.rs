// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [ArrayEvent]: the shared in-memory event that carries data through the
//! R0 -> DL2 layers. Every layer is a tagged `Option`, populated as the
//! pipeline advances rather than modeled as a type hierarchy.

use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::image::ImageParameters;

use super::TelId;

/// Raw or partially-processed per-pixel waveform samples (R0/R1/DL0).
#[derive(Clone, Debug)]
pub struct WaveformTel {
    /// `(pixel, sample)` ADC (or calibrated) traces.
    pub samples: Array2<f32>,
}

/// A telescope's DL1 payload: the calibrated image, peak sample time, the
/// cleaning mask and (once computed) its image parameters.
#[derive(Clone, Debug)]
pub struct DL1Camera {
    pub image: Vec<f64>,
    pub peak_time: Vec<f64>,
    pub mask: Vec<bool>,
    pub image_parameters: Option<ImageParameters>,
}

impl DL1Camera {
    pub fn new(image: Vec<f64>, peak_time: Vec<f64>) -> Self {
        let n = image.len();
        Self {
            image,
            peak_time,
            mask: vec![false; n],
            image_parameters: None,
        }
    }
}

/// Per-telescope pointing direction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TelPointing {
    pub azimuth: f64,
    pub altitude: f64,
}

/// Array- and per-telescope pointing for one event.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pointing {
    pub array_altitude: f64,
    pub array_azimuth: f64,
    pub tels: IndexMap<TelId, TelPointing>,
}

/// One telescope's contribution to a reconstructed geometry: its
/// perpendicular distance to the reconstructed core ("impact parameter")
/// and the propagated uncertainty.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ImpactParameter {
    pub distance: f64,
    pub distance_error: f64,
}

/// A single reconstructor's output for one event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReconstructedGeometry {
    pub is_valid: bool,
    pub alt: f64,
    pub az: f64,
    pub alt_uncertainty: f64,
    pub az_uncertainty: f64,
    pub core_x: f64,
    pub core_y: f64,
    pub core_pos_error: f64,
    pub hmax: f64,
    pub xmax: f64,
    pub direction_error: Option<f64>,
    pub telescopes: Vec<TelId>,
}

impl ReconstructedGeometry {
    /// A result marking this reconstruction as failed (too few telescopes,
    /// parallel axes, numerical degeneracy).
    pub fn invalid(telescopes: Vec<TelId>) -> Self {
        Self {
            is_valid: false,
            alt: f64::NAN,
            az: f64::NAN,
            alt_uncertainty: f64::NAN,
            az_uncertainty: f64::NAN,
            core_x: f64::NAN,
            core_y: f64::NAN,
            core_pos_error: f64::NAN,
            hmax: f64::NAN,
            xmax: f64::NAN,
            direction_error: None,
            telescopes,
        }
    }
}

/// Per-telescope DL2 bookkeeping (impact parameters per reconstructor).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dl2Tel {
    pub impact_parameters: IndexMap<String, ImpactParameter>,
}

/// The DL2 layer: reconstructed geometries keyed by reconstructor name,
/// plus (if available) energy and particle-type estimates.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dl2 {
    pub geometry: IndexMap<String, ReconstructedGeometry>,
    pub energy: Option<f64>,
    pub particle: Option<String>,
    pub tels: IndexMap<TelId, Dl2Tel>,
}

/// Simulation truth for the whole shower.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SimulationShower {
    pub energy: f64,
    pub alt: f64,
    pub az: f64,
    pub core_x: f64,
    pub core_y: f64,
    pub h_first_int: f64,
    pub x_max: f64,
    pub shower_primary_id: u32,
}

/// Per-telescope simulation truth (the noiseless photo-electron image).
#[derive(Clone, Debug)]
pub struct SimulationTel {
    pub true_image: Vec<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct Simulation {
    pub shower: Option<SimulationShower>,
    pub tels: IndexMap<TelId, SimulationTel>,
}

/// Per-telescope monitoring data (calibration coefficients), the one
/// slowly-varying layer not produced per-event by this pipeline.
#[derive(Clone, Debug, Default)]
pub struct MonitorTel {
    pub pedestal: Vec<f64>,
    pub flatfield: Vec<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct Monitor {
    pub tels: IndexMap<TelId, MonitorTel>,
}

/// The event carried through the pipeline. Every data level is an optional,
/// per-telescope map except `dl2`, which is array-level with nested
/// per-telescope bookkeeping.
#[derive(Clone, Debug)]
pub struct ArrayEvent {
    pub event_id: u64,
    pub run_id: u64,
    pub r0: Option<IndexMap<TelId, WaveformTel>>,
    pub r1: Option<IndexMap<TelId, WaveformTel>>,
    pub dl0: Option<IndexMap<TelId, WaveformTel>>,
    pub dl1: Option<IndexMap<TelId, DL1Camera>>,
    pub dl2: Option<Dl2>,
    pub simulation: Option<Simulation>,
    pub pointing: Option<Pointing>,
    pub monitor: Option<Monitor>,
}

impl ArrayEvent {
    pub fn new(event_id: u64, run_id: u64) -> Self {
        Self {
            event_id,
            run_id,
            r0: None,
            r1: None,
            dl0: None,
            dl1: None,
            dl2: None,
            simulation: None,
            pointing: None,
            monitor: None,
        }
    }

    pub fn dl1_mut(&mut self) -> &mut IndexMap<TelId, DL1Camera> {
        self.dl1.get_or_insert_with(IndexMap::new)
    }

    pub fn dl2_mut(&mut self) -> &mut Dl2 {
        self.dl2.get_or_insert_with(Dl2::default)
    }
}
