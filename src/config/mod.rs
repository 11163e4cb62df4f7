// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The root JSON configuration, deserialized once at startup. Every
//! section has sensible defaults so an empty `{}` config is valid.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cleaning::TailcutsConfig;

/// `calibrator.LocalPeakExtractor`: a fixed charge-extraction window
/// around each pixel's peak sample.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalPeakExtractorConfig {
    pub window_shift: i32,
    pub window_width: i32,
    pub apply_correction: bool,
}

impl Default for LocalPeakExtractorConfig {
    fn default() -> Self {
        Self {
            window_shift: 3,
            window_width: 7,
            apply_correction: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratorConfig {
    pub image_extractor_type: String,
    #[serde(rename = "LocalPeakExtractor")]
    pub local_peak_extractor: LocalPeakExtractorConfig,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            image_extractor_type: "LocalPeakExtractor".to_string(),
            local_peak_extractor: LocalPeakExtractorConfig::default(),
        }
    }
}

/// An optional field-of-view radial cut applied after parameterization.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FovCutConfig {
    pub cut_pixel_distance: bool,
    /// Degrees.
    pub cut_radius: f64,
    pub focal_length: f64,
}

impl Default for FovCutConfig {
    fn default() -> Self {
        Self {
            cut_pixel_distance: false,
            cut_radius: 2.5,
            focal_length: 28.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProcessorConfig {
    /// Expected photo-electron variance added to a simulation-only
    /// resynthesized image. `None` disables it.
    pub poisson_noise: Option<f64>,
    pub image_cleaner_type: String,
    #[serde(rename = "TailcutsCleaner")]
    pub tailcuts_cleaner: TailcutsConfig,
    pub dilate: bool,
    pub fov_cut: FovCutConfig,
}

impl Default for ImageProcessorConfig {
    fn default() -> Self {
        Self {
            poisson_noise: None,
            image_cleaner_type: "Tailcuts_cleaner".to_string(),
            tailcuts_cleaner: TailcutsConfig {
                picture_thresh: 10.0,
                boundary_thresh: 5.0,
                keep_isolated_pixels: false,
                min_number_picture_neighbors: 1,
            },
            dilate: false,
            fov_cut: FovCutConfig::default(),
        }
    }
}

/// One entry of `shower_processor.GeometryReconstructionTypes`: a
/// reconstructor name paired with its telescope-selection predicate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReconstructorConfig {
    #[serde(rename = "ImageQuery")]
    pub image_query: String,
    #[serde(default)]
    pub use_fake_hillas: bool,
}

impl Default for ReconstructorConfig {
    fn default() -> Self {
        Self {
            image_query: "hillas_intensity > 50 && morphology_n_pixels >= 3".to_string(),
            use_fake_hillas: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowerProcessorConfig {
    #[serde(rename = "GeometryReconstructionTypes")]
    pub geometry_reconstruction_types: Vec<String>,
    pub reconstructors: IndexMap<String, ReconstructorConfig>,
}

impl Default for ShowerProcessorConfig {
    fn default() -> Self {
        let mut reconstructors = IndexMap::new();
        reconstructors.insert("HillasReconstructor".to_string(), ReconstructorConfig::default());
        Self {
            geometry_reconstruction_types: vec!["HillasReconstructor".to_string()],
            reconstructors,
        }
    }
}

impl ShowerProcessorConfig {
    /// Apply the CLI `-l` override to every configured reconstructor's
    /// quality predicate, appending an
    /// `&& leakage_intensity_width_2 < value` clause.
    pub fn override_max_leakage2(&mut self, max_leakage2: f64) {
        for reco in self.reconstructors.values_mut() {
            reco.image_query = format!(
                "({}) && leakage_intensity_width_2 < {max_leakage2}",
                reco.image_query
            );
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DataWriterConfig {
    pub output_type: String,
    pub overwrite: bool,
    pub write_r0: bool,
    pub write_r1: bool,
    pub write_dl0: bool,
    pub write_dl1: bool,
    pub write_dl1_image: bool,
    pub write_dl2: bool,
    pub write_simulation_shower: bool,
    pub write_simulated_camera: bool,
    pub write_monitor: bool,
    pub write_pointing: bool,
    pub write_subarray: bool,
    pub write_simulation_config: bool,
    pub write_atmosphere_model: bool,
    pub write_metaparam: bool,
}

impl Default for DataWriterConfig {
    fn default() -> Self {
        Self {
            output_type: "jsonl".to_string(),
            overwrite: false,
            write_r0: false,
            write_r1: false,
            write_dl0: false,
            write_dl1: true,
            write_dl1_image: true,
            write_dl2: true,
            write_simulation_shower: true,
            write_simulated_camera: false,
            write_monitor: false,
            write_pointing: true,
            write_subarray: true,
            write_simulation_config: true,
            write_atmosphere_model: true,
            write_metaparam: true,
        }
    }
}

/// The root configuration document: `{calibrator, image_processor,
/// shower_processor, data_writer}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calibrator: CalibratorConfig,
    pub image_processor: ImageProcessorConfig,
    pub shower_processor: ShowerProcessorConfig,
    pub data_writer: DataWriterConfig,
}

impl Config {
    pub fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}
