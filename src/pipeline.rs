// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [Pipeline]: wires [crate::calibrate], [crate::processor] and
//! [crate::io] together and drives one run over an [EventSource].

use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

use crate::calibrate::{Calibrator, LocalPeakExtractor};
use crate::config::Config;
use crate::error::AirshowerError;
use crate::event::{ArrayEvent, DL1Camera, SubarrayDescription, TelId};
use crate::io::{DataWriter, EventSource, Writer};
use crate::processor::{ImageProcessor, ShowerProcessor};

/// One end-to-end run: calibrate, parameterize, reconstruct, write.
pub struct Pipeline {
    calibrator: LocalPeakExtractor,
    image_processor: ImageProcessor,
    shower_processor: ShowerProcessor,
    writer: DataWriter,
    /// Telescopes to restrict processing to (the CLI `-s` flag). `None`
    /// means every telescope present in the event.
    telescope_filter: Option<Vec<TelId>>,
}

/// Calibrate, clean, parameterize and reconstruct one event that already
/// carries R1 waveforms. A free function, not a method, so the caller can
/// hold an exclusive borrow of `writer` (a sibling field of [Pipeline])
/// concurrently via [scopeguard].
fn process_event(
    calibrator: &LocalPeakExtractor,
    image_processor: &mut ImageProcessor,
    shower_processor: &ShowerProcessor,
    telescope_filter: &Option<Vec<TelId>>,
    event: &mut ArrayEvent,
    subarray: &SubarrayDescription,
) {
    let included = |tel_id: TelId| telescope_filter.as_ref().map(|ids| ids.contains(&tel_id)).unwrap_or(true);

    if let Some(r1) = &event.r1 {
        let mut dl1: IndexMap<TelId, DL1Camera> = IndexMap::new();
        for (&tel_id, waveform) in r1.iter() {
            if !included(tel_id) {
                continue;
            }
            let (image, peak_time) = calibrator.extract(&waveform.samples);
            dl1.insert(tel_id, DL1Camera::new(image, peak_time));
        }
        event.dl0 = None;
        event.dl1 = Some(dl1);
    }

    image_processor.process(event, subarray);
    shower_processor.process(event, subarray);
}

impl Pipeline {
    pub fn new(
        config: Config,
        writer_backend: Box<dyn Writer>,
        telescope_filter: Option<Vec<TelId>>,
    ) -> Result<Self, AirshowerError> {
        let calibrator = LocalPeakExtractor::new(config.calibrator.local_peak_extractor);
        let image_processor = ImageProcessor::new(config.image_processor)?;
        let shower_processor = ShowerProcessor::new(config.shower_processor)?;
        let writer = DataWriter::new(writer_backend, config.data_writer);
        Ok(Self {
            calibrator,
            image_processor,
            shower_processor,
            writer,
            telescope_filter,
        })
    }

    /// Drive the whole pipeline over `source`, writing every processed
    /// event through the configured [DataWriter]. A failure to write one
    /// event is logged and that event is skipped; everything else
    /// propagates and aborts the run, still closing the writer first.
    pub fn run<S: EventSource>(&mut self, mut source: S) -> Result<u64, AirshowerError> {
        let subarray = source.subarray().clone();
        self.writer.open(
            &subarray,
            source.simulation_config(),
            source.atmosphere_model(),
        )?;

        let Pipeline {
            calibrator,
            image_processor,
            shower_processor,
            writer,
            telescope_filter,
        } = self;

        // Close the writer even if an error propagates out of this
        // function before reaching the ordinary `close()` call below.
        let mut guard = scopeguard::guard(writer, |writer| {
            let _ = writer.close();
        });

        let progress = ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{msg:17}: {spinner} {pos} event(s) ({elapsed_precise})")
                .unwrap(),
        );
        progress.set_message("Processing");

        let mut n_processed = 0u64;
        while let Some(mut event) = source.next() {
            process_event(calibrator, image_processor, shower_processor, telescope_filter, &mut event, &subarray);

            match guard.write_event(&event) {
                Ok(()) => n_processed += 1,
                Err(e) => warn!("failed to write event {}: {e}; skipping", event.event_id),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        scopeguard::ScopeGuard::into_inner(guard).close()?;
        Ok(n_processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{OpticsDescription, TelescopeDescription};
    use crate::geom::CameraGeometry;
    use crate::io::{MemoryWriter, SyntheticEventSource};

    fn subarray() -> SubarrayDescription {
        let mut telescopes = IndexMap::new();
        let mut positions = IndexMap::new();
        for (tel_id, x) in [(1u16, -50.0), (2u16, 50.0)] {
            telescopes.insert(
                tel_id,
                TelescopeDescription {
                    camera_description: CameraGeometry::square_grid(10),
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

    #[test]
    fn runs_synthetic_events_end_to_end() {
        let config = Config::default();
        let writer: Box<dyn Writer> = Box::new(MemoryWriter::new());
        let mut pipeline = Pipeline::new(config, writer, None).unwrap();
        let source = SyntheticEventSource::new(subarray(), 3, 40);

        let n = pipeline.run(source).unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn telescope_filter_runs_without_error() {
        let config = Config::default();
        let writer: Box<dyn Writer> = Box::new(MemoryWriter::new());
        let mut pipeline = Pipeline::new(config, writer, Some(vec![1])).unwrap();
        let source = SyntheticEventSource::new(subarray(), 1, 40);

        pipeline.run(source).unwrap();
    }
}
