// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-event processing stages between calibration and reconstruction:
//! [ImageProcessor] then [ShowerProcessor].

mod image_processor;
mod shower_processor;

pub use image_processor::ImageProcessor;
pub use shower_processor::ShowerProcessor;
