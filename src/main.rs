// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Binary entry point: parse CLI arguments, load configuration, and run
//! [airshower::Pipeline] over each `-i`/`-o` pair.

use clap::Parser;
use log::{error, info};

use airshower::{AirshowerError, Args, Pipeline};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

fn setup_logging() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn run() -> Result<(), AirshowerError> {
    let args = Args::parse();
    let pairs = args.input_output_pairs()?;

    info!(
        "airshower {} ({})",
        built_info::PKG_VERSION,
        built_info::GIT_COMMIT_HASH.unwrap_or("unknown")
    );

    let config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            airshower::config::Config::from_json_str(&contents)?
        }
        None => airshower::config::Config::default(),
    };

    let mut had_failure = false;
    for (input, output) in pairs {
        info!("processing {} -> {}", input.display(), output.display());

        let mut config = config.clone();
        if let Some(max_leakage2) = args.max_leakage2 {
            config.shower_processor.override_max_leakage2(max_leakage2);
        }

        let source = match airshower::io::build_event_source(&input) {
            Ok(source) => source,
            Err(e) => {
                error!("could not build an event source from {}: {e}; skipping", input.display());
                had_failure = true;
                continue;
            }
        };

        let writer_backend = match airshower::io::build_writer(&config.data_writer.output_type, &output) {
            Some(writer) => writer,
            None => {
                error!(
                    "unrecognized output_type '{}'; skipping {}",
                    config.data_writer.output_type,
                    output.display()
                );
                had_failure = true;
                continue;
            }
        };

        let mut pipeline = Pipeline::new(config, writer_backend, args.telescope_ids.clone())?;
        match pipeline.run(source) {
            Ok(n) => info!("wrote {n} event(s) to {}", output.display()),
            Err(e) => {
                error!("processing {} failed: {e}", input.display());
                had_failure = true;
            }
        }
    }

    if had_failure {
        std::process::exit(1);
    }
    Ok(())
}

fn main() {
    setup_logging().expect("failed to initialize logging");
    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}
