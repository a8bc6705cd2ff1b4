use std::env;
use std::process::ExitCode;

use tracing::{error, info, Level};

use seismichazard::attenuation::attenuationrelationship::AttenuationRelationship;
use seismichazard::attenuation::kemptonstewart2006::KemptonStewart2006;
use seismichazard::configuration::Configuration;
use seismichazard::magdist::gutenbergrichtermagfreqdist::GutenbergRichterMagFreqDist;
use seismichazard::manager::manager::IManager;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = Configuration::new();
    if let Some(config_path) = env::args().nth(1) {
        if let Err(err) = config.from_reader(&config_path) {
            error!(path = %config_path, %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
        info!(path = %config_path, "configuration loaded");
    }

    let mut mfds: Vec<(String, GutenbergRichterMagFreqDist)> = Vec::new();
    let mfd_names = config.mag_freq_dist_manager().names();
    for name in mfd_names {
        match config.mag_freq_dist_manager().get(&name) {
            Ok(mfd) => mfds.push((name, mfd)),
            Err(err) => error!(%err, "lookup failed")
        }
    }
    if mfds.is_empty() {
        match GutenbergRichterMagFreqDist::new(1.0, 0.05, 5.05, 7.95, 30) {
            Ok(mfd) => mfds.push(("default".to_owned(), mfd)),
            Err(err) => {
                error!(%err, "failed to build distribution");
                return ExitCode::FAILURE;
            }
        }
    }
    for (name, mfd) in &mfds {
        println!(
            "{}: a = {:.4}, b = {:.4}, M [{:.4}, {:.4}] x {}, rate = {:.6e}/yr, moment rate = {:.6e} dyne-cm/yr",
            name,
            mfd.a_value(),
            mfd.b_value(),
            mfd.mag_lower(),
            mfd.mag_upper(),
            mfd.num(),
            mfd.tot_cum_rate(),
            mfd.total_moment_rate()
        );
    }

    let mut models: Vec<(String, KemptonStewart2006)> = Vec::new();
    let model_names = config.attenuation_manager().names();
    for name in model_names {
        match config.attenuation_manager().get(&name) {
            Ok(model) => models.push((name, model)),
            Err(err) => error!(%err, "lookup failed")
        }
    }
    if models.is_empty() {
        models.push(("default".to_owned(), KemptonStewart2006::new()));
    }
    for (name, model) in &models {
        println!("{} ({}, {})", name, model.short_name(), model.intensity_measure());
        for rrup in [0.0, 10.0, 50.0] {
            let medians: Vec<String> = [5.0, 6.0, 7.0, 8.0]
                .iter()
                .map(|&mag| format!("{:8.3}", model.median_at(mag, rrup, model.vs30())))
                .collect();
            println!("  Rrup {:5.1} km: {}", rrup, medians.join(" "));
        }
    }
    ExitCode::SUCCESS
}
