//! Configuration validation.
//!
//! Validates every config field up front so a monthly run fails fast on a
//! bad file instead of partway through the pipeline.

use crate::domain::error::GoldmonError;
use crate::ports::config_port::ConfigPort;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    validate_series_dir(config)?;
    validate_series_list(config)?;
    validate_cb_file(config)?;
    validate_staleness(config)?;
    validate_history_file(config)?;
    validate_engine(config)?;
    validate_scoring(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> GoldmonError {
    GoldmonError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn missing(section: &str, key: &str) -> GoldmonError {
    GoldmonError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn validate_series_dir(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    match config.get_string("data", "series_dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("data", "series_dir", "must not be empty")),
        None => Err(missing("data", "series_dir")),
    }
}

fn validate_series_list(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    if let Some(list) = config.get_string("data", "series") {
        let any_valid = list.split(',').any(|s| !s.trim().is_empty());
        if !any_valid {
            return Err(invalid("data", "series", "must list at least one series"));
        }
    }
    Ok(())
}

fn validate_cb_file(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    match config.get_string("central_bank", "data_file") {
        Some(path) if !path.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("central_bank", "data_file", "must not be empty")),
        None => Err(missing("central_bank", "data_file")),
    }
}

fn validate_staleness(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    let days = config.get_int("central_bank", "staleness_days", 90);
    if days <= 0 {
        return Err(invalid(
            "central_bank",
            "staleness_days",
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_history_file(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    match config.get_string("history", "data_file") {
        Some(path) if !path.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("history", "data_file", "must not be empty")),
        None => Err(missing("history", "data_file")),
    }
}

fn validate_engine(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    let lookback = config.get_int("engine", "change_lookback_days", 30);
    if lookback <= 0 {
        return Err(invalid("engine", "change_lookback_days", "must be positive"));
    }

    let window = config.get_int("engine", "zscore_window_days", 1825);
    if window <= 0 {
        return Err(invalid("engine", "zscore_window_days", "must be positive"));
    }

    let min_obs = config.get_int("engine", "zscore_min_observations", 30);
    if min_obs < 2 {
        return Err(invalid(
            "engine",
            "zscore_min_observations",
            "must be at least 2",
        ));
    }

    if let Some(horizons) = config.get_string("engine", "momentum_horizons") {
        for part in horizons.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.parse::<i64>() {
                Ok(days) if days > 0 => {}
                _ => {
                    return Err(invalid(
                        "engine",
                        "momentum_horizons",
                        "must be a comma-separated list of positive day counts",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_scoring(config: &dyn ConfigPort) -> Result<(), GoldmonError> {
    for key in [
        "real_yields_weight",
        "usd_strength_weight",
        "cb_buying_weight",
        "valuation_weight",
    ] {
        let weight = config.get_double("scoring", key, 1.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(invalid("scoring", key, "must be a non-negative number"));
        }
    }

    let sharp = config.get_double("scoring", "sharp_move_pct", 2.0);
    if !sharp.is_finite() || sharp <= 0.0 {
        return Err(invalid("scoring", "sharp_move_pct", "must be positive"));
    }

    let strong = config.get_double("scoring", "strong_buying_tonnes", 250.0);
    let moderate = config.get_double("scoring", "moderate_buying_tonnes", 100.0);
    if moderate <= 0.0 {
        return Err(invalid(
            "scoring",
            "moderate_buying_tonnes",
            "must be positive",
        ));
    }
    if strong <= moderate {
        return Err(invalid(
            "scoring",
            "strong_buying_tonnes",
            "must exceed moderate_buying_tonnes",
        ));
    }

    let overvalued = config.get_double("scoring", "overvalued_zscore", 1.5);
    let undervalued = config.get_double("scoring", "undervalued_zscore", -1.0);
    if overvalued <= undervalued {
        return Err(invalid(
            "scoring",
            "overvalued_zscore",
            "must exceed undervalued_zscore",
        ));
    }
    Ok(())
}
