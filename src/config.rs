use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3050";
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// JSON snapshot loaded into the stores at startup.
    pub seed_file: Option<PathBuf>,
    pub simulate_latency: bool,
    /// How far back prediction looks for check-ins.
    pub prediction_lookback_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3050)),
            seed_file: None,
            simulate_latency: false,
            prediction_lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("LUNA_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("LUNA_BIND_ADDR is not a socket address: {addr}"))?;
        }
        config.seed_file = lookup("LUNA_SEED_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        if let Some(flag) = lookup("LUNA_SIMULATE_LATENCY") {
            config.simulate_latency = parse_bool(&flag)
                .with_context(|| format!("LUNA_SIMULATE_LATENCY must be true or false, got {flag}"))?;
        }
        if let Some(days) = lookup("LUNA_PREDICTION_LOOKBACK_DAYS") {
            let days: i64 = days
                .parse()
                .with_context(|| format!("LUNA_PREDICTION_LOOKBACK_DAYS is not a number: {days}"))?;
            anyhow::ensure!(
                (1..=MAX_LOOKBACK_DAYS).contains(&days),
                "LUNA_PREDICTION_LOOKBACK_DAYS must be between 1 and {MAX_LOOKBACK_DAYS}"
            );
            config.prediction_lookback_days = days;
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.prediction_lookback_days, 90);
        assert!(!config.simulate_latency);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("LUNA_BIND_ADDR", "127.0.0.1:8080"),
            ("LUNA_SEED_FILE", "seed.json"),
            ("LUNA_SIMULATE_LATENCY", "yes"),
            ("LUNA_PREDICTION_LOOKBACK_DAYS", "120"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.seed_file, Some(PathBuf::from("seed.json")));
        assert!(config.simulate_latency);
        assert_eq!(config.prediction_lookback_days, 120);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("LUNA_BIND_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("LUNA_SIMULATE_LATENCY", "maybe")]).is_err());
        assert!(config_from(&[("LUNA_PREDICTION_LOOKBACK_DAYS", "0")]).is_err());
        assert!(config_from(&[("LUNA_PREDICTION_LOOKBACK_DAYS", "1000000000")]).is_err());
    }
}
