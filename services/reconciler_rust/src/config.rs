use anyhow::{anyhow, Context, Result};
use statline_rust_core::MatcherConfig;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub candidates_path: PathBuf,
    pub reference_path: PathBuf,
    pub output_path: PathBuf,
    pub summary_path: Option<PathBuf>,

    pub categories_path: Option<PathBuf>,
    pub team_codes_path: Option<PathBuf>,

    pub matcher: MatcherConfig,
    pub tolerance: f64,
    pub parallel: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let candidates_path = PathBuf::from(
            env::var("RECON_CANDIDATES_PATH")
                .context("RECON_CANDIDATES_PATH must be set (computed stats CSV/TSV)")?,
        );
        let reference_path = PathBuf::from(
            env::var("RECON_REFERENCE_PATH")
                .context("RECON_REFERENCE_PATH must be set (reference stats CSV/TSV)")?,
        );
        let output_path = PathBuf::from(
            env::var("RECON_OUTPUT_PATH").unwrap_or_else(|_| "reconciliation.csv".to_string()),
        );
        let summary_path = parse_path_env("RECON_SUMMARY_PATH");

        let categories_path = parse_path_env("RECON_CATEGORIES_PATH");
        let team_codes_path = parse_path_env("RECON_TEAM_CODES_PATH");

        let defaults = MatcherConfig::default();
        let matcher = MatcherConfig {
            accept_threshold: parse_f64_env("RECON_ACCEPT_THRESHOLD", defaults.accept_threshold)?,
            disambiguation_threshold: parse_f64_env(
                "RECON_DISAMBIGUATION_THRESHOLD",
                defaults.disambiguation_threshold,
            )?,
        };
        matcher
            .validate()
            .context("RECON_ACCEPT_THRESHOLD / RECON_DISAMBIGUATION_THRESHOLD")?;

        let tolerance = parse_f64_env("RECON_TOLERANCE", 1e-6)?;
        if tolerance < 0.0 {
            return Err(anyhow!("Invalid RECON_TOLERANCE: {} (must be >= 0)", tolerance));
        }

        let parallel = parse_bool_env("RECON_PARALLEL", true);

        Ok(Self {
            candidates_path,
            reference_path,
            output_path,
            summary_path,
            categories_path,
            team_codes_path,
            matcher,
            tolerance,
            parallel,
        })
    }
}

fn parse_path_env(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
        .unwrap_or(default)
}

fn parse_f64_env(key: &str, default: f64) -> Result<f64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid {key}: {raw} (expected number)")),
        Err(_) => Ok(default),
    }
}
