use anyhow::{Context, bail};
use log::LevelFilter;
use scores_api::filter::FilterSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const APP_DIR: &str = "sports-status";
const CONFIG_FILE: &str = "config.json";
pub const CONFIG_ENV: &str = "SPORTS_STATUS_CONFIG";

/// On-disk shape of `config.json`.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    event_cycle_period_seconds: f64,
    refresh_data_period_seconds: f64,
    #[serde(default)]
    filter: FilterSpec,
    #[serde(default)]
    log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub event_cycle_period: Duration,
    pub refresh_data_period: Duration,
    pub filter: Arc<FilterSpec>,
    pub source: PathBuf,
}

impl AppSettings {
    /// Read settings from `explicit`, or the first default location.
    pub fn load(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = explicit.unwrap_or_else(config_path);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::from_json(&raw, &path)
    }

    pub fn from_json(raw: &str, source: &Path) -> anyhow::Result<Self> {
        let file: ConfigFile = serde_json::from_str(raw)
            .with_context(|| format!("invalid config in {}", source.display()))?;

        let log_level = file
            .log_level
            .as_deref()
            .map(str::parse::<LevelFilter>)
            .transpose()
            .with_context(|| format!("invalid log_level in {}", source.display()))?;

        Ok(Self {
            full_screen: false,
            log_level,
            event_cycle_period: period("event_cycle_period_seconds", file.event_cycle_period_seconds)?,
            refresh_data_period: period("refresh_data_period_seconds", file.refresh_data_period_seconds)?,
            filter: Arc::new(file.filter),
            source: source.to_path_buf(),
        })
    }
}

fn period(key: &str, seconds: f64) -> anyhow::Result<Duration> {
    if !seconds.is_finite() || seconds <= 0.0 {
        bail!("{key} must be a positive number of seconds, got {seconds}");
    }
    Duration::try_from_secs_f64(seconds).with_context(|| format!("{key} is out of range"))
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join(APP_DIR).join(CONFIG_FILE);
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join(APP_DIR).join(CONFIG_FILE);
    }
    PathBuf::from(CONFIG_FILE)
}

/// Where downloaded team logos live.
pub fn logo_cache_root() -> PathBuf {
    if let Ok(cache_dir) = std::env::var("XDG_CACHE_HOME")
        && !cache_dir.trim().is_empty()
    {
        return PathBuf::from(cache_dir).join(APP_DIR).join("logos");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".cache").join(APP_DIR).join("logos");
    }
    std::env::temp_dir().join(APP_DIR).join("logos")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> anyhow::Result<AppSettings> {
        AppSettings::from_json(raw, Path::new("config.json"))
    }

    #[test]
    fn full_config_parses() {
        let settings = parse(
            r#"{
                "event_cycle_period_seconds": 7.5,
                "refresh_data_period_seconds": 60,
                "log_level": "debug",
                "filter": {"sports": [{"slug": "football", "leagues": [{"abbreviation": "NFL"}]}]}
            }"#,
        )
        .expect("config should parse");

        assert_eq!(settings.event_cycle_period, Duration::from_millis(7500));
        assert_eq!(settings.refresh_data_period, Duration::from_secs(60));
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
        assert_eq!(settings.filter.sports.len(), 1);
        assert!(!settings.full_screen);
    }

    #[test]
    fn filter_and_log_level_are_optional() {
        let settings = parse(r#"{"event_cycle_period_seconds": 5, "refresh_data_period_seconds": 30}"#)
            .expect("config should parse");
        assert!(settings.filter.sports.is_empty());
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn non_positive_periods_are_rejected() {
        let err = parse(r#"{"event_cycle_period_seconds": 0, "refresh_data_period_seconds": 30}"#)
            .unwrap_err();
        assert!(err.to_string().contains("event_cycle_period_seconds"), "got {err}");

        let err = parse(r#"{"event_cycle_period_seconds": 5, "refresh_data_period_seconds": -1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("refresh_data_period_seconds"), "got {err}");
    }

    #[test]
    fn example_config_parses() {
        let settings = parse(include_str!("../../config.example.json")).expect("example config");
        let pairs = scores_api::filter::sport_league_pairs(&settings.filter);
        assert_eq!(pairs.len(), 3);
        assert_eq!(settings.log_level, Some(LevelFilter::Info));
    }

    #[test]
    fn missing_period_is_an_error() {
        assert!(parse(r#"{"event_cycle_period_seconds": 5}"#).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = std::env::temp_dir().join("sports-status-no-such-dir").join("config.json");
        let err = AppSettings::load(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()), "got {err}");
    }
}
