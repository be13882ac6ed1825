use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use pitaka_core::{Period, PeriodPolicy, SwipeConfig, DEFAULT_TREND_MONTHS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stats: StatsSection,
    pub swipe: SwipeSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSection {
    pub policy: PeriodPolicy,
    pub default_period: Period,
    /// IANA name; decides what "today" is.
    pub timezone: String,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            policy: PeriodPolicy::Calendar,
            default_period: Period::Month,
            timezone: "Asia/Manila".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeSection {
    pub jitter: f64,
    pub min_swipe_distance: f64,
    pub edit_threshold: f64,
    pub delete_threshold: f64,
    pub edit_delay_ms: u64,
    pub delete_delay_ms: u64,
}

impl Default for SwipeSection {
    fn default() -> Self {
        let d = SwipeConfig::default();
        Self {
            jitter: d.jitter,
            min_swipe_distance: d.min_swipe_distance,
            edit_threshold: d.edit_threshold,
            delete_threshold: d.delete_threshold,
            edit_delay_ms: d.edit_delay_ms,
            delete_delay_ms: d.delete_delay_ms,
        }
    }
}

impl From<&SwipeSection> for SwipeConfig {
    fn from(s: &SwipeSection) -> Self {
        SwipeConfig {
            jitter: s.jitter,
            min_swipe_distance: s.min_swipe_distance,
            edit_threshold: s.edit_threshold,
            delete_threshold: s.delete_threshold,
            edit_delay_ms: s.edit_delay_ms,
            delete_delay_ms: s.delete_delay_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub currency: String,
    pub trend_months: usize,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency: "₱".to_string(),
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }
}

impl Config {
    pub fn swipe_config(&self) -> SwipeConfig {
        SwipeConfig::from(&self.swipe)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stats.timezone.parse::<Tz>().is_err() {
            bail!("[stats] timezone is not a known IANA name: {}", self.stats.timezone);
        }
        let s = &self.swipe;
        for (name, value) in [
            ("jitter", s.jitter),
            ("min_swipe_distance", s.min_swipe_distance),
            ("edit_threshold", s.edit_threshold),
            ("delete_threshold", s.delete_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("[swipe] {name} must be a finite, non-negative number");
            }
        }
        if !(s.jitter < s.min_swipe_distance
            && s.min_swipe_distance <= s.edit_threshold
            && s.edit_threshold < s.delete_threshold)
        {
            bail!(
                "[swipe] thresholds must satisfy jitter < min_swipe_distance <= edit_threshold < delete_threshold"
            );
        }
        if self.display.trend_months == 0 {
            bail!("[display] trend_months must be at least 1");
        }
        Ok(())
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

/// Defaults when the file is absent.
pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).context("parse config.toml")?;
    cfg.validate().with_context(|| format!("invalid {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Returns the path and whether it was newly written.
pub fn init_config(home: &Path) -> Result<(PathBuf, bool)> {
    let p = config_path(home);
    if p.exists() {
        return Ok((p, false));
    }
    save_config(home, &Config::default())?;
    Ok((p, true))
}
