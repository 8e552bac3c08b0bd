use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use clap::Parser;

use cgo_core::quota::{QuotaPolicy, DAILY_LIMIT};
use cgo_core::storage::default_data_dir;

/// CGO task triage HTTP service.
#[derive(Debug, Clone, Parser)]
#[command(name = "cgo-server")]
#[command(about = "Classify pasted todo lines into Core, Growth and Optional")]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "CGO_BIND", default_value = "127.0.0.1:8787")]
    pub bind: SocketAddr,

    /// Directory for session, quota and settings files (default ~/.cgo)
    #[arg(long, env = "CGO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Development mode: no daily quota
    #[arg(long, env = "CGO_DEVELOPMENT")]
    pub development: bool,

    /// Never call the remote model; classify with keyword rules only
    #[arg(long, env = "CGO_LOCAL_ONLY")]
    pub local_only: bool,

    /// Timeout for one remote classification, in seconds
    #[arg(long, env = "CGO_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Minimum spacing between remote classifications, in seconds
    #[arg(long, env = "CGO_MIN_REQUEST_INTERVAL_SECS")]
    pub min_request_interval_secs: Option<u64>,

    /// Remote classifications allowed per day
    #[arg(long, env = "CGO_DAILY_LIMIT", default_value_t = DAILY_LIMIT)]
    pub daily_limit: u32,
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn quota_policy(&self) -> QuotaPolicy {
        let mut policy = if self.development {
            QuotaPolicy::development()
        } else {
            QuotaPolicy::production().with_daily_limit(self.daily_limit)
        };
        if let Some(secs) = self.min_request_interval_secs.filter(|s| *s > 0) {
            let secs = i64::try_from(secs).unwrap_or(i64::MAX);
            if let Some(interval) = TimeDelta::try_seconds(secs) {
                policy = policy.with_min_interval(interval);
            }
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::parse_from(["cgo-server"]);
        assert_eq!(c.bind.port(), 8787);
        assert_eq!(c.request_timeout(), Duration::from_secs(30));
        assert_eq!(c.quota_policy(), QuotaPolicy::production());
    }

    #[test]
    fn development_is_unlimited() {
        let c = Config::parse_from(["cgo-server", "--development", "--daily-limit", "9"]);
        assert!(c.quota_policy().is_unlimited());
    }

    #[test]
    fn spacing_is_optional() {
        let c = Config::parse_from(["cgo-server", "--min-request-interval-secs", "120"]);
        assert_eq!(c.quota_policy().min_interval, Some(TimeDelta::minutes(2)));
    }
}
