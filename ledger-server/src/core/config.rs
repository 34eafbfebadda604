use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;

use crate::utils::time::{parse_hhmm, parse_weekday};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/ledger | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | APPROVAL_ENABLED | true | New time entries start PENDING; false ⇒ APPROVED |
/// | FIRST_DAY_OF_WEEK | mon | Timesheet week start (mon..sun) |
/// | DEADLINE_OFFSET_DAYS | 3 | Days after period end before the deadline |
/// | DEADLINE_TIME | 17:00 | Deadline time of day (HH:MM, business tz) |
/// | MIN_DAILY_MINUTES | 0 | Minimum minutes per weekday for submission; 0 disables |
/// | DEFAULT_BILLING_RATE | (unset) | Last resort of the billing-rate chain |
/// | TIMEZONE | UTC | Business timezone (IANA name) |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database file and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Engine behavior knobs
    pub engine: EngineSettings,
}

/// Tenant-independent behavior settings of the engine
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// When false, entries created outside the clock are immediately APPROVED
    pub approval_enabled: bool,
    /// First day of the timesheet week
    pub first_day_of_week: Weekday,
    /// Submission deadline: period end + offset days at `deadline_time`
    pub deadline_offset_days: i64,
    /// Time of day of the deadline, truncated to the minute
    pub deadline_time: NaiveTime,
    /// Minimum logged minutes per weekday required to submit; 0 disables
    pub min_daily_minutes: i64,
    /// Final fallback of the billing-rate chain; unset ⇒ unpriceable
    /// billable entries are rejected
    pub default_billing_rate: Option<f64>,
    /// Business timezone for all date boundary computations
    pub timezone: Tz,
}

impl Config {
    /// Load from environment variables, with defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/ledger".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            engine: EngineSettings::from_env(),
        }
    }

    pub fn db_path(&self) -> String {
        format!("{}/ledger.db", self.work_dir)
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self {
            approval_enabled: std::env::var("APPROVAL_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            first_day_of_week: std::env::var("FIRST_DAY_OF_WEEK")
                .map(|v| parse_weekday(&v))
                .unwrap_or(Weekday::Mon),
            deadline_offset_days: std::env::var("DEADLINE_OFFSET_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            deadline_time: std::env::var("DEADLINE_TIME")
                .map(|v| parse_hhmm(&v))
                .unwrap_or_else(|_| NaiveTime::from_hms_opt(17, 0, 0).unwrap()),
            min_daily_minutes: std::env::var("MIN_DAILY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            default_billing_rate: std::env::var("DEFAULT_BILLING_RATE")
                .ok()
                .and_then(|v| v.parse().ok()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::UTC),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            approval_enabled: true,
            first_day_of_week: Weekday::Mon,
            deadline_offset_days: 3,
            deadline_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            min_daily_minutes: 0,
            default_billing_rate: None,
            timezone: chrono_tz::UTC,
        }
    }
}
