use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The format timestamps are stored in. All stored values are UTC; timezone
/// conversion happens only on the read path.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Day-granularity format, used for retention cutoffs.
pub const TIME_DAY: &str = "%Y-%m-%d";

/// The singleton application settings row, stored in the `core` table.
/// Exactly one of these exists per installation; `migration_id` records the
/// unix time at which the row was (re)created, distinguishing instantiations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreSettings {
    pub name: String,
    pub description: String,
    pub config: String,
    pub api_key: String,
    pub api_secret: String,
    pub domain: String,
    pub timezone: f32,
    pub migration_id: i64,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// A monitored endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monitor {
    pub id: i64,
    pub name: String,
    pub domain: String,
    pub check_interval: i64,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// An operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// A successful latency measurement for a monitor. Time-series; subject to
/// the retention window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    pub id: i64,
    pub monitor_id: i64,
    pub latency: f64,
    pub created_at: DateTime<FixedOffset>,
}

/// A recorded check failure for a monitor. Time-series; subject to the
/// retention window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub id: i64,
    pub monitor_id: i64,
    pub issue: String,
    pub created_at: DateTime<FixedOffset>,
}

/// A scheduled check-in that an external job is expected to report against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkin {
    pub id: i64,
    pub monitor_id: i64,
    pub report_interval: i64,
    pub api_key: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// A single report against a scheduled check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinHit {
    pub id: i64,
    pub checkin_id: i64,
    pub from_ip: String,
    pub created_at: DateTime<FixedOffset>,
}

/// An announcement shown over a start/end window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub monitor_id: i64,
    pub start_on: DateTime<FixedOffset>,
    pub end_on: DateTime<FixedOffset>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}
