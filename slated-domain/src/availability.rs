use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weekday on which a service is offered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown weekday: {0}")]
pub struct ParseDayError(String);

impl std::str::FromStr for DayOfWeek {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monday" => Ok(DayOfWeek::Monday),
            "tuesday" => Ok(DayOfWeek::Tuesday),
            "wednesday" => Ok(DayOfWeek::Wednesday),
            "thursday" => Ok(DayOfWeek::Thursday),
            "friday" => Ok(DayOfWeek::Friday),
            "saturday" => Ok(DayOfWeek::Saturday),
            "sunday" => Ok(DayOfWeek::Sunday),
            other => Err(ParseDayError(other.to_string())),
        }
    }
}

/// Time-of-day bounds within which slots are generated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for DailyWindow {
    // 09:00-18:00 when a service does not set its own window
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Immutable snapshot of a service's bookable configuration, read once per
/// scheduling request. Pricing travels with it so totals are always computed
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAvailability {
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub price_amount: i64,
    pub price_currency: String,
    pub duration_minutes: i32,
    pub recurring_days: Vec<DayOfWeek>,
    pub daily_window: Option<DailyWindow>,
}

impl ServiceAvailability {
    /// A service with no recurring days (or a degenerate duration) is never
    /// bookable; listings for it are empty rather than an error.
    pub fn is_bookable(&self) -> bool {
        self.duration_minutes > 0 && !self.recurring_days.is_empty()
    }

    pub fn offered_on(&self, day: DayOfWeek) -> bool {
        self.recurring_days.contains(&day)
    }

    pub fn window(&self) -> DailyWindow {
        self.daily_window.unwrap_or_default()
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Price of one booking unit: hourly rate times duration in hours.
    pub fn unit_price(&self) -> i64 {
        self.price_amount * i64::from(self.duration_minutes) / 60
    }
}
