//! Clock time handling for bus timetables.
//!
//! Routes store their departures as daily "HH:MM" clock times. This module
//! parses those times out of free text and turns them into concrete upcoming
//! instants relative to a reference moment.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, TimeZone};
use tracing::debug;

/// Number of upcoming departures shown when the caller doesn't ask for a count.
pub const DEFAULT_UPCOMING: usize = 5;

/// Display format for a concrete departure, e.g. "Mon 02/09 23:00".
pub const DEPARTURE_FORMAT: &str = "%a %d/%m %H:%M";

/// Parse free text into a sorted, deduplicated list of clock times.
///
/// Tokens are separated by whitespace or commas. Each token must look like
/// `H:M` with both halves non-negative integers forming a valid time of day.
/// Anything else is dropped without error.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::parse_times;
///
/// let times = parse_times("07:10, 08:00 07:10");
/// let shown: Vec<String> = times.iter().map(|t| t.format("%H:%M").to_string()).collect();
/// assert_eq!(shown, ["07:10", "08:00"]);
///
/// assert!(parse_times("not-a-time 25:99").is_empty());
/// ```
pub fn parse_times(text: &str) -> Vec<NaiveTime> {
    let mut times = BTreeSet::new();

    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match parse_token(token) {
            Some(time) => {
                times.insert(time);
            }
            None => debug!(token, "dropping malformed time token"),
        }
    }

    times.into_iter().collect()
}

/// Parse a single `H:M` token.
fn parse_token(token: &str) -> Option<NaiveTime> {
    let (hour, minute) = token.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Render clock times as a comma separated list, e.g. "07:10, 08:00".
pub fn format_times(times: &[NaiveTime]) -> String {
    times
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The current moment in the local system offset.
pub fn now_local() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Compute the next `n` departures from a set of daily clock times.
///
/// Each clock time is placed on `from`'s date and offset. Times already
/// strictly in the past roll forward by a single day. Each clock time yields
/// exactly one instant; the instants are sorted and the first `n` returned.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::next_times;
/// use chrono::{FixedOffset, NaiveTime, TimeZone};
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// // Monday 2024-09-02 08:00
/// let from = tz.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap();
/// let times = [
///     NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
/// ];
///
/// let next = next_times(&times, 5, from);
/// assert_eq!(next[0], tz.with_ymd_and_hms(2024, 9, 2, 23, 0, 0).unwrap());
/// assert_eq!(next[1], tz.with_ymd_and_hms(2024, 9, 3, 7, 0, 0).unwrap());
/// ```
pub fn next_times(
    times: &[NaiveTime],
    n: usize,
    from: DateTime<FixedOffset>,
) -> Vec<DateTime<FixedOffset>> {
    let offset = *from.offset();
    let today = from.date_naive();

    let mut upcoming: Vec<DateTime<FixedOffset>> = times
        .iter()
        .filter_map(|time| {
            // A fixed offset has exactly one mapping for every local time
            let at = offset.from_local_datetime(&today.and_time(*time)).single()?;
            if at < from {
                at.checked_add_signed(Duration::days(1))
            } else {
                Some(at)
            }
        })
        .collect();

    upcoming.sort();
    upcoming.truncate(n);
    upcoming
}

/// Format a departure instant for display.
pub fn format_departure(at: &DateTime<FixedOffset>) -> String {
    at.format(DEPARTURE_FORMAT).to_string()
}

/// Serde helpers storing clock times as "HH:MM" strings.
///
/// Reading also accepts "HH:MM:SS" so documents written by other tools load.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S: Serializer>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(times.iter().map(|t| t.format("%H:%M").to_string()))
    }

    /// Entries that aren't a valid time are logged and dropped, so one bad
    /// value doesn't make the whole document unreadable.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<NaiveTime>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(raw
            .iter()
            .filter_map(|s| {
                NaiveTime::parse_from_str(s, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                    .inspect_err(|e| warn!(value = %s, error = %e, "dropping invalid stored time"))
                    .ok()
            })
            .collect())
    }
}
