//! Venue-local timestamps to UTC instants.

use chrono::{Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Length of `YYYY-MM-DDTHH:MM:SS`; anything after it (offset, fraction) is dropped.
const LOCAL_STAMP_LEN: usize = 19;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Interpret the date-time prefix of `raw` as wall-clock time in `tz` and
/// render it as a UTC instant, e.g. `2024-03-16T03:00:00.000Z`.
///
/// Ambiguous wall-clock times resolve to the earlier instant; times inside a
/// spring-forward gap move one hour later. Returns `None` when the prefix is
/// not a timestamp.
pub fn local_to_utc_iso(raw: &str, tz: Tz) -> Option<String> {
    let stamp = raw.get(..LOCAL_STAMP_LEN)?;
    let naive = NaiveDateTime::parse_from_str(stamp, LOCAL_FORMAT).ok()?;

    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())?;

    Some(
        local
            .with_timezone(&Utc)
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string(),
    )
}
