//! Rendering a zone's transition periods as an iCalendar `VTIMEZONE`.
//!
//! Each period becomes one `STANDARD` or `DAYLIGHT` sub-component with a
//! `DTSTART` in the local time of the transition, the offsets on either
//! side of it, and the zone abbreviation as `TZNAME`. Lines end with CRLF
//! as RFC 5545 requires.

use crate::line::civil_from_timestamp;
use crate::timeline::TransitionPeriod;

/// The conventional `DTSTART` floor for a period that extends indefinitely
/// into the past, matching what zic-based exporters emit.
const DISTANT_PAST: &str = "16010101T000000";

/// Formats a UTC offset the way `TZOFFSETFROM`/`TZOFFSETTO` expect:
/// a sign, hours and minutes, and trailing seconds only when nonzero.
pub fn format_offset(seconds: i64) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let total = seconds.abs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if seconds > 0 {
        format!("{}{:02}{:02}{:02}", sign, hours, minutes, seconds)
    } else {
        format!("{}{:02}{:02}", sign, hours, minutes)
    }
}

/// Formats a timestamp as a basic ISO 8601 local date-time, with no zone
/// designator.
fn format_local(timestamp: i64) -> String {
    let (year, month, day, seconds) = civil_from_timestamp(timestamp);
    format!(
        "{:04}{:02}{:02}T{:02}{:02}{:02}",
        year,
        month as i8,
        day,
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// Renders a complete `VTIMEZONE` component for the given zone.
///
/// The first period has no predecessor, so its `TZOFFSETFROM` repeats its
/// own offset; every later period's `TZOFFSETFROM` is the offset it
/// transitioned away from. `DTSTART` is the period's start converted to
/// the local clock it transitioned *from*.
pub fn vtimezone(tzid: &str, periods: &[TransitionPeriod]) -> String {
    let mut out = String::new();
    let mut line = |text: &str| {
        out.push_str(text);
        out.push_str("\r\n");
    };

    line("BEGIN:VTIMEZONE");
    line(&format!("TZID:{}", tzid));

    for (index, period) in periods.iter().enumerate() {
        let kind = if period.is_dst { "DAYLIGHT" } else { "STANDARD" };
        let offset_from = if index == 0 {
            period.offset_to
        } else {
            period.offset_from
        };
        let dtstart = match period.start_utc {
            Some(start) => format_local(start + offset_from),
            None => DISTANT_PAST.to_owned(),
        };

        line(&format!("BEGIN:{}", kind));
        line(&format!("DTSTART:{}", dtstart));
        line(&format!("TZOFFSETFROM:{}", format_offset(offset_from)));
        line(&format!("TZOFFSETTO:{}", format_offset(period.offset_to)));
        if !period.abbreviation.is_empty() {
            line(&format!("TZNAME:{}", period.abbreviation));
        }
        line(&format!("END:{}", kind));
    }

    line("END:VTIMEZONE");
    out
}
