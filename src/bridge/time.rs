//! FidoNet dates and TZUTC offsets
//!
//! Packets carry a naive local time in the 20-byte date field
//! (`"DD Mon YY  HH:MM:SS"`); the TZUTC kludge supplies the offset.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike,
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format a datetime's UTC offset as a TZUTC value
///
/// Negative offsets get a single `-`; positive offsets carry no sign.
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use ftngate::bridge::tz_offset_string;
///
/// let west = FixedOffset::west_opt(5 * 3600).unwrap();
/// let dt = west.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// assert_eq!(tz_offset_string(&dt), "-0500");
///
/// let east = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
/// let dt = east.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// assert_eq!(tz_offset_string(&dt), "0530");
/// ```
pub fn tz_offset_string<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    let seconds = datetime.offset().fix().local_minus_utc();
    let sign = if seconds < 0 { "-" } else { "" };
    let magnitude = seconds.unsigned_abs();
    format!(
        "{sign}{:02}{:02}",
        magnitude / 3600,
        (magnitude % 3600) / 60
    )
}

/// Parse a TZUTC value (`[+|-]HHMM`) into a fixed offset
pub fn parse_tz_offset(offset: &str) -> Option<FixedOffset> {
    let offset = offset.trim();
    let (negative, digits) = match offset.as_bytes().first()? {
        b'-' => (true, &offset[1..]),
        b'+' => (false, &offset[1..]),
        _ => (false, offset),
    };
    if !(3..=4).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i32 = digits.parse().ok()?;
    let (hours, minutes) = (value / 100, value % 100);
    if minutes >= 60 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    FixedOffset::east_opt(if negative { -seconds } else { seconds })
}

/// Attach a TZUTC offset to a naive timestamp
///
/// Returns `None` when the offset text is not a valid TZUTC value.
pub fn apply_tz_offset(offset: &str, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    let offset = parse_tz_offset(offset)?;
    offset.from_local_datetime(&naive).single()
}

/// Format the 19 visible characters of a packet date field
pub fn format_fido_date(naive: &NaiveDateTime) -> String {
    format!(
        "{:02} {} {:02}  {:02}:{:02}:{:02}",
        naive.day(),
        MONTHS[naive.month0() as usize],
        naive.year().rem_euclid(100),
        naive.hour(),
        naive.minute(),
        naive.second()
    )
}

/// Parse a packet date field
///
/// Accepts the FTS-0001 form `"DD Mon YY  HH:MM:SS"` and the SEAdog form
/// `"Www DD Mon YY HH:MM"`. Two-digit years below 80 are in the 2000s.
pub fn parse_fido_date(text: &str) -> Option<NaiveDateTime> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens
        .first()
        .is_some_and(|t| t.bytes().all(|b| b.is_ascii_alphabetic()))
    {
        tokens.remove(0);
    }
    let [day, month, year, time] = tokens.as_slice() else {
        return None;
    };

    let day: u32 = day.parse().ok()?;
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month))? as u32
        + 1;
    let year: i32 = year.parse().ok()?;
    let year = match year {
        0..=79 => 2000 + year,
        80..=99 => 1900 + year,
        _ => year,
    };

    let mut clock = time.split(':').map(|part| part.parse::<u32>().ok());
    let hour = clock.next()??;
    let minute = clock.next()??;
    let second = clock.next().unwrap_or(Some(0))?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
