use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{FormatItem, well_known::Rfc3339},
    macros::format_description,
};

pub const TODAY_LABEL: &str = "Hoy";
pub const YESTERDAY_LABEL: &str = "Ayer";

const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");
const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none]/[month padding:none]/[year]");
// Servers running without tz support emit naive ISO timestamps.
const NAIVE_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Current time in the viewer's zone (UTC when the zone is unknown).
pub fn now_local() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    match UtcOffset::current_local_offset() {
        Ok(offset) => now.to_offset(offset),
        Err(_) => now,
    }
}

/// Parses a server timestamp into the zone of `now`.
pub fn parse_timestamp(raw: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed.to_offset(now.offset()));
    }
    PrimitiveDateTime::parse(raw, NAIVE_FORMAT)
        .ok()
        .map(|naive| naive.assume_offset(now.offset()))
}

/// Section label for a calendar date, relative to `today`.
pub fn date_label(date: Date, today: Date) -> String {
    if date == today {
        return TODAY_LABEL.to_string();
    }
    if today.previous_day() == Some(date) {
        return YESTERDAY_LABEL.to_string();
    }
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

pub fn time_label(datetime: OffsetDateTime) -> String {
    datetime
        .format(TIME_FORMAT)
        .unwrap_or_else(|_| String::new())
}
