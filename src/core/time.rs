use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub(crate) fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

/// Whole seconds elapsed between `start` and `now`, clamped at zero for
/// clocks that step backwards.
pub(crate) fn elapsed_seconds(start: OffsetDateTime, now: OffsetDateTime) -> u64 {
    let elapsed = (now - start).whole_seconds();
    if elapsed < 0 {
        0
    } else {
        elapsed as u64
    }
}
