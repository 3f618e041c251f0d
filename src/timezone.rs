//! Resolves the configured timezone to local dates and timestamps.

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use time_tz::{Offset, TimeZone};

use crate::Error;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

fn local_now(canonical_timezone: &str) -> Result<OffsetDateTime, Error> {
    let Some(local_offset) = get_local_offset(canonical_timezone) else {
        tracing::error!("Invalid timezone {canonical_timezone}");
        return Err(Error::InvalidTimezoneError(canonical_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset))
}

/// Today's date in `canonical_timezone` formatted as `YYYY-MM-DD`.
///
/// # Errors
/// Returns an error if `canonical_timezone` is not a known timezone.
pub fn local_today(canonical_timezone: &str) -> Result<String, Error> {
    local_now(canonical_timezone).map(|now| now.date().to_string())
}

/// The current instant as an RFC 3339 timestamp with the local UTC offset.
///
/// # Errors
/// Returns an error if `canonical_timezone` is not a known timezone.
pub fn local_timestamp(canonical_timezone: &str) -> Result<String, Error> {
    local_now(canonical_timezone)?
        .format(&Rfc3339)
        .map_err(|error| Error::TimestampFormatError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use time::{
        Date, OffsetDateTime,
        format_description::{self, well_known::Rfc3339},
    };

    use crate::Error;

    use super::{get_local_offset, local_timestamp, local_today};

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(get_local_offset("Mars/Olympus_Mons"), None);
        assert_eq!(
            local_today("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }

    #[test]
    fn today_is_an_iso_date() {
        let today = local_today("Etc/UTC").unwrap();

        let format = format_description::parse("[year]-[month]-[day]").unwrap();
        let parsed = Date::parse(&today, &format);
        assert!(parsed.is_ok(), "want YYYY-MM-DD, got {today:?}");
    }

    #[test]
    fn timestamp_is_rfc3339_with_local_offset() {
        let timestamp = local_timestamp("Etc/UTC").unwrap();

        let parsed = OffsetDateTime::parse(&timestamp, &Rfc3339).unwrap();
        assert!(parsed.offset().is_utc(), "want UTC offset, got {timestamp}");
    }
}
