// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record timestamps.
//!
//! Every stamp is UTC with second precision and a fixed width, so stamps
//! compare correctly as plain text (the session purge relies on this).

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::PersistenceError;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Formats an instant as a store timestamp (`2026-01-31T18:30:00Z`).
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(at.to_offset(UtcOffset::UTC).format(TIMESTAMP_FORMAT)?)
}

/// The current instant as a store timestamp.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Parses a store timestamp back into an instant.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_timestamps_are_utc_and_fixed_width() {
        let at: OffsetDateTime = datetime!(2026-03-05 09:07:03.250 +02:00);
        let stamp: String = format_timestamp(at).unwrap();
        assert_eq!(stamp, "2026-03-05T07:07:03Z");
        assert_eq!(
            parse_timestamp(&stamp),
            Some(datetime!(2026-03-05 07:07:03 UTC))
        );
    }

    #[test]
    fn test_parse_rejects_other_forms() {
        assert_eq!(parse_timestamp("05/03/2026"), None);
        assert_eq!(parse_timestamp("2026-03-05 07:07:03"), None);
    }
}
