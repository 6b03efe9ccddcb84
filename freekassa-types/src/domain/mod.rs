//! Domain models for the Freekassa API.

pub mod compat;
pub mod fields;
pub mod route;
pub mod status;

use chrono::NaiveDateTime;

pub use compat::{Compat, NonceMode};
pub use fields::SignedFields;
pub use route::{API_URL, Route};
pub use status::{OrderStatus, order_label};

/// Wire format for date-time request fields.
pub const TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Formats a naive date-time the way the API expects it.
///
/// The value is written as-is; no timezone conversion happens.
pub fn format_time(dt: &NaiveDateTime) -> String {
    dt.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_time() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        assert_eq!(format_time(&dt), "2024.03.07 09:05:01");
    }
}
