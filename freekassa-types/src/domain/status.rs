//! Order and withdrawal statuses.

use std::fmt;

/// Label shown for status codes outside the known set.
pub const UNKNOWN_STATUS_LABEL: &str = "Неизвестный статус";

/// Status of an order or a withdrawal, as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    Paid,
    Error,
    Cancelled,
}

impl OrderStatus {
    /// Maps a wire status code to a status.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::New),
            1 => Some(Self::Paid),
            8 => Some(Self::Error),
            9 => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns the wire status code.
    pub fn code(&self) -> i64 {
        match self {
            Self::New => 0,
            Self::Paid => 1,
            Self::Error => 8,
            Self::Cancelled => 9,
        }
    }

    /// Returns the provider's display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "Новый",
            Self::Paid => "Оплачен",
            Self::Error => "Ошибка",
            Self::Cancelled => "Отмена",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Paid => "PAID",
            Self::Error => "ERROR",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns the display label for any status code.
pub fn order_label(code: i64) -> &'static str {
    OrderStatus::from_code(code)
        .map(|s| s.label())
        .unwrap_or(UNKNOWN_STATUS_LABEL)
}
