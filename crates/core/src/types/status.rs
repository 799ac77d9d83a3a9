//! Order status enum.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an [`OrderStatus`] from a string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid order status: {got}")]
pub struct ParseOrderStatusError {
    /// The rejected input value.
    pub got: String,
}

/// Lifecycle status of an order.
///
/// An order is created as `pending` and transitions to `done` once it
/// has been handled. These are the only two valid values; anything else
/// is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Done,
}

impl OrderStatus {
    /// The status as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            _ => Err(ParseOrderStatusError { got: s.to_owned() }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("done".parse::<OrderStatus>().unwrap(), OrderStatus::Done);
    }

    #[test]
    fn test_parse_invalid() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.got, "shipped");
    }

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&OrderStatus::Done).unwrap();
        assert_eq!(json, "\"done\"");
        assert_eq!(OrderStatus::Done.to_string(), "done");
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
