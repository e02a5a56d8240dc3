//! Enumeration types for constrained API values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Payment status of a QRIS invoice or transaction.
///
/// The backend and the upstream QRIS provider report status as free-form
/// strings. Known values are matched case-insensitively; anything else is
/// preserved verbatim in [`PaymentStatus::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Awaiting payment (`pending` or `waiting`).
    Pending,
    /// Payment completed (`success`).
    Success,
    /// Payment completed (`paid`).
    Paid,
    /// Payment failed (`failed`).
    Failed,
    /// Provider-side error (`error`).
    Error,
    /// Any status string not listed above.
    Unrecognized(String),
}

impl PaymentStatus {
    /// Returns the wire representation of this status.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match *self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Unrecognized(ref raw) => raw,
        }
    }

    /// Returns `true` if the payment went through.
    #[inline]
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(*self, Self::Success | Self::Paid)
    }

    /// Returns `true` if the payment failed.
    #[inline]
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(*self, Self::Failed | Self::Error)
    }

    /// Returns `true` if the payment is still awaited.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(*self, Self::Pending)
    }

    /// Returns `true` once the status can no longer change.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.is_settled() || self.is_failed()
    }
}

impl From<&str> for PaymentStatus {
    #[inline]
    fn from(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" | "waiting" => Self::Pending,
            "success" => Self::Success,
            "paid" => Self::Paid,
            "failed" => Self::Failed,
            "error" => Self::Error,
            _ => Self::Unrecognized(raw.to_owned()),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = core::convert::Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for PaymentStatus {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentStatus {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}
