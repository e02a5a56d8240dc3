//! Newtype wrappers for entity identifiers.
//!
//! These prevent accidentally mixing up IDs of different entity types
//! at compile time. Numeric identifiers are primary keys assigned by the
//! backend; invoice identifiers are issued by the upstream QRIS provider.

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapping a `Copy` inner type.
macro_rules! define_copy_id {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty)
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Creates a new identifier from the given value.
            #[inline]
            #[must_use]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner value.
            #[inline]
            #[must_use]
            pub const fn as_inner(&self) -> &$inner {
                &self.0
            }

            /// Consumes the wrapper and returns the inner value.
            #[inline]
            #[must_use]
            pub const fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

/// Macro to define a newtype ID wrapping a `String` inner type.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_copy_id! {
    /// Backend primary key of a registered merchant.
    MerchantId(i64)
}

define_copy_id! {
    /// Backend primary key of a recorded QRIS transaction.
    TransactionId(i64)
}

define_string_id! {
    /// Invoice identifier issued by the QRIS provider.
    InvoiceId
}

impl From<&str> for InvoiceId {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_id_serializes_as_number() {
        let id = MerchantId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let deserialized: MerchantId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn invoice_id_serializes_as_string() {
        let id = InvoiceId::new("INV-20240101-0001".to_owned());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""INV-20240101-0001""#);
    }

    #[test]
    fn ids_display_inner_value() {
        assert_eq!(MerchantId::new(12).to_string(), "12");
        assert_eq!(TransactionId::new(3).to_string(), "3");
        assert_eq!(InvoiceId::from("abc").to_string(), "abc");
    }

    #[test]
    fn id_conversions() {
        let id: MerchantId = 42_i64.into();
        assert_eq!(*id.as_inner(), 42);
        assert_eq!(id.into_inner(), 42);

        let invoice: InvoiceId = "inv-1".to_owned().into();
        assert_eq!(invoice.as_inner(), "inv-1");
        assert_eq!(invoice.into_inner(), "inv-1");
    }
}
