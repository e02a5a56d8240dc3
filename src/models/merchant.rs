//! Merchant models: registered QRIS payment-receiving accounts.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::MerchantId;
use super::serde_helpers::{
    deserialize_optional_timestamp, deserialize_timestamp, serialize_optional_secret,
    serialize_secret,
};

/// A merchant registered with the backend.
///
/// The API key is write-only: it is sent on create/update but never
/// returned, so it has no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Backend identifier.
    pub id: MerchantId,
    /// Display name.
    pub name: String,
    /// External merchant ID at the QRIS provider.
    pub merchant_id: String,
    /// Whether invoices can be issued for this merchant.
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Response of the merchant list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantList {
    /// Registered merchants.
    pub merchants: Vec<Merchant>,
    /// Number of merchants reported by the backend.
    #[serde(default)]
    pub total: u64,
}

/// Request body for registering a merchant.
#[derive(Debug, Serialize)]
pub struct NewMerchant {
    /// Display name.
    pub name: String,
    /// External merchant ID at the QRIS provider.
    pub merchant_id: String,
    /// Provider API key.
    #[serde(serialize_with = "serialize_secret")]
    pub api_key: SecretString,
    /// Whether the merchant starts active.
    pub is_active: bool,
}

impl NewMerchant {
    /// Creates an active merchant registration.
    #[inline]
    #[must_use]
    pub fn new<N, M>(name: N, merchant_id: M, api_key: SecretString) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            merchant_id: merchant_id.into(),
            api_key,
            is_active: true,
        }
    }

    /// Sets the initial active flag.
    #[inline]
    #[must_use]
    pub const fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Partial update of a merchant. Unset fields are left unchanged.
#[derive(Debug, Default, Serialize)]
pub struct MerchantUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New external merchant ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    /// New provider API key.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_secret"
    )]
    pub api_key: Option<SecretString>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl MerchantUpdate {
    /// Creates an empty update.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the display name.
    #[inline]
    #[must_use]
    pub fn name<T: Into<String>>(mut self, name: T) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the external merchant ID.
    #[inline]
    #[must_use]
    pub fn merchant_id<T: Into<String>>(mut self, merchant_id: T) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    /// Replaces the provider API key.
    #[inline]
    #[must_use]
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Activates or deactivates the merchant.
    #[inline]
    #[must_use]
    pub const fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Returns `true` if no field is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.merchant_id.is_none()
            && self.api_key.is_none()
            && self.is_active.is_none()
    }
}

/// Result of a merchant connection test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTest {
    /// Human-readable outcome.
    pub message: String,
    /// Outcome tag (`success` when the provider accepted the credentials).
    #[serde(default)]
    pub status: Option<String>,
}

impl ConnectionTest {
    /// Returns `true` if the backend reported a successful connection.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}
