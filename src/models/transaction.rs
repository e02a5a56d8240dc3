//! QRIS invoice and transaction models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{deserialize_optional_timestamp, deserialize_timestamp};
use super::{InvoiceId, MerchantId, PaymentStatus, TransactionId};

/// Request body for minting a QRIS invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Merchant that receives the payment.
    pub merchant_id: MerchantId,
    /// Amount in the smallest currency unit (rupiah).
    pub amount: u64,
    /// Free-form description shown to the payer.
    pub description: String,
}

/// A freshly minted QRIS invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Provider-issued invoice identifier.
    pub invoice_id: InvoiceId,
    /// URL of the QR code image to present to the payer.
    pub qr_code_url: String,
    /// Invoiced amount.
    pub amount: u64,
    /// Initial status (the backend reports `created`).
    pub status: PaymentStatus,
}

/// Payment status of an invoice as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceStatus {
    /// Current status.
    #[serde(rename = "qris_status")]
    pub status: PaymentStatus,
    /// Name of the payer once paid.
    #[serde(default, rename = "qris_payment_customername")]
    pub payer_name: Option<String>,
    /// Payment method (wallet or bank) once paid.
    #[serde(default, rename = "qris_payment_methodby")]
    pub payment_method: Option<String>,
}

/// A QRIS transaction recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrisTransaction {
    /// Backend identifier.
    pub id: TransactionId,
    /// Merchant that issued the invoice.
    pub merchant_id: MerchantId,
    /// Provider-issued invoice identifier.
    pub invoice_id: InvoiceId,
    /// Amount in the smallest currency unit.
    pub amount: u64,
    /// Description given at creation.
    #[serde(default)]
    pub description: Option<String>,
    /// Backend-side status.
    pub status: PaymentStatus,
    /// Last status reported by the provider.
    #[serde(default)]
    pub qris_status: Option<PaymentStatus>,
    /// Payment method once paid.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Payer name once paid.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Creation timestamp.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl QrisTransaction {
    /// Returns the most specific known status: the provider status when
    /// present, the backend status otherwise.
    #[inline]
    #[must_use]
    pub fn effective_status(&self) -> &PaymentStatus {
        self.qris_status.as_ref().unwrap_or(&self.status)
    }
}

/// One page of a merchant's QRIS transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// Transactions on this page.
    pub transactions: Vec<QrisTransaction>,
    /// Total transactions for the merchant.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl TransactionPage {
    /// Returns `true` if further pages exist after this one.
    #[inline]
    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::from(self.page).saturating_mul(u64::from(self.limit)) < self.total
    }
}
