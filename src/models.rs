//! Data models for Monalisa API entities.
//!
//! This module contains strongly-typed request and response bodies for the
//! authentication, merchant and QRIS endpoints, newtype ID wrappers, and
//! the payment status enumeration.

mod auth;
mod enums;
mod ids;
mod merchant;
mod serde_helpers;
mod transaction;

pub use auth::{Health, LoginRequest, LoginResponse, Message};
pub use enums::PaymentStatus;
pub use ids::{InvoiceId, MerchantId, TransactionId};
pub use merchant::{ConnectionTest, Merchant, MerchantList, MerchantUpdate, NewMerchant};
pub use transaction::{Invoice, InvoiceRequest, InvoiceStatus, QrisTransaction, TransactionPage};
