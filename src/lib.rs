//! Rust client library for the Monalisa finance assistant API.
//!
//! This crate provides a typed client for the Monalisa backend: bearer-token
//! authentication with a pluggable session store, merchant management, and
//! QRIS (Indonesian standard QR payment) invoices and transactions.
//!
//! ```no_run
//! # async fn demo() -> monalisa_client::error::Result<()> {
//! use monalisa_client::client::MonalisaClient;
//! use monalisa_client::models::MerchantId;
//! use secrecy::SecretString;
//!
//! let client = MonalisaClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build()?;
//! let _login = client
//!     .login("owner@toko.id", SecretString::from("password"))
//!     .await?;
//! let invoice = client
//!     .create_qris_invoice(MerchantId::new(7), 50_000, "Coffee")
//!     .await?;
//! let status = client.check_qris_status(&invoice.invoice_id).await?;
//! # let _ = status;
//! # Ok(())
//! # }
//! ```

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;
