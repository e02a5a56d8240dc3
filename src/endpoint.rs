//! Backend endpoints as a closed set of operations.
//!
//! Every domain call on the clients is one [`Endpoint`] variant dispatched
//! through the shared request primitive. A variant fully determines the
//! HTTP method and path; request bodies are supplied separately.

use core::fmt;

use crate::models::{InvoiceId, MerchantId, TransactionId};

/// Default page for transaction listings.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for transaction listings.
pub const DEFAULT_LIMIT: u32 = 20;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(any(feature = "async", feature = "blocking"))]
impl From<HttpMethod> for reqwest::Method {
    #[inline]
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A backend operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /api/auth/login`
    Login,
    /// `GET /health`
    Health,
    /// `GET /api/merchants`
    ListMerchants,
    /// `GET /api/merchants/{id}`
    GetMerchant(MerchantId),
    /// `POST /api/merchants`
    CreateMerchant,
    /// `PUT /api/merchants/{id}`
    UpdateMerchant(MerchantId),
    /// `DELETE /api/merchants/{id}`
    DeleteMerchant(MerchantId),
    /// `GET /api/merchants/{id}/test-connection`
    TestMerchantConnection(MerchantId),
    /// `POST /api/qris/create-invoice`
    CreateInvoice,
    /// `GET /api/qris/check-status/{invoice_id}`
    CheckStatus(InvoiceId),
    /// `GET /api/qris/transactions?merchant_id=&page=&limit=`
    ListTransactions {
        /// Merchant whose transactions are listed.
        merchant_id: MerchantId,
        /// 1-based page number.
        page: u32,
        /// Page size.
        limit: u32,
    },
    /// `GET /api/qris/transactions/{id}`
    GetTransaction(TransactionId),
}

impl Endpoint {
    /// Returns the HTTP method of this endpoint.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match *self {
            Self::Login | Self::CreateMerchant | Self::CreateInvoice => HttpMethod::Post,
            Self::UpdateMerchant(_) => HttpMethod::Put,
            Self::DeleteMerchant(_) => HttpMethod::Delete,
            Self::Health
            | Self::ListMerchants
            | Self::GetMerchant(_)
            | Self::TestMerchantConnection(_)
            | Self::CheckStatus(_)
            | Self::ListTransactions { .. }
            | Self::GetTransaction(_) => HttpMethod::Get,
        }
    }

    /// Returns the path (and query string, if any) relative to the base URL.
    #[inline]
    #[must_use]
    pub fn path(&self) -> String {
        match *self {
            Self::Login => "/api/auth/login".to_owned(),
            Self::Health => "/health".to_owned(),
            Self::ListMerchants | Self::CreateMerchant => "/api/merchants".to_owned(),
            Self::GetMerchant(id) | Self::UpdateMerchant(id) | Self::DeleteMerchant(id) => {
                format!("/api/merchants/{id}")
            }
            Self::TestMerchantConnection(id) => format!("/api/merchants/{id}/test-connection"),
            Self::CreateInvoice => "/api/qris/create-invoice".to_owned(),
            Self::CheckStatus(ref invoice_id) => format!("/api/qris/check-status/{invoice_id}"),
            Self::ListTransactions {
                merchant_id,
                page,
                limit,
            } => format!("/api/qris/transactions?merchant_id={merchant_id}&page={page}&limit={limit}"),
            Self::GetTransaction(id) => format!("/api/qris/transactions/{id}"),
        }
    }
}

impl fmt::Display for Endpoint {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
