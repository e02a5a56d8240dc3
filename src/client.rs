//! HTTP client for the Monalisa API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Both share one request primitive: read the session token, attach
//! headers, send exactly one request, and normalize the outcome into a
//! decoded body or a [`MonalisaError`].

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

use crate::endpoint::HttpMethod;
use crate::error::{MonalisaError, Result};

/// Per-request options for [`MonalisaClient::request`] and its blocking
/// counterpart.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method.
    method: HttpMethod,
    /// JSON body, if any.
    body: Option<serde_json::Value>,
    /// Caller-supplied headers; these override same-named defaults.
    headers: HeaderMap,
}

impl RequestOptions {
    /// Creates options for a bodiless request with the given method.
    #[inline]
    #[must_use]
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Sets an already-built JSON body.
    #[inline]
    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`MonalisaError::Serialization`] if `body` cannot be
    /// represented as JSON.
    #[inline]
    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    /// Adds a header, replacing a default header of the same name.
    #[inline]
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        let _appended = self.headers.append(name, value);
        self
    }

    /// Returns the HTTP method.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the JSON body, if any.
    #[inline]
    #[must_use]
    pub const fn json_body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Returns the caller-supplied headers.
    #[inline]
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Error body shape returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    /// Human-readable error detail; FastAPI validation errors use an array.
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Derives the message of a non-success response: the body's `detail`
/// field when present and non-empty, `HTTP <status>` otherwise.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail)
        .and_then(|detail| match detail {
            serde_json::Value::String(text) => (!text.is_empty()).then_some(text),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Builds the outgoing headers: JSON content type, bearer token when
/// present, then caller headers overriding defaults by name.
fn build_headers(token: Option<&SecretString>, extra: &HeaderMap) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let _old = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(secret) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", secret.expose_secret()))?;
        value.set_sensitive(true);
        let _old = headers.insert(AUTHORIZATION, value);
    }
    for name in extra.keys() {
        let _removed = headers.remove(name);
    }
    for (name, value) in extra {
        let _appended = headers.append(name.clone(), value.clone());
    }
    Ok(headers)
}

/// Validates a base URL and strips trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw)?;
    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(MonalisaError::Config(format!(
            "base URL must be an http(s) URL, got {raw:?}"
        )));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

/// Re-labels a rejected login as [`MonalisaError::Auth`].
fn into_auth_error(err: MonalisaError) -> MonalisaError {
    match err {
        MonalisaError::Request { status, message } => MonalisaError::Auth { status, message },
        other => other,
    }
}

/// Generates a Monalisa client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: KeyValueStore = InMemoryStore> {
            /// Explicit base URL (takes precedence over the environment).
            base_url: Option<String>,
            /// Environment whose default base URL is used.
            environment: Environment,
            /// Store backing the session token.
            store: S,
        }

        impl<S: KeyValueStore> $builder<S> {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Selects the backend environment.
            #[inline]
            #[must_use]
            pub fn environment(mut self, environment: Environment) -> Self {
                self.environment = environment;
                self
            }

            /// Applies a resolved [`ClientConfig`].
            #[inline]
            #[must_use]
            pub fn config(mut self, config: ClientConfig) -> Self {
                self.environment = config.environment;
                if config.base_url.is_some() {
                    self.base_url = config.base_url;
                }
                self
            }

            /// Sets the store that persists the session token.
            #[inline]
            #[must_use]
            pub fn store<T: KeyValueStore>(self, store: T) -> $builder<T> {
                $builder {
                    base_url: self.base_url,
                    environment: self.environment,
                    store,
                }
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`MonalisaError::InvalidBaseUrl`] or
            /// [`MonalisaError::Config`] if the base URL is not a valid
            /// http(s) URL.
            /// Returns [`MonalisaError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client<S>> {
                let raw = self
                    .base_url
                    .unwrap_or_else(|| self.environment.base_url().to_owned());
                let base_url = normalize_base_url(&raw)?;
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    base_url,
                    session: Session::new(self.store),
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client<S: KeyValueStore = InMemoryStore> {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL, without trailing slash.
            base_url: String,
            /// Session owning the bearer token.
            session: Session<S>,
        }

        impl $client<InMemoryStore> {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder<InMemoryStore> {
                $builder {
                    base_url: None,
                    environment: Environment::default(),
                    store: InMemoryStore::new(),
                }
            }
        }

        impl<S: KeyValueStore> $client<S> {
            /// Returns the base URL requests are sent to.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Returns the session holding the bearer token.
            #[inline]
            #[must_use]
            pub const fn session(&self) -> &Session<S> {
                &self.session
            }

            /// Logs in with email and password.
            ///
            /// When the response carries an `access_token` it becomes the
            /// session token. The full response is returned either way.
            ///
            /// # Errors
            ///
            /// Returns [`MonalisaError::Auth`] if the backend rejects the
            /// credentials, or a transport/decode/storage error.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(
                &self,
                email: &str,
                password: SecretString,
            ) -> Result<LoginResponse> {
                let credentials = LoginRequest {
                    email: email.to_owned(),
                    password,
                };
                let body = serde_json::to_value(&credentials)?;
                let response: LoginResponse = self
                    .call(&Endpoint::Login, Some(body))
                    $( .$await_ext )?
                    .map_err(into_auth_error)?;
                if let Some(token) = response.access_token.as_ref() {
                    self.session.set_token(token)?;
                    tracing::debug!("login succeeded, session token stored");
                } else {
                    tracing::warn!("login response carried no access token");
                }
                Ok(response)
            }

            /// Clears the session token. Never fails.
            #[inline]
            pub fn logout(&self) {
                self.session.clear();
            }

            /// Checks backend liveness via `/health`.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body is not the
            /// expected JSON.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn health(&self) -> Result<Health> {
                self.call(&Endpoint::Health, None) $( .$await_ext )?
            }

            /// Lists registered merchants.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn merchants(&self) -> Result<MerchantList> {
                self.call(&Endpoint::ListMerchants, None) $( .$await_ext )?
            }

            /// Fetches one merchant.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant = %id))]
            pub $($async_kw)? fn merchant(&self, id: MerchantId) -> Result<Merchant> {
                self.call(&Endpoint::GetMerchant(id), None) $( .$await_ext )?
            }

            /// Registers a merchant.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_merchant(&self, merchant: &NewMerchant) -> Result<Merchant> {
                let body = serde_json::to_value(merchant)?;
                self.call(&Endpoint::CreateMerchant, Some(body)) $( .$await_ext )?
            }

            /// Applies a partial update to a merchant.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant = %id))]
            pub $($async_kw)? fn update_merchant(
                &self,
                id: MerchantId,
                update: &MerchantUpdate,
            ) -> Result<Merchant> {
                let body = serde_json::to_value(update)?;
                self.call(&Endpoint::UpdateMerchant(id), Some(body)) $( .$await_ext )?
            }

            /// Deletes a merchant.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant = %id))]
            pub $($async_kw)? fn delete_merchant(&self, id: MerchantId) -> Result<Message> {
                self.call(&Endpoint::DeleteMerchant(id), None) $( .$await_ext )?
            }

            /// Asks the backend to verify the merchant's provider credentials.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status (including a failed connection test), or the
            /// response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant = %id))]
            pub $($async_kw)? fn test_merchant_connection(
                &self,
                id: MerchantId,
            ) -> Result<ConnectionTest> {
                self.call(&Endpoint::TestMerchantConnection(id), None) $( .$await_ext )?
            }

            /// Mints a QRIS invoice for `amount` (smallest currency unit).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant = %merchant_id, amount = amount))]
            pub $($async_kw)? fn create_qris_invoice(
                &self,
                merchant_id: MerchantId,
                amount: u64,
                description: &str,
            ) -> Result<Invoice> {
                let request = InvoiceRequest {
                    merchant_id,
                    amount,
                    description: description.to_owned(),
                };
                let body = serde_json::to_value(&request)?;
                self.call(&Endpoint::CreateInvoice, Some(body)) $( .$await_ext )?
            }

            /// Checks the payment status of an invoice.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(invoice = %invoice_id))]
            pub $($async_kw)? fn check_qris_status(
                &self,
                invoice_id: &InvoiceId,
            ) -> Result<InvoiceStatus> {
                self.call(&Endpoint::CheckStatus(invoice_id.clone()), None) $( .$await_ext )?
            }

            /// Lists one page of a merchant's QRIS transactions.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant = %merchant_id, page = page, limit = limit))]
            pub $($async_kw)? fn qris_transactions(
                &self,
                merchant_id: MerchantId,
                page: u32,
                limit: u32,
            ) -> Result<TransactionPage> {
                let endpoint = Endpoint::ListTransactions {
                    merchant_id,
                    page,
                    limit,
                };
                self.call(&endpoint, None) $( .$await_ext )?
            }

            /// Fetches one recorded QRIS transaction.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(transaction = %id))]
            pub $($async_kw)? fn qris_transaction(&self, id: TransactionId) -> Result<QrisTransaction> {
                self.call(&Endpoint::GetTransaction(id), None) $( .$await_ext )?
            }

            /// Sends a request to `path` (relative to the base URL) and
            /// decodes the JSON response.
            ///
            /// Attaches `Content-Type: application/json`, the session's
            /// bearer token when one exists, and any headers in `options`.
            /// Exactly one attempt is made.
            ///
            /// # Errors
            ///
            /// Returns [`MonalisaError::Request`] on a non-success status,
            /// [`MonalisaError::Decode`] if a successful body is not the
            /// expected JSON, or [`MonalisaError::Http`] on transport failure.
            #[inline]
            #[tracing::instrument(skip_all, fields(method = %options.method(), path = %path))]
            pub $($async_kw)? fn request<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
                options: RequestOptions,
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                let token = self.session.token();
                tracing::trace!(url = %url, authenticated = token.is_some(), "sending request");
                let headers = build_headers(token.as_ref(), options.headers())?;
                let mut builder = self
                    .http
                    .request(options.method().into(), &url)
                    .headers(headers);
                if let Some(body) = options.json_body() {
                    builder = builder.body(serde_json::to_vec(body)?);
                }
                let response: $resp_type = builder.send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                let body = response.text() $( .$await_ext )? ?;
                if status.is_success() {
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    serde_json::from_str(&body).map_err(MonalisaError::Decode)
                } else {
                    let message = error_message(status.as_u16(), &body);
                    tracing::debug!(status = status.as_u16(), message = %message, "API error");
                    Err(MonalisaError::Request {
                        status: status.as_u16(),
                        message,
                    })
                }
            }

            /// Dispatches an [`Endpoint`] through [`Self::request`].
            $($async_kw)? fn call<Resp: serde::de::DeserializeOwned>(
                &self,
                endpoint: &Endpoint,
                body: Option<serde_json::Value>,
            ) -> Result<Resp> {
                let mut options = RequestOptions::new(endpoint.method());
                if let Some(value) = body {
                    options = options.body(value);
                }
                self.request(&endpoint.path(), options) $( .$await_ext )?
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the Monalisa API.

    use secrecy::SecretString;

    use super::{RequestOptions, build_headers, error_message, into_auth_error, normalize_base_url};
    use crate::config::{ClientConfig, Environment};
    use crate::endpoint::Endpoint;
    use crate::error::{MonalisaError, Result};
    use crate::models::{
        ConnectionTest, Health, Invoice, InvoiceId, InvoiceRequest, InvoiceStatus, LoginRequest,
        LoginResponse, Merchant, MerchantId, MerchantList, MerchantUpdate, Message, NewMerchant,
        QrisTransaction, TransactionId, TransactionPage,
    };
    use crate::session::Session;
    #[cfg(test)]
    use crate::session::SESSION_TOKEN_KEY;
    use crate::storage::{InMemoryStore, KeyValueStore};

    define_client! {
        client_name: MonalisaClient,
        builder_name: MonalisaClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the Monalisa API.\n\nUse [`MonalisaClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`MonalisaClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the Monalisa API.

    use secrecy::SecretString;

    use super::{RequestOptions, build_headers, error_message, into_auth_error, normalize_base_url};
    use crate::config::{ClientConfig, Environment};
    use crate::endpoint::Endpoint;
    use crate::error::{MonalisaError, Result};
    use crate::models::{
        ConnectionTest, Health, Invoice, InvoiceId, InvoiceRequest, InvoiceStatus, LoginRequest,
        LoginResponse, Merchant, MerchantId, MerchantList, MerchantUpdate, Message, NewMerchant,
        QrisTransaction, TransactionId, TransactionPage,
    };
    use crate::session::Session;
    #[cfg(test)]
    use crate::session::SESSION_TOKEN_KEY;
    use crate::storage::{InMemoryStore, KeyValueStore};

    define_client! {
        client_name: MonalisaBlockingClient,
        builder_name: MonalisaBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the Monalisa API.\n\nUse [`MonalisaBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`MonalisaBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{MonalisaClient, MonalisaClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{MonalisaBlockingClient, MonalisaBlockingClientBuilder};
