//! Backend REST client.
//!
//! The hosted backend exposes each table at `{url}/rest/v1/{table}`. Reads are
//! `GET` requests filtered with `column=eq.value` parameters; writes are `POST`
//! requests that ask for the inserted rows back.

use reqwest::{
    Client, Method, Request, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

/// Configuration for connecting to the backend.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project URL, e.g. `"https://project.example.co"`.
    pub url: String,

    /// Public anonymous API key.
    pub anon_key: String,

    /// Signed-in user's access token, if any.
    pub access_token: Option<String>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Violated database constraint reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Unique key already present
    Unique,
    /// Referenced row does not exist
    ForeignKey,
    /// Required column missing
    NotNull,
    /// Check constraint failed
    Check,
}

impl ConstraintViolation {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(Self::Unique),
            "23503" => Some(Self::ForeignKey),
            "23502" => Some(Self::NotNull),
            "23514" => Some(Self::Check),
            _ => None,
        }
    }
}

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend rejected request with status {status}: {message}")]
    Rejected {
        /// Response status
        status: StatusCode,
        /// Database error code, when the backend reported one
        code: Option<String>,
        /// Error message or raw body
        message: String,
    },

    /// The backend answered with a body this client does not understand.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),
}

impl BackendError {
    /// Constraint the rejected write violated, if that is why it failed.
    pub fn violation(&self) -> Option<ConstraintViolation> {
        match self {
            Self::Rejected {
                code: Some(code), ..
            } => ConstraintViolation::from_code(code),
            _ => None,
        }
    }

    /// Whether the backend refused the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                status: StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN,
                ..
            }
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Filters, ordering and column selection for a table read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// Query with no filters; every column of every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns (and embedded relations) to return.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    /// Keep rows where `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl AsRef<str>) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.as_ref())));
        self
    }

    /// Sort ascending by `column`.
    #[must_use]
    pub fn order_asc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.asc")));
        self
    }

    /// Sort descending by `column`.
    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.desc")));
        self
    }

    /// Return at most `count` rows.
    #[must_use]
    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Query-string parameters in the order they were added.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// HTTP client for the backend's table interface.
#[derive(Debug, Clone)]
pub struct Backend {
    config: BackendConfig,
    http: Client,
}

impl Backend {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Endpoint for a table.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url.trim_end_matches('/'))
    }

    /// Build a read request without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or headers are invalid.
    pub fn select_request(&self, table: &str, query: &Query) -> Result<Request, BackendError> {
        Ok(self
            .authorized(Method::GET, table)?
            .query(query.params())
            .build()?)
    }

    /// Build an insert request without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL, headers or body are invalid.
    pub fn insert_request<B>(&self, table: &str, rows: &B) -> Result<Request, BackendError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self
            .authorized(Method::POST, table)?
            .header("Prefer", "return=representation")
            .json(rows)
            .build()?)
    }

    /// Read rows from a table.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx status or an unexpected body.
    pub async fn select<T>(&self, table: &str, query: &Query) -> Result<Vec<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        debug!(table, params = ?query.params(), "selecting rows");

        let request = self.select_request(table, query)?;

        self.execute(request).await
    }

    /// Insert one row or an array of rows and return what was stored.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx status or an unexpected body.
    pub async fn insert<B, T>(&self, table: &str, rows: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "inserting rows");

        let request = self.insert_request(table, rows)?;

        self.execute(request).await
    }

    fn authorized(
        &self,
        method: Method,
        table: &str,
    ) -> Result<reqwest::RequestBuilder, BackendError> {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key);

        let mut authorization = HeaderValue::from_str(&format!("Bearer {bearer}"))
            .map_err(|error| BackendError::UnexpectedResponse(error.to_string()))?;
        authorization.set_sensitive(true);

        let mut apikey = HeaderValue::from_str(&self.config.anon_key)
            .map_err(|error| BackendError::UnexpectedResponse(error.to_string()))?;
        apikey.set_sensitive(true);

        Ok(self
            .http
            .request(method, self.table_url(table))
            .header("apikey", apikey)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json"))
    }

    async fn execute<T>(&self, request: Request) -> Result<Vec<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        let response = self.http.execute(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|error| format!("failed to read error body: {error}"));

            return Err(rejection(status, text));
        }

        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|error| {
            BackendError::UnexpectedResponse(format!("failed to decode rows: {error}"))
        })
    }
}

fn rejection(status: StatusCode, text: String) -> BackendError {
    let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.code, body.message.unwrap_or(text)),
        Err(_) => (None, text),
    };

    BackendError::Rejected {
        status,
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn backend(access_token: Option<&str>) -> Backend {
        Backend::new(BackendConfig {
            url: "https://project.example.co/".to_string(),
            anon_key: "anon-key".to_string(),
            access_token: access_token.map(str::to_string),
        })
    }

    #[test]
    fn table_url_ignores_trailing_slash() {
        assert_eq!(
            backend(None).table_url("products"),
            "https://project.example.co/rest/v1/products"
        );
    }

    #[test]
    fn select_request_encodes_filters_in_order() -> TestResult {
        let query = Query::new()
            .select("*,order_items(*)")
            .eq("id", "o-1")
            .eq("user_id", "u-1");

        let request = backend(None).select_request("orders", &query)?;

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/orders");

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(
            pairs,
            [
                ("select".to_string(), "*,order_items(*)".to_string()),
                ("id".to_string(), "eq.o-1".to_string()),
                ("user_id".to_string(), "eq.u-1".to_string()),
            ]
        );

        Ok(())
    }

    #[test]
    fn anonymous_requests_use_anon_key_as_bearer() -> TestResult {
        let request = backend(None).select_request("products", &Query::new())?;

        assert_eq!(
            request.headers().get("apikey").map(HeaderValue::as_bytes),
            Some(b"anon-key".as_slice())
        );
        assert_eq!(
            request.headers().get(AUTHORIZATION).map(HeaderValue::as_bytes),
            Some(b"Bearer anon-key".as_slice())
        );

        Ok(())
    }

    #[test]
    fn signed_in_requests_use_access_token() -> TestResult {
        let request = backend(Some("user-token")).select_request("orders", &Query::new())?;

        assert_eq!(
            request.headers().get(AUTHORIZATION).map(HeaderValue::as_bytes),
            Some(b"Bearer user-token".as_slice())
        );

        Ok(())
    }

    #[test]
    fn insert_request_asks_for_representation() -> TestResult {
        let rows = serde_json::json!([{ "title": "Late" }]);
        let request = backend(None).insert_request("issues", &rows)?;

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.headers().get("Prefer").map(HeaderValue::as_bytes),
            Some(b"return=representation".as_slice())
        );
        assert_eq!(
            request.body().and_then(reqwest::Body::as_bytes),
            Some(br#"[{"title":"Late"}]"#.as_slice())
        );

        Ok(())
    }

    #[test]
    fn ordering_and_limit_params() {
        let query = Query::new().order_asc("name").order_desc("created_at").limit(5);

        assert_eq!(
            query.params(),
            [
                ("order".to_string(), "name.asc".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn constraint_codes_are_recognised() {
        let error = BackendError::Rejected {
            status: StatusCode::CONFLICT,
            code: Some("23505".to_string()),
            message: "duplicate key".to_string(),
        };

        assert_eq!(error.violation(), Some(ConstraintViolation::Unique));
        assert!(!error.is_unauthorized());

        let error = BackendError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            code: Some("PGRST301".to_string()),
            message: "JWT expired".to_string(),
        };

        assert_eq!(error.violation(), None);
        assert!(error.is_unauthorized());
    }

    #[test]
    fn rejection_reads_code_and_message_from_body() {
        let error = rejection(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key"}"#.to_string(),
        );

        assert_eq!(error.violation(), Some(ConstraintViolation::Unique));
        assert!(error.to_string().contains("duplicate key"));
    }

    #[test]
    fn rejection_keeps_unparsed_body_as_message() -> TestResult {
        let error = rejection(
            StatusCode::BAD_GATEWAY,
            "failed to read error body: connection reset".to_string(),
        );

        let BackendError::Rejected { code, message, .. } = error else {
            return Err(format!("expected a rejection, got {error:?}").into());
        };

        assert_eq!(code, None);
        assert_eq!(message, "failed to read error body: connection reset");

        Ok(())
    }
}
