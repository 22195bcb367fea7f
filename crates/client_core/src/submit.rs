//! Ride request submission and the CSRF token it carries.

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use reqwest::{Client, StatusCode};
use shared::domain::RequestId;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
    form::{FormGate, FormGateError, RideRequestForm, SubmitEvent, UserNotifier},
    poller::base_url,
    selection::SelectionState,
};

pub const CSRF_COOKIE_NAME: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Supplies the anti-forgery token attached to form submissions.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

pub struct StaticTokenProvider(pub Option<String>);

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Reads the token out of a `Cookie` header value.
pub struct CookieTokenProvider {
    cookie_header: String,
    name: String,
}

impl CookieTokenProvider {
    pub fn new(cookie_header: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cookie_header: cookie_header.into(),
            name: name.into(),
        }
    }
}

impl TokenProvider for CookieTokenProvider {
    fn token(&self) -> Option<String> {
        read_cookie(&self.cookie_header, &self.name)
    }
}

pub fn read_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
        .and_then(|raw| percent_decode_str(raw).decode_utf8().ok())
        .map(|token| token.into_owned())
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission blocked until pickup and dropoff are selected")]
    Blocked,
    #[error("incomplete selection: {0}")]
    Incomplete(#[from] FormGateError),
    #[error("ride request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected ride request with HTTP {0}")]
    Status(StatusCode),
    #[error("no request id in response url {0}")]
    MissingRequestId(Url),
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

/// Posts the ride request form and follows the server's redirect to the new
/// request's status page.
pub struct RideRequestClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl RideRequestClient {
    pub fn new(
        http: Client,
        server_url: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            base_url: base_url(server_url)?,
            tokens,
        })
    }

    pub async fn submit<N: UserNotifier>(
        &self,
        gate: &mut FormGate<N>,
        selection: &SelectionState,
        form: RideRequestForm,
    ) -> Result<RequestId, SubmitError> {
        let mut event = SubmitEvent::new();
        if !gate.validate_and_maybe_submit(selection, &mut event) {
            return Err(SubmitError::Blocked);
        }

        let mut submission = form.into_submission(selection)?;
        let token = self.tokens.token();
        submission.csrfmiddlewaretoken = token.clone();

        let url = self.base_url.join("customer/request/")?;
        let mut request = self.http.post(url).form(&submission);
        if let Some(token) = token {
            request = request.header(CSRF_HEADER, token);
        }
        let res = request.send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status));
        }

        let landed = res.url().clone();
        let request_id =
            request_id_from_status_url(&landed).ok_or(SubmitError::MissingRequestId(landed))?;
        info!(request_id = request_id.0, "submit: ride request created");
        Ok(request_id)
    }
}

/// Extracts `{id}` from `/customer/ride-status/{id}/`.
pub fn request_id_from_status_url(url: &Url) -> Option<RequestId> {
    let mut segments = url.path_segments()?;
    segments.find(|segment| *segment == "ride-status")?;
    segments.next()?.parse::<i64>().ok().map(RequestId)
}

#[cfg(test)]
#[path = "tests/submit_tests.rs"]
mod tests;
