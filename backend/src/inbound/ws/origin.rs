//! Origin allow-list applied to WebSocket upgrades.

use actix_web::HttpRequest;
use actix_web::http::header::{HeaderValue, ORIGIN};
use tracing::{error, warn};
use url::Url;

/// Origins permitted to open a WebSocket.
///
/// An empty policy admits every upgrade, with or without an `Origin` header.
/// Entries are compared by their serialised origin (`scheme://host[:port]`),
/// so paths and trailing slashes in configuration are irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// Admit every origin.
    pub fn any() -> Self {
        Self::default()
    }

    /// Admit only the listed origins.
    ///
    /// # Errors
    /// Returns the first entry that does not parse as a URL.
    pub fn allow<I, S>(origins: I) -> Result<Self, url::ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = origins
            .into_iter()
            .map(|raw| Url::parse(raw.as_ref().trim()).map(|url| url.origin().ascii_serialization()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { allowed })
    }

    /// Whether any origin is accepted.
    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Validate the request's `Origin` header against the policy.
    pub fn check(&self, req: &HttpRequest) -> actix_web::Result<()> {
        if self.is_open() {
            return Ok(());
        }

        let mut origin_iter = req.headers().get_all(ORIGIN);
        let origin_header = origin_iter.next().ok_or_else(|| {
            error!("Missing Origin header on WebSocket upgrade");
            actix_web::error::ErrorForbidden("Origin not allowed")
        })?;
        if origin_iter.next().is_some() {
            error!("Multiple Origin headers on WebSocket upgrade");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }

        self.validate(origin_header)
    }

    fn validate(&self, origin_header: &HeaderValue) -> actix_web::Result<()> {
        let origin_value = origin_header.to_str().map_err(|error| {
            error!(error = %error, "Failed to parse Origin header as string");
            actix_web::error::ErrorBadRequest("Invalid Origin header")
        })?;

        let origin = Url::parse(origin_value).map_err(|error| {
            error!(error = %error, "Failed to parse Origin header as URL");
            actix_web::error::ErrorBadRequest("Invalid Origin header")
        })?;

        let serialised = origin.origin().ascii_serialization();
        if self.allowed.iter().any(|allowed| *allowed == serialised) {
            Ok(())
        } else {
            warn!(
                origin = origin_value,
                "Rejected WS upgrade due to disallowed Origin"
            );
            Err(actix_web::error::ErrorForbidden("Origin not allowed"))
        }
    }
}
