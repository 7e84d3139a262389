//! Request executor.
//!
//! Performs one HTTP exchange for a procedure call and turns the response into a
//! [`Payload`]:
//!
//! 1. headers from the provider, then `Accept: application/json`, then
//!    `Content-Type: application/json` on non-`GET` methods
//! 2. a JSON body on non-`GET` methods only
//! 3. one transport call
//! 4. JSON or text payload by content type, [`crate::Error::RequestFailed`] on non-2xx
//!
//! There are no retries and no timeout at this level.

use bytes::Bytes;
use serde_json::Value;
use tracing::trace;

use crate::config::HeadersFn;
use crate::{APPLICATION_JSON, HttpClient, Method, Payload, Request, Result};

/// Execute one request and parse its response.
///
/// # Errors
///
/// - [`crate::Error::InvalidUrl`] if `url` does not parse
/// - [`crate::Error::JsonSerialization`] if the body cannot be serialized
/// - transport errors, unchanged
/// - [`crate::Error::JsonDeserialization`] if a JSON response is invalid
/// - [`crate::Error::RequestFailed`] for non-2xx statuses, with the parsed body
pub async fn execute<C>(
    client: &C,
    method: Method,
    url: &str,
    body: Option<&Value>,
    headers: Option<&HeadersFn>,
) -> Result<Payload>
where
    C: HttpClient,
{
    let request = build_request(method, url, body, headers)?;
    trace!(
        %method,
        url = %request.url(),
        has_body = request.body().is_some(),
        "executing procedure request"
    );

    let response = client.execute(request).await?;
    trace!(
        status = response.status(),
        content_type = ?response.content_type(),
        "procedure response"
    );

    response.into_payload()
}

fn build_request(
    method: Method,
    url: &str,
    body: Option<&Value>,
    headers: Option<&HeadersFn>,
) -> Result<Request<Bytes>> {
    let url = url::Url::parse(url)?;
    let caller_headers = headers.and_then(|provider| provider()).unwrap_or_default();

    let mut builder = Request::builder(method, url)
        .headers(caller_headers)
        .header("Accept", APPLICATION_JSON);

    if method.carries_body() {
        builder = builder.header("Content-Type", APPLICATION_JSON);
        if let Some(body) = body {
            builder = builder.body(crate::to_json(body)?);
        }
    }

    Ok(builder.build())
}
