//! One function per backend endpoint.
//!
//! Responses are parsed into the `common::req` shapes right here, so the
//! rest of the app only ever sees typed data or a [`FetchError`]. Every
//! request carries the session cookie and is raced against a fixed
//! timeout. There are no retries; a failed call is failed until the user
//! triggers it again.

use chrono::{DateTime, SecondsFormat, Utc};
use common::req::*;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::FetchError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

fn api_url(endpoint: &str) -> String {
    format!("{}/{endpoint}", base_url())
}

fn base_url() -> String {
    // compile-time override for deployments where the API is not
    // served from the page's origin
    if let Some(base) = option_env!("FLOWSIGHT_API_BASE") {
        return base.trim_end_matches('/').to_string();
    }
    let location = web_sys::window().unwrap().location();
    format!(
        "{}//{}",
        location.protocol().unwrap(),
        location.host().unwrap()
    )
}

fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
    #[cfg(target_arch = "wasm32")]
    let builder = builder.fetch_credentials_include();
    builder.header(ACCEPT, "application/json")
}

#[cfg(target_arch = "wasm32")]
async fn with_timeout<T>(
    fut: impl std::future::Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    use futures::future::{select, Either};
    use futures::pin_mut;

    let timeout = gloo_timers::future::TimeoutFuture::new((REQUEST_TIMEOUT_SECS * 1000) as u32);
    pin_mut!(fut);
    pin_mut!(timeout);
    match select(fut, timeout).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(FetchError::Timeout(REQUEST_TIMEOUT_SECS)),
    }
}

// browser timers are unavailable off-wasm; the transport default applies
#[cfg(not(target_arch = "wasm32"))]
async fn with_timeout<T>(
    fut: impl std::future::Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    fut.await
}

/// Turn a settled response into the typed body, converting non-success
/// statuses and undecodable bodies into the error taxonomy.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let detail = match response.json::<ApiMessage>().await {
            Ok(msg) if !msg.detail.is_empty() => msg.detail,
            _ => default_detail(status),
        };
        return Err(FetchError::Api {
            status: status.as_u16(),
            detail,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::UnexpectedShape(e.to_string()))
}

fn default_detail(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

async fn get_json<T: DeserializeOwned>(endpoint: &str) -> Result<T, FetchError> {
    with_timeout(async {
        let response = with_credentials(reqwest::Client::new().get(api_url(endpoint)))
            .send()
            .await?;
        decode(response).await
    })
    .await
}

pub async fn login(credentials: &Credentials) -> Result<AuthResponse, FetchError> {
    with_timeout(async {
        let response = with_credentials(reqwest::Client::new().post(api_url("login")))
            .json(credentials)
            .send()
            .await?;
        decode(response).await
    })
    .await
}

pub async fn register(request: &RegisterRequest) -> Result<AuthResponse, FetchError> {
    with_timeout(async {
        let response = with_credentials(reqwest::Client::new().post(api_url("register")))
            .json(request)
            .send()
            .await?;
        decode(response).await
    })
    .await
}

pub async fn reset_password(email: &str) -> Result<(), FetchError> {
    with_timeout(async {
        let body = serde_json::json!({ "email": email });
        let response = with_credentials(reqwest::Client::new().post(api_url("reset-password")))
            .json(&body)
            .send()
            .await?;
        decode::<serde_json::Value>(response).await.map(|_| ())
    })
    .await
}

/// Selector catalog for the dashboard.
pub async fn devices() -> Result<Vec<Device>, FetchError> {
    get_json("devices").await
}

/// Admin catalog, including devices outside the caller's organisation.
pub async fn admin_devices() -> Result<Vec<Device>, FetchError> {
    get_json("admindevices").await
}

/// Raw readings for one device within [start, end].
pub async fn readings(
    device_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Reading>, FetchError> {
    with_timeout(async {
        let url = api_url(&format!("data/{device_id}"));
        let response = with_credentials(reqwest::Client::new().get(url).query(&[
            ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("end", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ]))
        .send()
        .await?;
        decode(response).await
    })
    .await
}

pub async fn organisations() -> Result<Vec<Organisation>, FetchError> {
    get_json("organisations").await
}

pub async fn organisation(id: i64) -> Result<Organisation, FetchError> {
    get_json(&format!("organisations/{id}")).await
}

pub async fn create_organisation(
    payload: &OrganisationPayload,
) -> Result<Organisation, FetchError> {
    with_timeout(async {
        let response = with_credentials(reqwest::Client::new().post(api_url("organisations")))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    })
    .await
}

pub async fn update_organisation(
    id: i64,
    payload: &OrganisationPayload,
) -> Result<Organisation, FetchError> {
    with_timeout(async {
        let url = api_url(&format!("organisations/{id}"));
        let response = with_credentials(reqwest::Client::new().put(url))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    })
    .await
}

pub async fn users() -> Result<Vec<User>, FetchError> {
    get_json("users").await
}

pub async fn update_user(user: &User) -> Result<User, FetchError> {
    with_timeout(async {
        let url = api_url(&format!("users/{}", user.id));
        let response = with_credentials(reqwest::Client::new().put(url))
            .json(user)
            .send()
            .await?;
        decode(response).await
    })
    .await
}

pub async fn roles() -> Result<Vec<RoleEntry>, FetchError> {
    get_json("roles").await
}

pub async fn update_device(device: &Device) -> Result<Device, FetchError> {
    with_timeout(async {
        let url = api_url(&format!("devices/{}", device.device_id));
        let response = with_credentials(reqwest::Client::new().put(url))
            .json(device)
            .send()
            .await?;
        decode(response).await
    })
    .await
}
