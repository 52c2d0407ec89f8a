//! HTTP client for the reservation backend.
//!
//! Every endpoint group wraps a shared [`ApiClient`]. Responses may come bare
//! or wrapped in `{ "data": ... }`; both are accepted. Failed responses are
//! turned into [`AppError::Api`] with the best message the body offers.

pub mod activity_logs;
pub mod admin;
pub mod auth;
pub mod checklist;
pub mod dashboard;
pub mod events;
pub mod notifications;
pub mod reservations;

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{
    multipart::{Form, Part},
    Method, RequestBuilder, Response, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::ApiConfig,
    error::{extract_error_message, AppError, AppResult},
    models::upload::UploadFile,
};

/// Shared HTTP client. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Build a client with a cookie store so the session cookie set by
    /// `/auth/login` rides along on every later request.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        self.http.request(method, self.url(path))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        self.send_unit(self.request(Method::DELETE, path)).await
    }

    /// POST/PATCH/PUT a JSON body, ignoring whatever the backend answers
    pub async fn execute<B>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send_unit(request).await
    }

    /// Send a multipart request made of one JSON part and any number of files
    pub async fn send_multipart<T, B>(
        &self,
        method: Method,
        path: &str,
        json_part: &str,
        body: &B,
        files: &[(&str, Option<&UploadFile>)],
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let form = multipart_form(json_part, body, files)?;
        self.send(self.request(method, path).multipart(form)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await?;
        let body = checked_body(response).await?;
        decode_body(&body)
    }

    async fn send_unit(&self, request: RequestBuilder) -> AppResult<()> {
        let response = request.send().await?;
        checked_body(response).await.map(|_| ())
    }
}

/// Read the body, turning non-2xx statuses into [`AppError::Api`]
async fn checked_body(response: Response) -> AppResult<String> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(if status == StatusCode::NO_CONTENT {
            String::new()
        } else {
            body
        });
    }

    let message = extract_error_message(status.as_u16(), &body);
    tracing::warn!("Request to {} failed with {}: {}", url, status, message);
    Err(AppError::api(status.as_u16(), message))
}

/// Decode a success body into the caller's type.
///
/// An empty body becomes whichever of `[]`, `""` or `null` the target type
/// accepts first.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    if body.trim().is_empty() {
        return empty_as::<T>();
    }

    let value: Value = serde_json::from_str(body)?;
    Ok(serde_json::from_value(unwrap_envelope(value))?)
}

fn empty_as<T: DeserializeOwned>() -> AppResult<T> {
    serde_json::from_value(Value::Array(Vec::new()))
        .or_else(|_| serde_json::from_value(Value::String(String::new())))
        .or_else(|_| serde_json::from_value(Value::Null))
        .map_err(AppError::from)
}

/// `{ "data": X }` becomes `X`; anything else is returned unchanged
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn multipart_form<B: Serialize + ?Sized>(
    json_part: &str,
    body: &B,
    files: &[(&str, Option<&UploadFile>)],
) -> AppResult<Form> {
    let json = serde_json::to_vec(body)?;
    let part = Part::bytes(json)
        .mime_str("application/json")
        .map_err(|e| AppError::Internal(format!("Invalid JSON part: {}", e)))?;

    let mut form = Form::new().part(json_part.to_string(), part);
    for (name, file) in files {
        if let Some(file) = file {
            form = form.part(name.to_string(), file.to_part()?);
        }
    }
    Ok(form)
}

static SEGMENT_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("segment base URL is valid"));

/// Percent-encode a path segment such as a public id
pub(crate) fn segment(id: &str) -> String {
    let mut url = SEGMENT_BASE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(id);
    }
    url.path().trim_start_matches('/').to_string()
}

/// All endpoint groups over one client
#[derive(Clone)]
pub struct Api {
    pub auth: auth::AuthApi,
    pub events: events::EventsApi,
    pub reservations: reservations::ReservationsApi,
    pub checklist: checklist::ChecklistApi,
    pub admin: admin::AdminApi,
    pub dashboard: dashboard::DashboardApi,
    pub notifications: notifications::NotificationsApi,
    pub activity_logs: activity_logs::ActivityLogsApi,
}

impl Api {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: auth::AuthApi::new(client.clone()),
            events: events::EventsApi::new(client.clone()),
            reservations: reservations::ReservationsApi::new(client.clone()),
            checklist: checklist::ChecklistApi::new(client.clone()),
            admin: admin::AdminApi::new(client.clone()),
            dashboard: dashboard::DashboardApi::new(client.clone()),
            notifications: notifications::NotificationsApi::new(client.clone()),
            activity_logs: activity_logs::ActivityLogsApi::new(client),
        }
    }
}
