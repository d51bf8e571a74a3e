use crate::{
    config::{BackendConfig, DeleteTransport},
    data::{EnrollmentStatusUpdate, StudentBackend, StudentDetail},
    error::{AppError, AppResult, BuildClientSnafu, DecodeResponseSnafu, SendRequestSnafu},
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use snafu::ResultExt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    config: Arc<BackendConfig>,
}

impl HttpBackend {
    pub fn new(config: Arc<BackendConfig>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context(BuildClientSnafu)?;

        Ok(Self { client, config })
    }

    async fn send(&self, method: Method, path: &str, build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> AppResult<Response> {
        let url = self.config.url(path);
        debug!(%method, %url, "Calling backend");

        let response = build(self.client.request(method, &url))
            .send()
            .await
            .context(SendRequestSnafu { url: url.clone() })?;

        check_response(response).await
    }

    async fn send_for_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> AppResult<T> {
        let url = self.config.url(path);
        self.send(method, path, build)
            .await?
            .json()
            .await
            .context(DecodeResponseSnafu { url })
    }
}

impl StudentBackend for HttpBackend {
    async fn list_students(&self) -> AppResult<Vec<StudentDetail>> {
        self.send_for_json(Method::GET, "/students", |rb| rb).await
    }

    async fn get_student(&self, id: &str) -> AppResult<StudentDetail> {
        self.send_for_json(Method::GET, &format!("/students/{id}"), |rb| rb)
            .await
    }

    async fn register_student(&self, detail: &StudentDetail) -> AppResult<StudentDetail> {
        self.send_for_json(Method::POST, "/students", |rb| rb.json(detail))
            .await
    }

    async fn update_student(&self, detail: &StudentDetail) -> AppResult<()> {
        self.send(Method::PUT, "/students", |rb| rb.json(detail))
            .await
            .map(drop)
    }

    async fn soft_delete_student(&self, detail: &StudentDetail) -> AppResult<()> {
        match self.config.delete_transport() {
            DeleteTransport::Put => self.update_student(detail).await,
            DeleteTransport::Patch => self
                .send(
                    Method::PATCH,
                    &format!("/students/{}", detail.student.id),
                    |rb| rb.json(detail),
                )
                .await
                .map(drop),
        }
    }

    async fn update_enrollment_status(&self, update: &EnrollmentStatusUpdate) -> AppResult<()> {
        self.send(
            Method::POST,
            "/students/courses/enrollment-status",
            |rb| rb.json(update),
        )
        .await
        .map(drop)
    }
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Passes 2xx responses through; anything else becomes [`AppError::Backend`] carrying the body's
/// `message` (or `error`) field.
pub async fn check_response(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let ErrorBody { message, error } = serde_json::from_str(&body).unwrap_or_default();
    let message = message
        .or(error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "バックエンドとの通信に失敗しました (status {})",
                status.as_u16()
            )
        });

    warn!(status = status.as_u16(), %message, "Backend rejected request");
    Err(AppError::Backend {
        status: status.as_u16(),
        message,
    })
}
