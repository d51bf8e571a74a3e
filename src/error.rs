use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;

pub type AppResult<T> = Result<T, AppError>;

/// Shown when the backend can't be reached or answers with something unreadable.
pub const OUTAGE_NOTICE: &str = "現在、システムに技術的な問題が発生しています。ご不便をおかけして申し訳ありませんが、復旧までしばらくお待ちください。";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AppError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse request timeout"))]
    ParseTimeout { source: ParseIntError },
    #[snafu(display("Unknown delete transport {:?}, expected `put` or `patch`", found))]
    UnknownDeleteTransport { found: String },
    #[snafu(display("Error building HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("Error sending request to {}", url))]
    SendRequest { source: reqwest::Error, url: String },
    #[snafu(display("Error decoding response from {}", url))]
    DecodeResponse { source: reqwest::Error, url: String },
    #[snafu(display("{}", message))]
    Backend { status: u16, message: String },
    #[snafu(display("Unable to find course {} on student {}", course_id, student_id))]
    MissingCourse {
        student_id: String,
        course_id: String,
    },
    #[snafu(display("Unknown form field {:?}", name))]
    UnknownField { name: String },
}

impl AppError {
    /// Text shown to the user when a mutation is rejected. Backend messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::SendRequest { .. } | Self::DecodeResponse { .. } => OUTAGE_NOTICE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //backend unreachable
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"エラーが発生しました "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::BadEnvVar { .. } => ISE,
            Self::ParseTimeout { .. } => ISE,
            Self::UnknownDeleteTransport { .. } => ISE,
            Self::BuildClient { .. } => ISE,
            Self::SendRequest { .. } => BG,
            Self::DecodeResponse { .. } => BG,
            Self::Backend { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(BG),
            Self::MissingCourse { .. } => NF,
            Self::UnknownField { .. } => BI,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.user_message()))).into_response()
    }
}
