//! After a successful mutation, the browser that made it re-fetches the lists and details it shows.
//! Nothing is pushed to anyone else.

use axum::{
    http::HeaderName,
    response::{IntoResponse, Response},
};
use maud::Markup;

/// htmx event fired on `body` once a student or course changed. Fragments listen for it with
/// `hx-trigger="students_changed from:body"`.
pub const STUDENTS_CHANGED: &str = "students_changed";
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// A fragment, plus whether it should make the page re-fetch.
#[derive(Debug)]
pub struct Fragment {
    pub markup: Markup,
    pub students_changed: bool,
}

impl Fragment {
    pub const fn unchanged(markup: Markup) -> Self {
        Self {
            markup,
            students_changed: false,
        }
    }

    pub const fn students_changed(markup: Markup) -> Self {
        Self {
            markup,
            students_changed: true,
        }
    }
}

impl IntoResponse for Fragment {
    fn into_response(self) -> Response {
        if self.students_changed {
            ([(HX_TRIGGER, STUDENTS_CHANGED)], self.markup).into_response()
        } else {
            self.markup.into_response()
        }
    }
}
