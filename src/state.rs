use crate::{config::RuntimeConfiguration, data::backend::HttpBackend, error::AppResult};
use maud::{DOCTYPE, Markup, html};
use std::{ops::Deref, sync::Arc};

#[derive(Debug)]
pub struct AppState<B = HttpBackend> {
    backend: Arc<B>,
}

//not derived, so `B` needn't be `Clone`
impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl AppState {
    pub fn new(config: &RuntimeConfiguration) -> AppResult<Self> {
        let backend = HttpBackend::new(config.backend_config())?;
        Ok(Self::with_backend(Arc::new(backend)))
    }
}

impl<B> AppState<B> {
    pub const fn with_backend(backend: Arc<B>) -> Self {
        Self { backend }
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="ja" {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    //otherwise htmx drops 4xx/5xx bodies, and those carry the error notices
                    meta name="htmx-config" content=r#"{"responseHandling":[{"code":"204","swap":false},{"code":".*","swap":true}]}"# {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "受講生管理" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center justify-center text-white p-4" {
                    (markup)
                }
            }
        }
    }
}

impl<B> Deref for AppState<B> {
    type Target = B;

    fn deref(&self) -> &Self::Target {
        &self.backend
    }
}
