use crate::{maud_conveniences::SECONDARY_BUTTON_CLASS, state::AppState};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<AppState>) -> Markup {
    state.render(html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            h1 class="text-2xl font-semibold mb-6 text-center" {
                "受講生管理システム"
            }

            div class="flex flex-row space-x-4 justify-center" {
                a href="/students" class=(SECONDARY_BUTTON_CLASS) {
                    "受講生一覧"
                }
            }
        }
    })
}

/// Cancelling a dialog just empties the dialog area. Nothing was saved, so there's nothing to undo.
pub async fn internal_get_close_dialog() -> Markup {
    html! {}
}
