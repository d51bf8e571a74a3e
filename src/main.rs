#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    data::backend::HttpBackend,
    routes::{
        enrollment_status::{internal_get_status_form, internal_post_status},
        index::{get_index_route, internal_get_close_dialog},
        student_detail::{get_student_page, internal_get_student_detail},
        student_form::{
            internal_get_edit_form, internal_get_register_form, internal_post_add_course,
            internal_post_cancel, internal_post_edit, internal_post_remove_course,
            internal_post_reset, internal_put_register,
        },
        students::{delete_student, get_students, internal_get_students},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::env;
use tokio::{net::TcpListener, signal};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod config;
mod data;
mod error;
mod filter;
mod form;
mod maud_conveniences;
mod routes;
mod state;
mod validation;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv {
        //fine as long as the process environment has the variables
        warn!(?e, "No .env file loaded");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    {
        let backend_config = config.backend_config();
        info!(
            base_url = backend_config.base_url(),
            delete_transport = ?backend_config.delete_transport(),
            timeout = ?backend_config.timeout(),
            "Using student backend"
        );
    }
    let state = AppState::new(&config).expect("unable to create state");

    let trace_layer = TraceLayer::new_for_http();
    let compression_layer = CompressionLayer::new();

    let app = Router::new()
        .route("/", get(get_index_route))
        .route(
            "/students",
            get(get_students).delete(delete_student::<HttpBackend>),
        )
        .route("/students/{id}", get(get_student_page))
        .route(
            "/internal/students",
            get(internal_get_students::<HttpBackend>),
        )
        .route(
            "/internal/students/register",
            get(internal_get_register_form).put(internal_put_register::<HttpBackend>),
        )
        .route(
            "/internal/students/form/courses/add",
            post(internal_post_add_course),
        )
        .route(
            "/internal/students/form/courses/remove",
            post(internal_post_remove_course),
        )
        .route(
            "/internal/students/form/reset",
            post(internal_post_reset::<HttpBackend>),
        )
        .route("/internal/students/form/cancel", post(internal_post_cancel))
        .route(
            "/internal/students/{id}",
            get(internal_get_student_detail::<HttpBackend>),
        )
        .route(
            "/internal/students/{id}/edit",
            get(internal_get_edit_form::<HttpBackend>).post(internal_post_edit::<HttpBackend>),
        )
        .route(
            "/internal/students/{id}/courses/{course_id}/status",
            get(internal_get_status_form::<HttpBackend>)
                .post(internal_post_status::<HttpBackend>),
        )
        .route("/internal/dialog/close", get(internal_get_close_dialog))
        .layer(compression_layer)
        .layer(trace_layer)
        .with_state(state);

    let server_ip = env::var("JUKOSEI_SERVER_IP").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
