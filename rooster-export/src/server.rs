use std::{io, net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use log::info;
use rooster_parser::Exporter;
use serde::Deserialize;
use tokio::{net::TcpListener, signal};

const CALENDAR_PATH: &str = "/calendar";

pub fn router(exporter: Exporter) -> Router {
    Router::new()
        .route(CALENDAR_PATH, post(handle_calendar))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .with_state(Arc::new(exporter))
}

pub async fn serve(address: SocketAddr, exporter: Exporter) -> io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Listening at http://{address}{CALENDAR_PATH}");

    axum::serve(listener, router(exporter))
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
}

#[derive(Deserialize)]
struct CalendarQuery {
    #[serde(default)]
    json: bool,
}

/// Converts a posted label list or week-view page into a calendar.
async fn handle_calendar(
    State(exporter): State<Arc<Exporter>>,
    Query(query): Query<CalendarQuery>,
    body: String,
) -> Response {
    let labels = Exporter::labels_from_document(&body);
    let calendar = exporter.calendar(&labels);
    info!(
        "Converted {} labels into {} events",
        labels.len(),
        calendar.len()
    );

    if query.json {
        return Json(calendar).into_response();
    }

    (
        [("content-type", "text/calendar; charset=utf-8")],
        calendar.to_ics(),
    )
        .into_response()
}
