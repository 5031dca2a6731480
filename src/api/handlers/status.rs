use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Status {
    status: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Service is up", body = Status)
    ),
    tag = "tessera"
)]
pub async fn status() -> impl IntoResponse {
    Json(Status {
        status: "OK".to_string(),
    })
}
