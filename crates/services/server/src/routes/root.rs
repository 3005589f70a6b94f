use axum::Json;
use scaffold_models::v0::Example;

/// Example record
#[utoipa::path(
    get,
    path = "/api",
    tag = "Misc",
    responses(
        (status = 200, description = "Example record", body = Example)
    )
)]
pub async fn root() -> Json<Example> {
    Json(Example::new("John Doe", 30))
}
