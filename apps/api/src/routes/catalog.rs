use axum::Json;

use crate::guidance::templates::{topic_catalog, TopicCard};
use crate::llm_client::catalog::{model_options, ModelOption};

/// GET /api/v1/topics
pub async fn handle_list_topics() -> Json<Vec<TopicCard>> {
    Json(topic_catalog())
}

/// GET /api/v1/models
///
/// Every selectable model id, with its descriptive card when one exists.
pub async fn handle_list_models() -> Json<Vec<ModelOption>> {
    Json(model_options())
}
