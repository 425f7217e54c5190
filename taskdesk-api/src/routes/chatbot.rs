/// Chat assistant endpoint
///
/// `POST /chatbot/chat` with `{"message": "..."}` returns `{"reply": "..."}`.
/// Handler failures are folded into the reply, so an authenticated caller
/// always gets 200 for a well-formed request.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{auth::middleware::AuthContext, chatbot};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn chat(
    State(state): State<AppState>,
    auth: AuthContext,
    req: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(req) = req?;
    let reply = chatbot::respond(&state.db, &auth, &req.message).await;
    Ok(Json(ChatResponse { reply }))
}
