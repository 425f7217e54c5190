/// Rule-based task assistant
///
/// Single-turn and stateless: each message is classified into an
/// [`intent::Intent`], entities are pulled out of the text, and one handler
/// runs against the caller's tasks.
///
/// # Modules
///
/// - [`intent`]: ordered keyword rules mapping text to an intent
/// - [`entities`]: task number, title, description, priority, status, category
/// - [`handlers`]: one operation and reply per intent
///
/// Handler failures never reach the caller as errors; they become an
/// apologetic reply.

pub mod entities;
pub mod handlers;
pub mod intent;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::middleware::AuthContext;
use handlers::ChatbotError;
use intent::{extract_intent, Intent};

/// Reply to one chat message from `ctx`
pub async fn respond(pool: &SqlitePool, ctx: &AuthContext, message: &str) -> String {
    let intent = extract_intent(message);
    info!(user_id = ctx.user_id, %intent, "Chatbot message");

    match dispatch(pool, ctx, intent, message).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(user_id = ctx.user_id, %intent, error = %e, "Chatbot handler failed");
            format!("Sorry, I couldn't process that: {e}")
        }
    }
}

async fn dispatch(
    pool: &SqlitePool,
    ctx: &AuthContext,
    intent: Intent,
    message: &str,
) -> Result<String, ChatbotError> {
    match intent {
        Intent::Create => handlers::handle_create(pool, ctx, message).await,
        Intent::Update => handlers::handle_update(pool, ctx, message).await,
        Intent::Delete => handlers::handle_delete(pool, ctx, message).await,
        Intent::List => handlers::handle_list(pool, ctx, message).await,
        Intent::Status => handlers::handle_status(pool, ctx).await,
        Intent::Help => Ok(handlers::handle_help()),
        Intent::Greeting => Ok(handlers::handle_greeting(ctx)),
        Intent::Unknown => Ok(handlers::handle_unknown()),
    }
}
