//! Axum router and handlers for the four local RPC operations.
//! JSON-over-HTTP is the transport: each operation is one `POST` route, and
//! the envelope shapes come straight from `rsch_schemas::rpc` so a future
//! binary transport would observe the same fields.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use rsch_schemas::rpc::{
    EditOperation, EditPostReply, EditPostRequest, ListFlairsReply, ListFlairsRequest, ListPostsReply,
    ListPostsRequest, SchedulePostReply, SchedulePostRequest,
};
use rsch_store::StoreCallError;
use tracing::warn;

use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/posts/list", post(list_posts))
        .route("/v1/posts/schedule", post(schedule_post))
        .route("/v1/posts/edit", post(edit_post))
        .route("/v1/flairs/list", post(list_flairs))
        .with_state(state)
}

fn error_msg(err: StoreCallError) -> String {
    err.to_string()
}

async fn list_posts(
    State(st): State<Arc<AppState>>,
    Json(_req): Json<ListPostsRequest>,
) -> Json<ListPostsReply> {
    match st.store.list_all().await {
        Ok(posts) => Json(ListPostsReply {
            error_msg: String::new(),
            posts,
        }),
        Err(e) => Json(ListPostsReply {
            error_msg: error_msg(e),
            posts: Vec::new(),
        }),
    }
}

async fn schedule_post(
    State(st): State<Arc<AppState>>,
    Json(req): Json<SchedulePostRequest>,
) -> Json<SchedulePostReply> {
    let error_msg = match st.store.add(req.post).await {
        Ok(()) => String::new(),
        Err(e) => error_msg(e),
    };
    Json(SchedulePostReply { error_msg })
}

async fn edit_post(
    State(st): State<Arc<AppState>>,
    Json(req): Json<EditPostRequest>,
) -> Json<EditPostReply> {
    let EditOperation::Delete = req.operation;
    let error_msg = match st.store.delete(req.id).await {
        Ok(()) => String::new(),
        Err(e) => error_msg(e),
    };
    Json(EditPostReply { error_msg })
}

/// The only Frontend path that touches the remote API directly. Remote
/// failures degrade to an empty list rather than a protocol error.
async fn list_flairs(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ListFlairsRequest>,
) -> Json<ListFlairsReply> {
    match st.remote.list_user_selectable_flairs(&req.subreddit).await {
        Ok(flairs) => Json(ListFlairsReply { flairs }),
        Err(err) => {
            warn!(subreddit = %req.subreddit, error = %err, "flair listing failed, returning empty list");
            Json(ListFlairsReply { flairs: Vec::new() })
        }
    }
}
