use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::{MessageDto, MessageSummaryDto};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{CurrentUser, Employee};
use crate::error::ApiResult;
use crate::extract::ValidJson;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for sending a message
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

/// Received messages, newest first
#[utoipa::path(
    get,
    path = "/api/v1/messages/inbox",
    tag = "messages",
    responses(
        (status = 200, description = "Inbox", body = ApiResponse<Vec<MessageSummaryDto>>),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn get_inbox(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<MessageSummaryDto>>>> {
    let messages = state.messages().get_inbox(current.id()).await?;
    debug!(count = messages.len(), "Inbox loaded");
    Ok(Json(ApiResponse::ok(messages, "Messages retrieved successfully")))
}

/// Sent messages, newest first
#[utoipa::path(
    get,
    path = "/api/v1/messages/sent",
    tag = "messages",
    responses(
        (status = 200, description = "Sent messages", body = ApiResponse<Vec<MessageSummaryDto>>),
        (status = 403, description = "Employee role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, employee), fields(user_id = employee.0.id()))]
pub async fn get_sent(
    State(state): State<AppState>,
    employee: Employee,
) -> ApiResult<Json<ApiResponse<Vec<MessageSummaryDto>>>> {
    let messages = state.messages().get_sent(employee.0.id()).await?;
    Ok(Json(ApiResponse::ok(messages, "Messages retrieved successfully")))
}

/// Number of unread messages
#[utoipa::path(
    get,
    path = "/api/v1/messages/unread-count",
    tag = "messages",
    responses(
        (status = 200, description = "Unread count", body = ApiResponse<UnreadCountResponse>),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ApiResponse<UnreadCountResponse>>> {
    let unread_count = state.messages().get_unread_count(current.id()).await?;
    Ok(Json(ApiResponse::ok(
        UnreadCountResponse { unread_count },
        "Unread count retrieved successfully",
    )))
}

/// Send a message
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<MessageDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Employee role required", body = ErrorResponse),
        (status = 404, description = "Recipient not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, employee, request), fields(sender_id = employee.0.id(), recipient_id = request.recipient_id))]
pub async fn send_message(
    State(state): State<AppState>,
    employee: Employee,
    ValidJson(request): ValidJson<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MessageDto>>)> {
    let messages = state.messages();
    let sent = messages
        .send_message(
            employee.0.id(),
            request.recipient_id,
            &request.subject,
            &request.content,
        )
        .await?;
    let message = messages.get_message(sent.id).await?;

    info!(message_id = message.id, "Message sent");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(message, "Message sent successfully")),
    ))
}

/// Open a message; the recipient's first view marks it read
#[utoipa::path(
    get,
    path = "/api/v1/messages/{id}",
    tag = "messages",
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message", body = ApiResponse<MessageDto>),
        (status = 404, description = "Message not found or not yours", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn get_message(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<MessageDto>>> {
    let message = state.messages().view_message(id, current.id()).await?;
    Ok(Json(ApiResponse::ok(message, "Message retrieved successfully")))
}

/// Mark a message read. `data` is true only if this call changed it.
#[utoipa::path(
    post,
    path = "/api/v1/messages/{id}/read",
    tag = "messages",
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Whether the message went from unread to read", body = ApiResponse<bool>),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn mark_message_read(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    let changed = state.messages().mark_as_read(id, current.id()).await?;
    let message = if changed {
        "Message marked as read"
    } else {
        "Message was already read or is not addressed to you"
    };
    Ok(Json(ApiResponse::ok(changed, message)))
}
