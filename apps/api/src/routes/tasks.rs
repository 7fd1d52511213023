//! # Task Routes
//!
//! Role-dependent access:
//! - staff see and touch only tasks assigned to them, and may change
//!   nothing but the status;
//! - admins manage the whole board (create/delete/full update behind
//!   the manage-tasks capability where noted).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use trackside_core::validation;
use trackside_core::{Assignee, AuditEvent, Capability, StaffRole, TaskDetail};
use trackside_db::{TaskFilter, TaskInput, TaskStatusUpdate};

use crate::auth::{require, CurrentStaff};
use crate::error::{ApiError, ApiResult};
use crate::events::queue_audit;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/assignees", get(list_assignees))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
}

/// `GET /api/tasks?assignee_id&status`
///
/// The assignee filter is forced to the caller for the staff role, so a
/// till operator can never list the whole board.
async fn list_tasks(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Query(mut filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<TaskDetail>>> {
    if ctx.role == StaffRole::Staff {
        filter.assignee_id = Some(ctx.staff_id);
    }

    let tasks = state.db.tasks().list(&filter).await?;
    Ok(Json(tasks))
}

/// `GET /api/tasks/assignees`: directory of active staff.
async fn list_assignees(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
) -> ApiResult<Json<Vec<Assignee>>> {
    require(&ctx, Capability::ManageTasks)?;

    let assignees = state.db.staff().assignees().await?;
    Ok(Json(assignees))
}

/// `GET /api/tasks/{id}`
async fn get_task(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetail>> {
    let task = state.db.tasks().get_detail(id).await?;

    if ctx.role == StaffRole::Staff && task.task.assignee_id != Some(ctx.staff_id) {
        return Err(ApiError::forbidden());
    }

    Ok(Json(task))
}

/// `POST /api/tasks`
///
/// When a due date is set the repository also records reminder rows for
/// the external scheduler.
async fn create_task(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Json(mut input): Json<TaskInput>,
) -> ApiResult<(StatusCode, Json<TaskDetail>)> {
    require(&ctx, Capability::ManageTasks)?;

    input.title = validation::validate_name(&input.title, "title")?;

    let task = state.db.tasks().create(&input, ctx.staff_id).await?;

    queue_audit(
        &state.db,
        AuditEvent::create(
            ctx.staff_id,
            "task",
            task.task.id,
            serde_json::to_value(&task.task).ok(),
            format!("Created task: {}", task.task.title),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /api/tasks/{id}`
///
/// Two payload shapes share this route: staff send `{"status": ...}`
/// for their own tasks, admins send the full task body.
async fn update_task(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<TaskDetail>> {
    let old = state.db.tasks().get(id).await?;

    let task = if ctx.role == StaffRole::Staff {
        if old.assignee_id != Some(ctx.staff_id) {
            return Err(ApiError::forbidden());
        }

        let update: TaskStatusUpdate = serde_json::from_value(body)
            .map_err(|e| ApiError::validation(format!("Invalid status payload: {e}")))?;

        state.db.tasks().update_status(id, update.status, &old).await?
    } else {
        let mut input: TaskInput = serde_json::from_value(body)
            .map_err(|e| ApiError::validation(format!("Invalid task payload: {e}")))?;

        input.title = validation::validate_name(&input.title, "title")?;

        state.db.tasks().update(id, &input, &old).await?
    };

    queue_audit(
        &state.db,
        AuditEvent::update(
            ctx.staff_id,
            "task",
            task.task.id,
            serde_json::to_value(&old).ok(),
            serde_json::to_value(&task.task).ok(),
            format!("Updated task: {}", task.task.title),
        ),
    )
    .await;

    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}`
async fn delete_task(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&ctx, Capability::ManageTasks)?;

    let old = state.db.tasks().get(id).await?;
    state.db.tasks().delete(id).await?;

    queue_audit(
        &state.db,
        AuditEvent::delete(
            ctx.staff_id,
            "task",
            id,
            serde_json::to_value(&old).ok(),
            format!("Deleted task: {}", old.title),
        ),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackside_core::{TaskPriority, TaskStatus};

    #[test]
    fn test_status_only_payload_decodes() {
        let update: TaskStatusUpdate =
            serde_json::from_value(serde_json::json!({"status": "completed"})).unwrap();
        assert_eq!(update.status, TaskStatus::Completed);
    }

    #[test]
    fn test_full_task_payload_decodes_with_defaults() {
        let input: TaskInput = serde_json::from_value(serde_json::json!({
            "title": "Re-lay crawler course",
        }))
        .unwrap();

        assert_eq!(input.priority, TaskPriority::Medium);
        assert_eq!(input.status, TaskStatus::Pending);
        assert!(input.assignee_id.is_none());
    }

    #[test]
    fn test_full_payload_rejected_as_status_update() {
        // A staff member posting a full body gets a validation error,
        // not a silent partial update.
        let body = serde_json::json!({"title": "Sneaky retitle"});
        assert!(serde_json::from_value::<TaskStatusUpdate>(body).is_err());
    }
}
