//! # Task Repository
//!
//! The staff task board. Creating a task with a due date also records
//! reminder rows (due−24h, due−1h) that an external scheduler delivers;
//! updates never touch reminders.
//!
//! Status transitions manage `completed_at`:
//! - entering `completed` stamps it,
//! - leaving `completed` clears it,
//! - staying `completed` keeps the original stamp.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use trackside_core::{Task, TaskDetail, TaskPriority, TaskStatus};

use crate::error::{DbError, DbResult};

/// Filters for the task list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub assignee_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
}

/// Fields accepted when creating or fully updating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
}

/// Status-only update payload, the one mutation assignees may perform
/// on their own tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

/// Column list shared by the joined task queries.
const TASK_DETAIL_COLUMNS: &str = r#"
    t.id, t.title, t.description, t.assignee_id, t.priority, t.status,
    t.due_date, t.completed_at, t.created_by, t.created_at, t.updated_at,
    a.full_name AS assignee_name, cr.full_name AS created_by_name
"#;

/// Repository for task operations.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Creates a new TaskRepository.
    pub fn new(pool: PgPool) -> Self {
        TaskRepository { pool }
    }

    /// Lists tasks, soonest due first. Both filters are optional; the
    /// API layer forces `assignee_id` for plain staff callers.
    pub async fn list(&self, filter: &TaskFilter) -> DbResult<Vec<TaskDetail>> {
        let sql = format!(
            r#"
            SELECT {TASK_DETAIL_COLUMNS}
            FROM tasks t
            LEFT JOIN staff a ON t.assignee_id = a.id
            LEFT JOIN staff cr ON t.created_by = cr.id
            WHERE ($1::uuid IS NULL OR t.assignee_id = $1)
              AND ($2::task_status IS NULL OR t.status = $2)
            ORDER BY t.due_date ASC, t.created_at DESC
            "#
        );

        let tasks = sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(filter.assignee_id)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    /// Gets a bare task row (for permission checks and audit snapshots).
    pub async fn get(&self, id: Uuid) -> DbResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, assignee_id, priority, status,
                   due_date, completed_at, created_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        task.ok_or_else(|| DbError::not_found("Task", id))
    }

    /// Gets a task with assignee and creator names joined.
    pub async fn get_detail(&self, id: Uuid) -> DbResult<TaskDetail> {
        let sql = format!(
            r#"
            SELECT {TASK_DETAIL_COLUMNS}
            FROM tasks t
            LEFT JOIN staff a ON t.assignee_id = a.id
            LEFT JOIN staff cr ON t.created_by = cr.id
            WHERE t.id = $1
            "#
        );

        let task = sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        task.ok_or_else(|| DbError::not_found("Task", id))
    }

    /// Creates a task, writing reminder rows in the same transaction
    /// when a due date is set.
    pub async fn create(&self, input: &TaskInput, created_by: Uuid) -> DbResult<TaskDetail> {
        let id = Uuid::new_v4();
        debug!(task_id = %id, title = %input.title, "Creating task");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, assignee_id, priority, status,
                               due_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.assignee_id)
        .bind(input.priority)
        .bind(input.status)
        .bind(input.due_date)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        if let Some(due) = input.due_date {
            sqlx::query(
                r#"
                INSERT INTO task_reminders (task_id, remind_at)
                VALUES ($1, $2), ($1, $3)
                "#,
            )
            .bind(id)
            .bind(due - Duration::hours(24))
            .bind(due - Duration::hours(1))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_detail(id).await
    }

    /// Fully updates a task. The caller supplies the old row (already
    /// fetched for the audit snapshot) so the `completed_at` transition
    /// is computed without a second read.
    pub async fn update(&self, id: Uuid, input: &TaskInput, old: &Task) -> DbResult<TaskDetail> {
        debug!(task_id = %id, "Updating task");

        let completed_at = transition_completed_at(input.status, old.status, old.completed_at);

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $1, description = $2, assignee_id = $3, priority = $4,
                status = $5, due_date = $6, completed_at = $7, updated_at = now()
            WHERE id = $8
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.assignee_id)
        .bind(input.priority)
        .bind(input.status)
        .bind(input.due_date)
        .bind(completed_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }

        self.get_detail(id).await
    }

    /// Updates only the status. Same `completed_at` rules as `update`.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        old: &Task,
    ) -> DbResult<TaskDetail> {
        debug!(task_id = %id, status = ?status, "Updating task status");

        let completed_at = transition_completed_at(status, old.status, old.completed_at);

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET status = $1, completed_at = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(status)
        .bind(completed_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }

        self.get_detail(id).await
    }

    /// Deletes a task. Reminder rows go with it by cascade.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(task_id = %id, "Deleting task");

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }
        Ok(())
    }
}

/// `completed_at` for a status change, given the previous state.
fn transition_completed_at(
    new_status: TaskStatus,
    old_status: TaskStatus,
    old_completed_at: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (new_status.is_completed(), old_status.is_completed()) {
        (true, true) => old_completed_at,
        (true, false) => Some(Utc::now()),
        (false, _) => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completing_stamps_timestamp() {
        let stamped =
            transition_completed_at(TaskStatus::Completed, TaskStatus::InProgress, None);
        assert!(stamped.is_some());
    }

    #[test]
    fn test_staying_completed_keeps_original_stamp() {
        let original = Utc::now() - Duration::days(3);
        let kept = transition_completed_at(
            TaskStatus::Completed,
            TaskStatus::Completed,
            Some(original),
        );
        assert_eq!(kept, Some(original));
    }

    #[test]
    fn test_reopening_clears_timestamp() {
        let cleared = transition_completed_at(
            TaskStatus::InProgress,
            TaskStatus::Completed,
            Some(Utc::now()),
        );
        assert!(cleared.is_none());

        let cancelled = transition_completed_at(
            TaskStatus::Cancelled,
            TaskStatus::Completed,
            Some(Utc::now()),
        );
        assert!(cancelled.is_none());
    }

    #[test]
    fn test_input_defaults() {
        let input: TaskInput = serde_json::from_str(r#"{"title": "Oil the crawler track"}"#)
            .unwrap();
        assert_eq!(input.priority, TaskPriority::Medium);
        assert_eq!(input.status, TaskStatus::Pending);
        assert!(input.due_date.is_none());
    }
}
