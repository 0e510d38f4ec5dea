use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::billing::time_billed::check_minutes;
use crate::error::{StoreError, ValidationError};
use crate::models::task::{NewTask, Task, TaskRow, TaskUpdate};

// Ids that matched no row are skipped and listed in `not_found`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateReport {
    pub updated_count: u64,
    pub not_found: Vec<i64>,
}

pub struct TaskStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, task_descr, client_number, matter_number, time_billed, date
             FROM tasks
             ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    pub async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, task_descr, client_number, matter_number, time_billed, date
             FROM tasks
             WHERE date = ?
             ORDER BY id",
        )
        .bind(date)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    /// Inserts every task or none of them. Tasks without a date are filed under `today`.
    pub async fn create_many(
        &self,
        tasks: Vec<NewTask>,
        today: NaiveDate,
    ) -> Result<Vec<Task>, StoreError> {
        check_new_tasks(&tasks)?;

        let mut tx = self.pool.begin().await?;
        let created = insert_tasks(&mut tx, tasks, today).await?;
        tx.commit().await?;

        info!("Created {} tasks", created.len());
        Ok(created)
    }

    pub async fn update_many(&self, updates: Vec<TaskUpdate>) -> Result<UpdateReport, StoreError> {
        check_updates(&updates)?;

        let mut tx = self.pool.begin().await?;
        let report = apply_updates(&mut tx, &updates).await?;
        tx.commit().await?;

        info!(
            "Updated {} tasks ({} not found)",
            report.updated_count,
            report.not_found.len()
        );
        Ok(report)
    }

    // Updates and inserts in a single transaction: either both land or neither does
    pub async fn commit_batch(
        &self,
        updates: Vec<TaskUpdate>,
        creates: Vec<NewTask>,
        today: NaiveDate,
    ) -> Result<(UpdateReport, Vec<Task>), StoreError> {
        check_updates(&updates)?;
        check_new_tasks(&creates)?;

        let mut tx = self.pool.begin().await?;
        let report = apply_updates(&mut tx, &updates).await?;
        let created = insert_tasks(&mut tx, creates, today).await?;
        tx.commit().await?;

        info!(
            "Committed batch: {} updated ({} not found), {} created",
            report.updated_count,
            report.not_found.len(),
            created.len()
        );
        Ok((report, created))
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_matter(&self, matter_number: &str) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM tasks WHERE matter_number = ?")
            .bind(matter_number)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(
            "Deleted {} tasks for matter {}",
            result.rows_affected(),
            matter_number
        );
        Ok(result.rows_affected())
    }
}

async fn insert_tasks(
    conn: &mut SqliteConnection,
    tasks: Vec<NewTask>,
    today: NaiveDate,
) -> Result<Vec<Task>, StoreError> {
    let mut created = Vec::with_capacity(tasks.len());

    for task in tasks {
        let date = task.date.unwrap_or(today);
        let result = sqlx::query(
            "INSERT INTO tasks (task_descr, client_number, matter_number, time_billed, date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&task.task_descr)
        .bind(&task.client_number)
        .bind(&task.matter_number)
        .bind(minutes_column(task.time_billed)?)
        .bind(date)
        .execute(&mut *conn)
        .await?;

        created.push(Task {
            id: result.last_insert_rowid(),
            task_descr: task.task_descr,
            client_number: task.client_number,
            matter_number: task.matter_number,
            time_billed: task.time_billed,
            date: Some(date),
        });
    }
    Ok(created)
}

async fn apply_updates(
    conn: &mut SqliteConnection,
    updates: &[TaskUpdate],
) -> Result<UpdateReport, StoreError> {
    let mut report = UpdateReport::default();

    for update in updates {
        let result = sqlx::query(
            "UPDATE tasks
             SET task_descr = ?, time_billed = ?, client_number = ?, matter_number = ?
             WHERE id = ?",
        )
        .bind(&update.task_descr)
        .bind(minutes_column(update.time_billed)?)
        .bind(&update.client_number)
        .bind(&update.matter_number)
        .bind(update.id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            warn!("Task {} not found, skipping update", update.id);
            report.not_found.push(update.id);
        } else {
            report.updated_count += result.rows_affected();
        }
    }
    Ok(report)
}

fn check_new_tasks(tasks: &[NewTask]) -> Result<(), ValidationError> {
    for (index, task) in tasks.iter().enumerate() {
        check_identifiers(&task.client_number, &task.matter_number)
            .and_then(|_| check_minutes("time_billed", task.time_billed))
            .map_err(|e| e.at(index))?;
    }
    Ok(())
}

fn check_updates(updates: &[TaskUpdate]) -> Result<(), ValidationError> {
    for (index, update) in updates.iter().enumerate() {
        check_identifiers(&update.client_number, &update.matter_number)
            .and_then(|_| check_minutes("time_billed", update.time_billed))
            .map_err(|e| e.at(index))?;
    }
    Ok(())
}

fn check_identifiers(client_number: &str, matter_number: &str) -> Result<(), ValidationError> {
    if client_number.trim().is_empty() {
        return Err(ValidationError::MissingField("client_number"));
    }
    if matter_number.trim().is_empty() {
        return Err(ValidationError::MissingField("matter_number"));
    }
    Ok(())
}

fn minutes_column(minutes: Decimal) -> Result<f64, ValidationError> {
    minutes
        .to_f64()
        .filter(|m| m.is_finite())
        .ok_or_else(|| ValidationError::TooLarge {
            field: "time_billed",
            max: f64::MAX.to_string(),
            value: minutes.to_string(),
        })
}
