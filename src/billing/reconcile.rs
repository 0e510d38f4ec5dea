use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::time_billed::{check_minutes, combine_hours_minutes, parse_minutes};
use crate::error::{StoreError, ValidationError};
use crate::models::task::{
    optional_date, parse_task_id, required_identifier, required_text, NewTask, Task, TaskUpdate,
};
use crate::store::{TaskStore, UpdateReport};

// Rows added in the form carry this id prefix until they are created
pub const PLACEHOLDER_PREFIX: &str = "new-";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowEdit {
    pub id: Option<Value>,
    pub task_descr: Option<Value>,
    pub hours: Option<Value>,
    pub minutes: Option<Value>,
    pub client_number: Option<Value>,
    pub matter_number: Option<Value>,
    pub date: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBatch {
    pub creates: Vec<NewTask>,
    pub updates: Vec<TaskUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditOutcome {
    pub created: Vec<Task>,
    pub updated: UpdateReport,
}

enum RowKind {
    Placeholder,
    Persisted(i64),
}

fn row_kind(id: Option<&Value>) -> Result<RowKind, ValidationError> {
    match id {
        None | Some(Value::Null) => Ok(RowKind::Placeholder),
        Some(Value::String(s)) if s.starts_with(PLACEHOLDER_PREFIX) => Ok(RowKind::Placeholder),
        Some(value) => parse_task_id(value).map(RowKind::Persisted),
    }
}

// Blank inputs count as zero, like an untouched form field
fn form_number(field: &'static str, value: Option<&Value>) -> Result<Decimal, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Some(value) => parse_minutes(field, value),
    }
}

impl RowEdit {
    fn time_billed(&self) -> Result<Decimal, ValidationError> {
        let hours = form_number("hours", self.hours.as_ref())?;
        let minutes = form_number("minutes", self.minutes.as_ref())?;
        check_minutes("time_billed", combine_hours_minutes(hours, minutes)?)
    }
}

// Any invalid row rejects the whole batch
pub fn partition_edits(edits: Vec<RowEdit>) -> Result<EditBatch, ValidationError> {
    let mut batch = EditBatch::default();

    for (index, edit) in edits.into_iter().enumerate() {
        let kind = row_kind(edit.id.as_ref()).map_err(|e| e.at(index))?;
        let time_billed = edit.time_billed().map_err(|e| e.at(index))?;
        let task_descr = required_text("task_descr", edit.task_descr).map_err(|e| e.at(index))?;
        let client_number =
            required_identifier("client_number", edit.client_number).map_err(|e| e.at(index))?;
        let matter_number =
            required_identifier("matter_number", edit.matter_number).map_err(|e| e.at(index))?;

        match kind {
            RowKind::Placeholder => batch.creates.push(NewTask {
                task_descr,
                client_number,
                matter_number,
                time_billed,
                date: optional_date(edit.date).map_err(|e| e.at(index))?,
            }),
            RowKind::Persisted(id) => batch.updates.push(TaskUpdate {
                id,
                task_descr,
                client_number,
                matter_number,
                time_billed,
            }),
        }
    }

    Ok(batch)
}

pub async fn commit_edits(
    store: &TaskStore<'_>,
    edits: Vec<RowEdit>,
    today: NaiveDate,
) -> Result<EditOutcome, StoreError> {
    let batch = partition_edits(edits)?;
    info!(
        "Committing edits: {} updates, {} new tasks",
        batch.updates.len(),
        batch.creates.len()
    );

    let (updated, created) = store.commit_batch(batch.updates, batch.creates, today).await?;
    Ok(EditOutcome { created, updated })
}
