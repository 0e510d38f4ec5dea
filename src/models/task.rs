use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::billing::time_billed::{check_minutes, decimal_from_f64, parse_minutes};
use crate::error::{StoreError, ValidationError};

// Stored task, minutes as exact decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub task_descr: String,
    pub client_number: String,
    pub matter_number: String,
    pub time_billed: Decimal,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub task_descr: String,
    pub client_number: String,
    pub matter_number: String,
    pub time_billed: f64,
    pub date: Option<NaiveDate>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let time_billed = decimal_from_f64(row.time_billed).ok_or_else(|| StoreError::InvalidRow {
            id: row.id,
            value: row.time_billed.to_string(),
        })?;

        Ok(Task {
            id: row.id,
            task_descr: row.task_descr,
            client_number: row.client_number,
            matter_number: row.matter_number,
            time_billed,
            date: row.date,
        })
    }
}

// Validated, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub task_descr: String,
    pub client_number: String,
    pub matter_number: String,
    pub time_billed: Decimal,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub id: i64,
    pub task_descr: String,
    pub client_number: String,
    pub matter_number: String,
    pub time_billed: Decimal,
}

// Task payloads as they arrive over the wire, from the web client or the
// classification pipeline. Nothing is trusted until `validate` succeeds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTask {
    pub task_descr: Option<Value>,
    pub client_number: Option<Value>,
    pub matter_number: Option<Value>,
    pub time_billed: Option<Value>,
    pub date: Option<Value>,
}

impl RawTask {
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        Ok(NewTask {
            task_descr: required_text("task_descr", self.task_descr)?,
            client_number: required_identifier("client_number", self.client_number)?,
            matter_number: required_identifier("matter_number", self.matter_number)?,
            time_billed: required_minutes("time_billed", self.time_billed)?,
            date: optional_date(self.date)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaskUpdate {
    pub id: Option<Value>,
    pub task_descr: Option<Value>,
    pub client_number: Option<Value>,
    pub matter_number: Option<Value>,
    pub time_billed: Option<Value>,
}

impl RawTaskUpdate {
    pub fn validate(self) -> Result<TaskUpdate, ValidationError> {
        let id = match self.id {
            Some(value) => parse_task_id(&value)?,
            None => return Err(ValidationError::MissingField("id")),
        };
        Ok(TaskUpdate {
            id,
            task_descr: required_text("task_descr", self.task_descr)?,
            client_number: required_identifier("client_number", self.client_number)?,
            matter_number: required_identifier("matter_number", self.matter_number)?,
            time_billed: required_minutes("time_billed", self.time_billed)?,
        })
    }
}

// Validates a whole batch, naming the first offending entry
pub fn validate_new_tasks(raw: Vec<RawTask>) -> Result<Vec<NewTask>, ValidationError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, task)| task.validate().map_err(|e| e.at(index)))
        .collect()
}

pub fn validate_updates(raw: Vec<RawTaskUpdate>) -> Result<Vec<TaskUpdate>, ValidationError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, update)| update.validate().map_err(|e| e.at(index)))
        .collect()
}

pub fn parse_task_id(value: &Value) -> Result<i64, ValidationError> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.ok_or_else(|| ValidationError::InvalidId(display_value(value)))
}

pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    // ISO timestamps are accepted, only the calendar part is kept
    let trimmed = text.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

pub(crate) fn required_text(field: &'static str, value: Option<Value>) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Null) | None => Err(ValidationError::MissingField(field)),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

pub(crate) fn required_identifier(
    field: &'static str,
    value: Option<Value>,
) -> Result<String, ValidationError> {
    let text = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Null) | None => return Err(ValidationError::MissingField(field)),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field,
                expected: "a string or number",
            })
        }
    };
    if text.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(text)
}

pub(crate) fn required_minutes(
    field: &'static str,
    value: Option<Value>,
) -> Result<Decimal, ValidationError> {
    match value {
        Some(Value::Null) | None => Err(ValidationError::MissingField(field)),
        Some(value) => check_minutes(field, parse_minutes(field, &value)?),
    }
}

pub(crate) fn optional_date(value: Option<Value>) -> Result<Option<NaiveDate>, ValidationError> {
    match value {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_date(&s).map(Some),
        Some(other) => Err(ValidationError::InvalidDate(other.to_string())),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
