use serde::{Deserialize, Serialize};

use crate::billing::aggregation::{DaySummary, MatterSummary};
use crate::billing::reconcile::RowEdit;
use crate::models::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Matter,
}

#[derive(Deserialize)]
pub struct TaskSummariesQuery {
    #[serde(default)]
    pub group_by: GroupBy,
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct DaySummariesResponse {
    pub days: Vec<DaySummary>,
}

#[derive(Serialize)]
pub struct MatterSummariesResponse {
    pub matters: Vec<MatterSummary>,
}


// Saving a matter's edit form
#[derive(Deserialize)]
pub struct SaveMatterEditsRequest {
    pub edits: Vec<RowEdit>,
}

#[derive(Serialize)]
pub struct SaveMatterEditsResponse {
    pub success: bool,
    pub message: String,
    pub created: Vec<Task>,
    pub updated_count: u64,
    pub not_found: Vec<i64>,
}
