use serde::{Deserialize, Serialize};

use crate::models::task::{RawTask, RawTaskUpdate, Task};

// Create tasks request and response
#[derive(Deserialize)]
pub struct CreateTasksRequest {
    pub tasks: Vec<RawTask>,
}

#[derive(Serialize)]
pub struct CreateTasksResponse {
    pub success: bool,
    pub message: String,
    pub tasks: Vec<Task>,
}


// Update tasks request and response
#[derive(Deserialize)]
pub struct UpdateTasksRequest {
    pub updates: Vec<RawTaskUpdate>,
}

#[derive(Serialize)]
pub struct UpdateTasksResponse {
    pub success: bool,
    pub message: String,
    pub updated_count: u64,
    pub not_found: Vec<i64>,
}


// Shared by delete-task and delete-matter-tasks
#[derive(Serialize)]
pub struct DeleteTasksResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
}
