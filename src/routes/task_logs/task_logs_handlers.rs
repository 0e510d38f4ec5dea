use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use log::{error, info};
use serde_json::Value;
use crate::config::Config;
use crate::error::StoreError;
use crate::models::task::{parse_date, parse_task_id, validate_new_tasks, validate_updates};
use crate::store::TaskStore;
use super::task_logs_models::{
    CreateTasksRequest, CreateTasksResponse,
    UpdateTasksRequest, UpdateTasksResponse,
    DeleteTasksResponse,
};

pub async fn task_logs_root() -> impl Responder {
    HttpResponse::Ok().body("Hello, this is the Billy task log service.")
}

// Every task, oldest first
pub async fn fetch_task_logs(pool: web::Data<SqlitePool>) -> impl Responder {
    match TaskStore::new(pool.get_ref()).list().await {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(e) => {
            error!("Failed to fetch task logs: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// Tasks for one calendar day (YYYY-MM-DD)
pub async fn fetch_task_logs_for_date(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> impl Responder {
    let date = match parse_date(&path) {
        Ok(date) => date,
        Err(e) => {
            info!("Rejected task log date: {}", e);
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };

    match TaskStore::new(pool.get_ref()).list_for_date(date).await {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(e) => {
            error!("Failed to fetch task logs for {}: {}", date, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// Bulk insert, from the classifier output or the UI
pub async fn create_tasks(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    request: web::Json<CreateTasksRequest>,
) -> impl Responder {
    let request = request.into_inner();
    info!("Received request to create {} tasks", request.tasks.len());

    let tasks = match validate_new_tasks(request.tasks) {
        Ok(tasks) => tasks,
        Err(e) => {
            info!("Rejected task batch: {}", e);
            return HttpResponse::BadRequest().json(CreateTasksResponse {
                success: false,
                message: e.to_string(),
                tasks: Vec::new(),
            });
        }
    };

    match TaskStore::new(pool.get_ref()).create_many(tasks, config.today()).await {
        Ok(created) => HttpResponse::Ok().json(CreateTasksResponse {
            success: true,
            message: format!("Created {} tasks", created.len()),
            tasks: created,
        }),
        Err(StoreError::Validation(e)) => HttpResponse::BadRequest().json(CreateTasksResponse {
            success: false,
            message: e.to_string(),
            tasks: Vec::new(),
        }),
        Err(e) => {
            error!("Failed to create tasks: {}", e);
            HttpResponse::InternalServerError().json(CreateTasksResponse {
                success: false,
                message: "Failed to create tasks".into(),
                tasks: Vec::new(),
            })
        }
    }
}

// Batch edit; unknown ids are skipped and reported
pub async fn update_tasks(
    pool: web::Data<SqlitePool>,
    request: web::Json<UpdateTasksRequest>,
) -> impl Responder {
    let request = request.into_inner();
    info!("Received request to update {} tasks", request.updates.len());

    let updates = match validate_updates(request.updates) {
        Ok(updates) => updates,
        Err(e) => {
            info!("Rejected update batch: {}", e);
            return HttpResponse::BadRequest().json(UpdateTasksResponse {
                success: false,
                message: e.to_string(),
                updated_count: 0,
                not_found: Vec::new(),
            });
        }
    };

    match TaskStore::new(pool.get_ref()).update_many(updates).await {
        Ok(report) => HttpResponse::Ok().json(UpdateTasksResponse {
            success: true,
            message: format!("Updated {} tasks", report.updated_count),
            updated_count: report.updated_count,
            not_found: report.not_found,
        }),
        Err(StoreError::Validation(e)) => HttpResponse::BadRequest().json(UpdateTasksResponse {
            success: false,
            message: e.to_string(),
            updated_count: 0,
            not_found: Vec::new(),
        }),
        Err(e) => {
            error!("Failed to update tasks: {}", e);
            HttpResponse::InternalServerError().json(UpdateTasksResponse {
                success: false,
                message: "Failed to update tasks".into(),
                updated_count: 0,
                not_found: Vec::new(),
            })
        }
    }
}

pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_task_id(&Value::String(path.into_inner())) {
        Ok(id) => id,
        Err(e) => {
            return HttpResponse::BadRequest().json(DeleteTasksResponse {
                success: false,
                message: e.to_string(),
                deleted_count: 0,
            });
        }
    };

    match TaskStore::new(pool.get_ref()).delete_by_id(id).await {
        Ok(deleted_count) => {
            info!("Delete task {}: {} removed", id, deleted_count);
            HttpResponse::Ok().json(DeleteTasksResponse {
                success: true,
                message: format!("Task {} deleted", id),
                deleted_count,
            })
        }
        Err(e) => {
            error!("Failed to delete task {}: {}", id, e);
            HttpResponse::InternalServerError().json(DeleteTasksResponse {
                success: false,
                message: "Failed to delete task".into(),
                deleted_count: 0,
            })
        }
    }
}

pub async fn delete_matter_tasks(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> impl Responder {
    let matter_number = path.into_inner();

    match TaskStore::new(pool.get_ref()).delete_by_matter(&matter_number).await {
        Ok(deleted_count) => HttpResponse::Ok().json(DeleteTasksResponse {
            success: true,
            message: format!("Deleted {} tasks for matter {}", deleted_count, matter_number),
            deleted_count,
        }),
        Err(e) => {
            error!("Failed to delete tasks for matter {}: {}", matter_number, e);
            HttpResponse::InternalServerError().json(DeleteTasksResponse {
                success: false,
                message: "Failed to delete matter tasks".into(),
                deleted_count: 0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::routes::routes::task_logs_configure;
    use crate::routes::test_config;
    use crate::store::memory_pool;

    #[actix_web::test]
    async fn create_update_and_fetch_round_trip() {
        let pool = memory_pool().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(test_config()))
                .configure(task_logs_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/create-tasks")
            .set_json(json!({ "tasks": [
                { "task_descr": "Drafted motion.", "client_number": "4211",
                  "matter_number": "488", "time_billed": 42.5, "date": "2025-05-02" },
                { "task_descr": "Call.", "client_number": "4365",
                  "matter_number": "011", "time_billed": 6, "date": "2025-05-01" }
            ]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        let first_id = body["tasks"][0]["id"].as_i64().unwrap();

        let req = test::TestRequest::patch()
            .uri("/update-tasks")
            .set_json(json!({ "updates": [
                { "id": first_id.to_string(), "task_descr": "Drafted and filed motion.",
                  "client_number": "4211", "matter_number": "488", "time_billed": 135.5 },
                { "id": 4040, "task_descr": "Missing.",
                  "client_number": "4211", "matter_number": "488", "time_billed": 1 }
            ]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["updated_count"], 1);
        assert_eq!(body["not_found"], json!([4040]));

        let req = test::TestRequest::get().uri("/fetch-task-logs/2025-05-02").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let tasks = body.as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["task_descr"], "Drafted and filed motion.");
        assert_eq!(tasks[0]["time_billed"], 135.5);
    }

    #[actix_web::test]
    async fn invalid_batches_are_rejected_whole() {
        let pool = memory_pool().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(test_config()))
                .configure(task_logs_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/create-tasks")
            .set_json(json!({ "tasks": [
                { "task_descr": "Fine.", "client_number": "4211",
                  "matter_number": "488", "time_billed": 10 },
                { "task_descr": "Broken.", "client_number": "4211",
                  "matter_number": "488", "time_billed": "ten" }
            ]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = test::TestRequest::get().uri("/fetch-task-logs").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]));

        let req = test::TestRequest::get().uri("/fetch-task-logs/yesterday").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn deletes_are_idempotent() {
        let pool = memory_pool().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(test_config()))
                .configure(task_logs_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/create-tasks")
            .set_json(json!({ "tasks": [
                { "task_descr": "A.", "client_number": "4211", "matter_number": "488", "time_billed": 1 },
                { "task_descr": "B.", "client_number": "4211", "matter_number": "488", "time_billed": 2 },
                { "task_descr": "C.", "client_number": "4365", "matter_number": "011", "time_billed": 3 }
            ]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let c_id = body["tasks"][2]["id"].as_i64().unwrap();

        for expected in [2, 0] {
            let req = test::TestRequest::delete().uri("/delete-matter-tasks/488").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["deleted_count"], expected);
        }

        for expected in [1, 0] {
            let req = test::TestRequest::delete()
                .uri(&format!("/delete-task/{}", c_id))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["success"], true);
            assert_eq!(body["deleted_count"], expected);
        }
    }
}
