use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use log::{error, info};
use crate::billing::aggregation::{summarize_by_day, summarize_by_matter};
use crate::billing::reconcile::commit_edits;
use crate::config::Config;
use crate::error::StoreError;
use crate::models::task::parse_date;
use crate::store::{ReferenceStore, TaskStore};
use super::summary_models::{
    GroupBy, TaskSummariesQuery,
    DaySummariesResponse, MatterSummariesResponse,
    SaveMatterEditsRequest, SaveMatterEditsResponse,
};

// Grouped, labelled and totalled view of the task log
pub async fn get_task_summaries(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<TaskSummariesQuery>,
) -> impl Responder {
    let date = match query.date.as_deref().map(parse_date).transpose() {
        Ok(date) => date,
        Err(e) => {
            info!("Rejected summary date: {}", e);
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };

    let store = TaskStore::new(pool.get_ref());
    let tasks = match date {
        Some(date) => store.list_for_date(date).await,
        None => store.list().await,
    };
    let tasks = match tasks {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("Failed to fetch tasks for summary: {}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    let refs = match ReferenceStore::new(pool.get_ref()).load_maps().await {
        Ok(refs) => refs,
        Err(e) => {
            error!("Failed to load reference maps: {}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    let summaries = match query.group_by {
        GroupBy::Day => summarize_by_day(&tasks, &refs, config.today())
            .map(|days| HttpResponse::Ok().json(DaySummariesResponse { days })),
        GroupBy::Matter => summarize_by_matter(&tasks, &refs)
            .map(|matters| HttpResponse::Ok().json(MatterSummariesResponse { matters })),
    };
    match summaries {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to summarize tasks: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// Rows with a `new-` id are created, the rest are updated
pub async fn save_matter_edits(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    request: web::Json<SaveMatterEditsRequest>,
) -> impl Responder {
    let request = request.into_inner();
    info!("Received {} edited rows", request.edits.len());

    let store = TaskStore::new(pool.get_ref());
    match commit_edits(&store, request.edits, config.today()).await {
        Ok(outcome) => HttpResponse::Ok().json(SaveMatterEditsResponse {
            success: true,
            message: format!(
                "Updated {} tasks, created {} tasks",
                outcome.updated.updated_count,
                outcome.created.len()
            ),
            created: outcome.created,
            updated_count: outcome.updated.updated_count,
            not_found: outcome.updated.not_found,
        }),
        Err(StoreError::Validation(e)) => {
            info!("Rejected edits: {}", e);
            HttpResponse::BadRequest().json(SaveMatterEditsResponse {
                success: false,
                message: e.to_string(),
                created: Vec::new(),
                updated_count: 0,
                not_found: Vec::new(),
            })
        }
        Err(e) => {
            error!("Failed to save edits: {}", e);
            HttpResponse::InternalServerError().json(SaveMatterEditsResponse {
                success: false,
                message: "Failed to save edits".into(),
                created: Vec::new(),
                updated_count: 0,
                not_found: Vec::new(),
            })
        }
    }
}
