use actix_web::web;

use super::task_logs::task_logs_handlers;

pub fn task_logs_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(task_logs_handlers::task_logs_root))
        .route("/fetch-task-logs", web::get().to(task_logs_handlers::fetch_task_logs))
        .route("/fetch-task-logs/{date}", web::get().to(task_logs_handlers::fetch_task_logs_for_date))
        .route("/create-tasks", web::post().to(task_logs_handlers::create_tasks))
        .route("/update-tasks", web::patch().to(task_logs_handlers::update_tasks))
        .route("/delete-task/{id}", web::delete().to(task_logs_handlers::delete_task))
        .route("/delete-matter-tasks/{matter_number}", web::delete().to(task_logs_handlers::delete_matter_tasks));
}

use super::reference::reference_handlers;

pub fn reference_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/get-client-map", web::get().to(reference_handlers::get_client_map))
        .route("/get-matter-map", web::get().to(reference_handlers::get_matter_map));
}

use super::summary::summary_handlers;

pub fn summary_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/task-summaries", web::get().to(summary_handlers::get_task_summaries))
        .route("/save-matter-edits", web::post().to(summary_handlers::save_matter_edits));
}
