use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use log::error;
use crate::store::ReferenceStore;

// client_number -> client_name
pub async fn get_client_map(pool: web::Data<SqlitePool>) -> impl Responder {
    match ReferenceStore::new(pool.get_ref()).load_maps().await {
        Ok(maps) => HttpResponse::Ok().json(maps.clients),
        Err(e) => {
            error!("Failed to load client map: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// matter_number -> { descr, client_number }
pub async fn get_matter_map(pool: web::Data<SqlitePool>) -> impl Responder {
    match ReferenceStore::new(pool.get_ref()).load_maps().await {
        Ok(maps) => HttpResponse::Ok().json(maps.matters),
        Err(e) => {
            error!("Failed to load matter map: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
