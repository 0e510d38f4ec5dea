use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::models::reference::{Client, Matter, ReferenceMaps};

// Client and matter reference data. This service only reads it.
pub struct ReferenceStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReferenceStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn clients(&self) -> Result<Vec<Client>, StoreError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT client_number, client_name FROM clients ORDER BY client_number",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(clients)
    }

    pub async fn matters(&self) -> Result<Vec<Matter>, StoreError> {
        let matters = sqlx::query_as::<_, Matter>(
            "SELECT matter_number, client_number, matter_descr FROM matters ORDER BY matter_number",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(matters)
    }

    pub async fn load_maps(&self) -> Result<ReferenceMaps, StoreError> {
        Ok(ReferenceMaps::from_rows(
            self.clients().await?,
            self.matters().await?,
        ))
    }
}

#[cfg(test)]
pub(crate) async fn seed(pool: &SqlitePool) {
    for (number, name) in [("4211", "Microsoft"), ("4365", "VMWare")] {
        sqlx::query("INSERT INTO clients (client_number, client_name) VALUES (?, ?)")
            .bind(number)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
    }
    for (number, client, descr) in [
        ("488", "4211", "Derivative Securities Litigation"),
        ("011", "4365", "Splunk Acquisition"),
    ] {
        sqlx::query(
            "INSERT INTO matters (matter_number, client_number, matter_descr) VALUES (?, ?, ?)",
        )
        .bind(number)
        .bind(client)
        .bind(descr)
        .execute(pool)
        .await
        .unwrap();
    }
}
