use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub client_number: String,
    pub client_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Matter {
    pub matter_number: String,
    pub client_number: String,
    pub matter_descr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatterRef {
    pub descr: String,
    pub client_number: String,
}

/// Read-only client and matter lookups used to label billing summaries.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMaps {
    pub clients: HashMap<String, String>,
    pub matters: HashMap<String, MatterRef>,
}

impl ReferenceMaps {
    pub fn from_rows(clients: Vec<Client>, matters: Vec<Matter>) -> Self {
        ReferenceMaps {
            clients: clients
                .into_iter()
                .map(|c| (c.client_number, c.client_name))
                .collect(),
            matters: matters
                .into_iter()
                .map(|m| {
                    (
                        m.matter_number,
                        MatterRef {
                            descr: m.matter_descr,
                            client_number: m.client_number,
                        },
                    )
                })
                .collect(),
        }
    }

    // Misses resolve to "" so a summary never fails on incomplete reference data
    pub fn client_name(&self, client_number: &str) -> &str {
        self.clients.get(client_number).map(String::as_str).unwrap_or("")
    }

    pub fn matter_descr(&self, matter_number: &str) -> &str {
        self.matters
            .get(matter_number)
            .map(|m| m.descr.as_str())
            .unwrap_or("")
    }
}
