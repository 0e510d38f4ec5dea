pub mod routes;

pub mod task_logs {
    pub mod task_logs_handlers;
    pub mod task_logs_models;
}

pub mod reference {
    pub mod reference_handlers;
}

pub mod summary {
    pub mod summary_handlers;
    pub mod summary_models;
}

#[cfg(test)]
pub(crate) fn test_config() -> crate::config::Config {
    crate::config::Config {
        database_url: "sqlite::memory:".into(),
        bind_address: "127.0.0.1:0".into(),
        max_connections: 1,
        reference_tz: chrono_tz::UTC,
    }
}
