// src/models/mod.rs

pub mod reference;
pub mod task;
