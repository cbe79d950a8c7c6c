// src/services/mod.rs
pub mod metrics_manager;
pub mod normalizer;
pub mod session_id;
pub mod session_manager;
pub mod transcript;
pub mod webhook;
pub mod widget;
