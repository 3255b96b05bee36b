pub mod backup_service;
pub mod bridge_service;
pub mod cli;
pub mod config;
pub mod device_service;
pub mod file_svc;
pub mod history_service;
pub mod inventory_service;
pub mod models;
pub mod pipeline;
