// Common library for the Spark log dashboard: models, log service client,
// and the view models the terminal front end drives

pub mod client;
pub mod config;
pub mod debounce;
pub mod display;
pub mod errors;
pub mod fetcher;
pub mod filters;
pub mod job_detail;
pub mod job_list;
pub mod models;
pub mod page_size;
pub mod pagination;
pub mod query;
pub mod route;
pub mod telemetry;
