pub mod health;
pub mod priority;
pub mod project;
pub mod report;
pub mod status;
pub mod task;
pub mod team_member;

use actix_web::web;

use crate::utils::errors::ServiceError;

pub use priority::priority_config;
pub use project::project_config;
pub use report::report_config;
pub use status::status_config;
pub use task::task_config;
pub use team_member::team_member_config;

/// Registers every route plus extractor error handlers that answer with the
/// `{"error": ...}` body instead of actix's plain-text defaults.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::ValidationError(err.to_string()).into()
    }))
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| ServiceError::ValidationError("Invalid id".to_string()).into()),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ServiceError::ValidationError(err.to_string()).into()
    }))
    .configure(health::configure)
    .service(
        web::scope("/api")
            .configure(team_member_config)
            .configure(project_config)
            .configure(status_config)
            .configure(priority_config)
            .configure(task_config)
            .configure(report_config),
    );
}
