pub mod auth;

pub mod enterprises;

pub mod students;

pub mod projects;

pub mod countries;

pub mod dashboard;

pub mod chat;

pub mod voomp;

pub use auth::configure_auth_routes;
pub use chat::configure_chat_routes;
pub use countries::configure_country_routes;
pub use dashboard::configure_dashboard_routes;
pub use enterprises::configure_enterprise_routes;
pub use projects::configure_project_routes;
pub use students::configure_student_routes;
pub use voomp::configure_voomp_routes;
