pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod search;
pub mod time;
pub mod validate;

pub use extractor::{
    SafeCountryId, SafeEnterpriseId, SafeProjectId, SafeStudentId, SafeSubmissionId,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
