pub mod auth;
pub mod chat;
pub mod common;
pub mod countries;
pub mod dashboard;
pub mod enterprises;
pub mod password_reset;
pub mod projects;
pub mod students;
pub mod submissions;
pub mod voomp;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

// API 响应码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    InvalidArgument = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    ResetTokenInvalid = 2001,
    MailDeliveryFailed = 2002,

    // 项目工作流
    InvalidTransition = 3000,
    ProjectNotJoinable = 3001,
    SubmissionAlreadyPending = 3002,
    TaskAlreadyApproved = 3003,
}
