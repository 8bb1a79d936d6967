//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status_code() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tkse_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TkseError {
            $($variant(String),)*
        }

        impl TkseError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TkseError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TkseError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status_code(&self) -> StatusCode {
                match self {
                    $(TkseError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TkseError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TkseError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TkseError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tkse_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Serialization("E006", "Serialization Error", INTERNAL_SERVER_ERROR),
    DateParse("E007", "Date Parse Error", INTERNAL_SERVER_ERROR),
    Validation("E008", "Validation Error", BAD_REQUEST),
    NotFound("E009", "Resource Not Found", NOT_FOUND),
    Conflict("E010", "Conflict", CONFLICT),
    Authentication("E011", "Authentication Error", UNAUTHORIZED),
    Authorization("E012", "Authorization Error", FORBIDDEN),
    Mail("E013", "Mail Delivery Error", INTERNAL_SERVER_ERROR),
}

impl TkseError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为服务端内部错误
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// 对应的 API 响应码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            TkseError::Validation(_) => ErrorCode::InvalidArgument,
            TkseError::NotFound(_) => ErrorCode::NotFound,
            TkseError::Conflict(_) => ErrorCode::Conflict,
            TkseError::Authentication(_) => ErrorCode::Unauthorized,
            TkseError::Authorization(_) => ErrorCode::Forbidden,
            TkseError::Mail(_) => ErrorCode::MailDeliveryFailed,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 面向调用方的错误消息，内部错误统一包装
    pub fn client_message(&self) -> String {
        if self.is_internal() {
            format!("Error processing request: {}", self.message())
        } else {
            self.message().to_string()
        }
    }
}

impl fmt::Display for TkseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TkseError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TkseError {
    fn from(err: sea_orm::DbErr) -> Self {
        TkseError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TkseError {
    fn from(err: serde_json::Error) -> Self {
        TkseError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TkseError {
    fn from(err: chrono::ParseError) -> Self {
        TkseError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TkseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TkseError::cache_connection("test").code(), "E001");
        assert_eq!(TkseError::database_config("test").code(), "E003");
        assert_eq!(TkseError::validation("test").code(), "E008");
        assert_eq!(TkseError::conflict("test").code(), "E010");
        assert_eq!(TkseError::authentication("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            TkseError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(TkseError::validation("test").error_type(), "Validation Error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TkseError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TkseError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TkseError::conflict("twice").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TkseError::authentication("nope").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TkseError::authorization("nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TkseError::database_operation("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message() {
        let err = TkseError::conflict("Cannot transition from OPEN to COMPLETED");
        assert_eq!(
            err.client_message(),
            "Cannot transition from OPEN to COMPLETED"
        );

        let err = TkseError::database_operation("disk full");
        assert_eq!(
            err.client_message(),
            "Error processing request: disk full"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = TkseError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
