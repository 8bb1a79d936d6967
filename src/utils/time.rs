//! 时间戳工具
//!
//! 数据库中的时间统一存为 Unix 毫秒时间戳。

use chrono::{DateTime, Utc};

/// 当前时间的毫秒时间戳
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 毫秒时间戳转为 UTC 时间
pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}

