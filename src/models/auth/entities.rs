use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 账号类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum AccountType {
    Enterprise, // 企业
    Student,    // 学生
}

impl AccountType {
    pub const ENTERPRISE: &'static str = "enterprise";
    pub const STUDENT: &'static str = "student";
}

impl<'de> Deserialize<'de> for AccountType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AccountType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的账号类型: '{s}'. 支持的类型: enterprise, student"
            ))
        })
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Enterprise => write!(f, "{}", AccountType::ENTERPRISE),
            AccountType::Student => write!(f, "{}", AccountType::STUDENT),
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AccountType::ENTERPRISE => Ok(AccountType::Enterprise),
            AccountType::STUDENT => Ok(AccountType::Student),
            _ => Err(format!("Invalid account type: {s}")),
        }
    }
}

/// 已认证的账号，由 RequireJWT 写入请求扩展
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct AuthAccount {
    pub id: Uuid,
    pub account_type: AccountType,
    pub name: String,
    pub email: String,
}

impl AuthAccount {
    pub fn is_enterprise(&self) -> bool {
        self.account_type == AccountType::Enterprise
    }

    pub fn is_student(&self) -> bool {
        self.account_type == AccountType::Student
    }
}
