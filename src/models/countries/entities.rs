use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 国家实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/country.ts")]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub flag_image: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
