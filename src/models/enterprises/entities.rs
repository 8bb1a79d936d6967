use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 企业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enterprise.ts")]
pub struct Enterprise {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cnpj: Option<String>,
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub country_id: Option<Uuid>,
    pub responsible_person: Option<String>,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub profile_image_path: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 企业摘要（嵌入在提交、项目等响应中）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enterprise.ts")]
pub struct EnterpriseSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Enterprise> for EnterpriseSummary {
    fn from(e: &Enterprise) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            email: e.email.clone(),
        }
    }
}
