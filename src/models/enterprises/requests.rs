use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

// 企业注册请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enterprise.ts")]
pub struct CreateEnterpriseRequest {
    pub name: String,
    pub email: String,
    /// 明文密码；进入存储层前由服务层替换为哈希
    pub password: String,
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
    pub profile_image_path: Option<String>,
}

// 企业资料更新请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enterprise.ts")]
pub struct UpdateEnterpriseRequest {
    pub name: Option<String>,
    pub email: Option<String>,
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
    pub profile_image_path: Option<String>,
}
