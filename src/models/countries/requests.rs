use serde::Deserialize;
use ts_rs::TS;

// 创建国家请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/country.ts")]
pub struct CreateCountryRequest {
    pub name: String,
    pub code: Option<String>,
    pub flag_image: Option<String>,
}

// 更新国家请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/country.ts")]
pub struct UpdateCountryRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub flag_image: Option<String>,
}
