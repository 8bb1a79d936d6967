use serde::Deserialize;
use ts_rs::TS;

// 交付趋势查询，project_ids 为逗号分隔的项目 ID
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DeliveriesQuery {
    pub project_ids: Option<String>,
}
