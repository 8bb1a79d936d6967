use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::models::common::PaginationQuery;

// 发布项目请求：项目生成服务输出的结构化草稿
// 兼容旧版葡语字段名
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct PublishProjectRequest {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "tecnologias")]
    pub technologies: Vec<String>,
    #[serde(default, alias = "complexidade")]
    pub complexity: Option<String>,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default, alias = "pais")]
    pub country: Option<String>,
    #[serde(default)]
    pub blob_path: Option<String>,
    #[serde(default, alias = "entregaveis")]
    pub deliverables: Vec<PublishDeliverable>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct PublishDeliverable {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "tarefas")]
    pub tasks: Vec<PublishTask>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct PublishTask {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "tempo_estimado")]
    pub estimated_time: Option<f64>,
    #[serde(default, alias = "criterios_de_aceitacao")]
    pub acceptance_criteria: Vec<String>,
}

// 项目更新请求（不含状态，状态变更走 transition）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub complexity: Option<String>,
    pub category: Option<String>,
    pub score: Option<i32>,
    pub country: Option<String>,
    pub blob_path: Option<String>,
}

// 项目状态变更请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct UpdateProjectStatusRequest {
    pub status: String,
}

// 项目列表查询
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct ProjectListQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<String>,
    pub enterprise_id: Option<Uuid>,
    pub search: Option<String>,
}
