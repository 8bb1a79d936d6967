//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间字段统一为毫秒时间戳，状态字段以字符串存储。

pub mod prelude;

pub mod acceptance_criteria;
pub mod chat_messages;
pub mod countries;
pub mod deliverables;
pub mod enterprises;
pub mod password_reset_tokens;
pub mod projects;
pub mod student_projects;
pub mod students;
pub mod task_submissions;
pub mod tasks;
