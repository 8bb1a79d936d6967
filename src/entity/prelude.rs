//! 预导入模块，方便使用

pub use super::acceptance_criteria::{
    ActiveModel as AcceptanceCriterionActiveModel, Entity as AcceptanceCriteria,
    Model as AcceptanceCriterionModel,
};
pub use super::chat_messages::{
    ActiveModel as ChatMessageActiveModel, Entity as ChatMessages, Model as ChatMessageModel,
};
pub use super::countries::{
    ActiveModel as CountryActiveModel, Entity as Countries, Model as CountryModel,
};
pub use super::deliverables::{
    ActiveModel as DeliverableActiveModel, Entity as Deliverables, Model as DeliverableModel,
};
pub use super::enterprises::{
    ActiveModel as EnterpriseActiveModel, Entity as Enterprises, Model as EnterpriseModel,
};
pub use super::password_reset_tokens::{
    ActiveModel as PasswordResetTokenActiveModel, Entity as PasswordResetTokens,
    Model as PasswordResetTokenModel,
};
pub use super::projects::{
    ActiveModel as ProjectActiveModel, Entity as Projects, Model as ProjectModel,
};
pub use super::student_projects::{
    ActiveModel as StudentProjectActiveModel, Entity as StudentProjects,
    Model as StudentProjectModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::task_submissions::{
    ActiveModel as TaskSubmissionActiveModel, Entity as TaskSubmissions,
    Model as TaskSubmissionModel,
};
pub use super::tasks::{ActiveModel as TaskActiveModel, Entity as Tasks, Model as TaskModel};
