use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建国家表
        manager
            .create_table(
                Table::create()
                    .table(Countries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Countries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Countries::Name).string().not_null())
                    .col(ColumnDef::new(Countries::Code).string_len(3).null())
                    .col(ColumnDef::new(Countries::FlagImage).string().null())
                    .col(
                        ColumnDef::new(Countries::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Countries::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Countries::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Countries::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建企业表
        manager
            .create_table(
                Table::create()
                    .table(Enterprises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enterprises::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enterprises::Name).string().not_null())
                    .col(
                        ColumnDef::new(Enterprises::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Enterprises::Cnpj).string().null().unique_key())
                    .col(ColumnDef::new(Enterprises::LegalName).string().null())
                    .col(ColumnDef::new(Enterprises::TradeName).string().null())
                    .col(ColumnDef::new(Enterprises::StateRegistration).string().null())
                    .col(
                        ColumnDef::new(Enterprises::MunicipalRegistration)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(Enterprises::Phone).string().null())
                    .col(ColumnDef::new(Enterprises::Website).string().null())
                    .col(ColumnDef::new(Enterprises::Address).string().null())
                    .col(ColumnDef::new(Enterprises::City).string().null())
                    .col(ColumnDef::new(Enterprises::State).string().null())
                    .col(ColumnDef::new(Enterprises::ZipCode).string().null())
                    .col(ColumnDef::new(Enterprises::Country).string().null())
                    .col(ColumnDef::new(Enterprises::CountryId).uuid().null())
                    .col(ColumnDef::new(Enterprises::ResponsiblePerson).string().null())
                    .col(ColumnDef::new(Enterprises::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Enterprises::ProfileImagePath).string().null())
                    .col(
                        ColumnDef::new(Enterprises::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Enterprises::DeletedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Enterprises::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enterprises::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enterprises::Table, Enterprises::CountryId)
                            .to(Countries::Table, Countries::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Students::Phone).string().null())
                    .col(ColumnDef::new(Students::Role).string().null())
                    .col(ColumnDef::new(Students::Location).string().null())
                    .col(ColumnDef::new(Students::Photo).string().null())
                    .col(ColumnDef::new(Students::Cargo).string().null())
                    .col(ColumnDef::new(Students::Bio).text().null())
                    .col(ColumnDef::new(Students::Github).string().null())
                    .col(ColumnDef::new(Students::Linkedin).string().null())
                    .col(
                        ColumnDef::new(Students::Welcome)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Students::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Students::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建项目表
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::EnterpriseId).uuid().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text().null())
                    .col(ColumnDef::new(Projects::Technologies).text().not_null())
                    .col(ColumnDef::new(Projects::Complexity).string().null())
                    .col(ColumnDef::new(Projects::Category).string().null())
                    .col(ColumnDef::new(Projects::Score).integer().null())
                    .col(ColumnDef::new(Projects::Country).string().null())
                    .col(ColumnDef::new(Projects::BlobPath).string().null())
                    .col(ColumnDef::new(Projects::Status).string().not_null())
                    .col(ColumnDef::new(Projects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Projects::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Projects::Table, Projects::EnterpriseId)
                            .to(Enterprises::Table, Enterprises::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建交付物表
        manager
            .create_table(
                Table::create()
                    .table(Deliverables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deliverables::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deliverables::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Deliverables::Name).string().not_null())
                    .col(ColumnDef::new(Deliverables::Status).string().not_null())
                    .col(
                        ColumnDef::new(Deliverables::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Deliverables::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Deliverables::Table, Deliverables::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建任务表
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::DeliverableId).uuid().not_null())
                    .col(ColumnDef::new(Tasks::Name).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).text().null())
                    .col(ColumnDef::new(Tasks::EstimatedTime).double().null())
                    .col(ColumnDef::new(Tasks::Status).string().not_null())
                    .col(ColumnDef::new(Tasks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Tasks::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tasks::Table, Tasks::DeliverableId)
                            .to(Deliverables::Table, Deliverables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建验收标准表
        manager
            .create_table(
                Table::create()
                    .table(AcceptanceCriteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcceptanceCriteria::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AcceptanceCriteria::TaskId).uuid().not_null())
                    .col(
                        ColumnDef::new(AcceptanceCriteria::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcceptanceCriteria::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcceptanceCriteria::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcceptanceCriteria::Table, AcceptanceCriteria::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建任务提交表
        // pending_key 仅在 PENDING 状态下非空，唯一索引保证同一 (task, student) 只有一条待审提交
        manager
            .create_table(
                Table::create()
                    .table(TaskSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskSubmissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskSubmissions::TaskId).uuid().not_null())
                    .col(ColumnDef::new(TaskSubmissions::StudentId).uuid().not_null())
                    .col(ColumnDef::new(TaskSubmissions::ValidatedBy).uuid().null())
                    .col(
                        ColumnDef::new(TaskSubmissions::SubmissionLink)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TaskSubmissions::BranchName).string().null())
                    .col(ColumnDef::new(TaskSubmissions::EvidenceFile).string().null())
                    .col(ColumnDef::new(TaskSubmissions::Status).string().not_null())
                    .col(ColumnDef::new(TaskSubmissions::Feedback).text().null())
                    .col(
                        ColumnDef::new(TaskSubmissions::PendingKey)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TaskSubmissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaskSubmissions::ValidatedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TaskSubmissions::Table, TaskSubmissions::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TaskSubmissions::Table, TaskSubmissions::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TaskSubmissions::Table, TaskSubmissions::ValidatedBy)
                            .to(Enterprises::Table, Enterprises::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生项目关联表
        manager
            .create_table(
                Table::create()
                    .table(StudentProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentProjects::StudentId).uuid().not_null())
                    .col(ColumnDef::new(StudentProjects::ProjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(StudentProjects::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProjects::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProjects::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProjects::Table, StudentProjects::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProjects::Table, StudentProjects::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建密码重置令牌表
        manager
            .create_table(
                Table::create()
                    .table(PasswordResetTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PasswordResetTokens::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetTokens::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PasswordResetTokens::Email).string().not_null())
                    .col(
                        ColumnDef::new(PasswordResetTokens::AccountType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetTokens::AccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetTokens::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PasswordResetTokens::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetTokens::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建聊天消息表
        manager
            .create_table(
                Table::create()
                    .table(ChatMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatMessages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatMessages::FromId).string().not_null())
                    .col(ColumnDef::new(ChatMessages::ToId).string().not_null())
                    .col(ColumnDef::new(ChatMessages::Content).text().not_null())
                    .col(
                        ColumnDef::new(ChatMessages::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_countries_name")
                    .table(Countries::Table)
                    .col(Countries::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_enterprise_id")
                    .table(Projects::Table)
                    .col(Projects::EnterpriseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_status")
                    .table(Projects::Table)
                    .col(Projects::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deliverables_project_id")
                    .table(Deliverables::Table)
                    .col(Deliverables::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tasks_deliverable_id")
                    .table(Tasks::Table)
                    .col(Tasks::DeliverableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_submissions_task_student")
                    .table(TaskSubmissions::Table)
                    .col(TaskSubmissions::TaskId)
                    .col(TaskSubmissions::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_projects_unique")
                    .table(StudentProjects::Table)
                    .col(StudentProjects::StudentId)
                    .col(StudentProjects::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_chat_messages_pair")
                    .table(ChatMessages::Table)
                    .col(ChatMessages::FromId)
                    .col(ChatMessages::ToId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(ChatMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PasswordResetTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentProjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcceptanceCriteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deliverables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enterprises::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Countries::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Countries {
    #[sea_orm(iden = "countries")]
    Table,
    Id,
    Name,
    Code,
    FlagImage,
    IsActive,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enterprises {
    #[sea_orm(iden = "enterprises")]
    Table,
    Id,
    Name,
    Email,
    Cnpj,
    LegalName,
    TradeName,
    StateRegistration,
    MunicipalRegistration,
    Phone,
    Website,
    Address,
    City,
    State,
    ZipCode,
    Country,
    CountryId,
    ResponsiblePerson,
    PasswordHash,
    ProfileImagePath,
    IsActive,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Phone,
    Role,
    Location,
    Photo,
    Cargo,
    Bio,
    Github,
    Linkedin,
    Welcome,
    IsActive,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    #[sea_orm(iden = "projects")]
    Table,
    Id,
    EnterpriseId,
    Name,
    Description,
    Technologies,
    Complexity,
    Category,
    Score,
    Country,
    BlobPath,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Deliverables {
    #[sea_orm(iden = "deliverables")]
    Table,
    Id,
    ProjectId,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    #[sea_orm(iden = "tasks")]
    Table,
    Id,
    DeliverableId,
    Name,
    Description,
    EstimatedTime,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AcceptanceCriteria {
    #[sea_orm(iden = "acceptance_criteria")]
    Table,
    Id,
    TaskId,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TaskSubmissions {
    #[sea_orm(iden = "task_submissions")]
    Table,
    Id,
    TaskId,
    StudentId,
    ValidatedBy,
    SubmissionLink,
    BranchName,
    EvidenceFile,
    Status,
    Feedback,
    PendingKey,
    SubmittedAt,
    ValidatedAt,
}

#[derive(DeriveIden)]
enum StudentProjects {
    #[sea_orm(iden = "student_projects")]
    Table,
    Id,
    StudentId,
    ProjectId,
    JoinedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PasswordResetTokens {
    #[sea_orm(iden = "password_reset_tokens")]
    Table,
    Id,
    Token,
    Email,
    AccountType,
    AccountId,
    IsUsed,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum ChatMessages {
    #[sea_orm(iden = "chat_messages")]
    Table,
    Id,
    FromId,
    ToId,
    Content,
    CreatedAt,
}
