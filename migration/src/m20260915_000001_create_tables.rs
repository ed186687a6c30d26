use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(
                        ColumnDef::new(Assignments::SubmissionDueAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::EvaluationDueAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::IsEvaluationActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Assignments::EvaluationsPerStudent)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建团队表
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teams::AssignmentId).big_integer().not_null())
                    .col(ColumnDef::new(Teams::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .col(ColumnDef::new(Teams::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teams::Table, Teams::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建团队成员表
        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamMembers::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(TeamMembers::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(TeamMembers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeamMembers::Table, TeamMembers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeamMembers::Table, TeamMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::TeamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Content).text().not_null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评审分配表
        manager
            .create_table(
                Table::create()
                    .table(EvaluationAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::TeamId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationAssignments::Table,
                                EvaluationAssignments::AssignmentId,
                            )
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationAssignments::Table,
                                EvaluationAssignments::SubmissionId,
                            )
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建分发标记表（assignment_id 唯一，保证每个作业只分发一次）
        manager
            .create_table(
                Table::create()
                    .table(EvaluationDistributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationDistributions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationDistributions::AssignmentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationDistributions::EvaluationsPerStudent)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationDistributions::TotalAssignments)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationDistributions::DistributedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationDistributions::DistributedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationDistributions::Table,
                                EvaluationDistributions::AssignmentId,
                            )
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建投资表
        manager
            .create_table(
                Table::create()
                    .table(Investments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Investments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Investments::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Investments::InvestorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Investments::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(Investments::Tokens).integer().not_null())
                    .col(
                        ColumnDef::new(Investments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Investments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Investments::Table, Investments::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Investments::Table, Investments::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::AssignmentId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::SubmissionId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Grades::AverageInvestment)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Grades::LetterGrade).string().not_null())
                    .col(ColumnDef::new(Grades::Percentage).double().not_null())
                    .col(
                        ColumnDef::new(Grades::TotalInvestments)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Grades::Status).string().not_null())
                    .col(
                        ColumnDef::new(Grades::ManualOverride)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Grades::OriginalLetterGrade).string().null())
                    .col(ColumnDef::new(Grades::OriginalPercentage).double().null())
                    .col(ColumnDef::new(Grades::ReviewedBy).big_integer().null())
                    .col(ColumnDef::new(Grades::OverriddenAt).big_integer().null())
                    .col(
                        ColumnDef::new(Grades::CalculatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Grades::PublishedAt).big_integer().null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 团队成员唯一约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_team_members_team_user")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::TeamId)
                    .col(TeamMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_members_user_id")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_assignment_id")
                    .table(Teams::Table)
                    .col(Teams::AssignmentId)
                    .to_owned(),
            )
            .await?;

        // 每个团队每个作业只有一份有效提交
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submissions_assignment_team")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluation_assignments_pair")
                    .table(EvaluationAssignments::Table)
                    .col(EvaluationAssignments::AssignmentId)
                    .col(EvaluationAssignments::EvaluatorId)
                    .col(EvaluationAssignments::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_investments_pair")
                    .table(Investments::Table)
                    .col(Investments::AssignmentId)
                    .col(Investments::InvestorId)
                    .col(Investments::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_grades_assignment_team")
                    .table(Grades::Table)
                    .col(Grades::AssignmentId)
                    .col(Grades::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Investments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationDistributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    DisplayName,
    Role,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    CourseId,
    Title,
    Description,
    SubmissionDueAt,
    EvaluationDueAt,
    IsEvaluationActive,
    EvaluationsPerStudent,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    #[sea_orm(iden = "teams")]
    Table,
    Id,
    AssignmentId,
    CourseId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamMembers {
    #[sea_orm(iden = "team_members")]
    Table,
    Id,
    TeamId,
    UserId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    TeamId,
    SubmittedBy,
    Content,
    Status,
    SubmittedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EvaluationAssignments {
    #[sea_orm(iden = "evaluation_assignments")]
    Table,
    Id,
    AssignmentId,
    EvaluatorId,
    TeamId,
    SubmissionId,
    Status,
    AssignedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum EvaluationDistributions {
    #[sea_orm(iden = "evaluation_distributions")]
    Table,
    Id,
    AssignmentId,
    EvaluationsPerStudent,
    TotalAssignments,
    DistributedBy,
    DistributedAt,
}

#[derive(DeriveIden)]
enum Investments {
    #[sea_orm(iden = "investments")]
    Table,
    Id,
    AssignmentId,
    InvestorId,
    TeamId,
    Tokens,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    AssignmentId,
    TeamId,
    SubmissionId,
    AverageInvestment,
    LetterGrade,
    Percentage,
    TotalInvestments,
    Status,
    ManualOverride,
    OriginalLetterGrade,
    OriginalPercentage,
    ReviewedBy,
    OverriddenAt,
    CalculatedAt,
    PublishedAt,
    UpdatedAt,
}
