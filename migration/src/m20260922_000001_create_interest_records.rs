use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 利息记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(InterestRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InterestRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InterestRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterestRecords::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterestRecords::TeamId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterestRecords::TokensInvested)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterestRecords::PerformanceTier)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterestRecords::InterestEarned)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterestRecords::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_interest_records_student_assignment_team")
                    .table(InterestRecords::Table)
                    .col(InterestRecords::StudentId)
                    .col(InterestRecords::AssignmentId)
                    .col(InterestRecords::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_interest_records_assignment_id")
                    .table(InterestRecords::Table)
                    .col(InterestRecords::AssignmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InterestRecords::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum InterestRecords {
    #[sea_orm(iden = "interest_records")]
    Table,
    Id,
    StudentId,
    AssignmentId,
    TeamId,
    TokensInvested,
    PerformanceTier,
    InterestEarned,
    CreatedAt,
}
