use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create ipos table
        manager
            .create_table(
                Table::create()
                    .table(Ipos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ipos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Ipos::CompanyName)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Ipos::Logo).string_len(255).null())
                    .col(
                        ColumnDef::new(Ipos::PriceBand)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Ipos::OpenDate).date().not_null())
                    .col(ColumnDef::new(Ipos::CloseDate).date().not_null())
                    .col(
                        ColumnDef::new(Ipos::IssueSize)
                            .decimal_len(15, 2)
                            .not_null()
                            .check(Expr::col(Ipos::IssueSize).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Ipos::IssueType)
                            .string_len(20)
                            .not_null()
                            .default("book_building"),
                    )
                    .col(ColumnDef::new(Ipos::ListingDate).date().null())
                    .col(
                        ColumnDef::new(Ipos::Status)
                            .string_len(10)
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(
                        ColumnDef::new(Ipos::IpoPrice)
                            .decimal_len(10, 2)
                            .null()
                            .check(Expr::col(Ipos::IpoPrice).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Ipos::ListingPrice)
                            .decimal_len(10, 2)
                            .null()
                            .check(Expr::col(Ipos::ListingPrice).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Ipos::CurrentMarketPrice)
                            .decimal_len(10, 2)
                            .null()
                            .check(Expr::col(Ipos::CurrentMarketPrice).gt(0)),
                    )
                    .col(ColumnDef::new(Ipos::RhpDocument).string_len(255).null())
                    .col(ColumnDef::new(Ipos::DrhpDocument).string_len(255).null())
                    .col(
                        ColumnDef::new(Ipos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(Ipos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on status for the per-status sub-collections
        manager
            .create_index(
                Index::create()
                    .name("idx_ipos_status")
                    .table(Ipos::Table)
                    .col(Ipos::Status)
                    .to_owned(),
            )
            .await?;

        // Create index on open_date for the default ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_ipos_open_date")
                    .table(Ipos::Table)
                    .col(Ipos::OpenDate)
                    .to_owned(),
            )
            .await?;

        // Create trigger function for updated_at (if not exists)
        let db = manager.get_connection();
        db.execute_unprepared(
            r#"
            CREATE OR REPLACE FUNCTION update_ipos_updated_at()
            RETURNS TRIGGER AS $$
            BEGIN
                NEW.updated_at = NOW();
                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql;
            "#,
        )
        .await?;

        // Create trigger on ipos table
        db.execute_unprepared(
            r#"
            DROP TRIGGER IF EXISTS trigger_ipos_updated_at ON ipos;
            CREATE TRIGGER trigger_ipos_updated_at
                BEFORE UPDATE ON ipos
                FOR EACH ROW
                EXECUTE FUNCTION update_ipos_updated_at();
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Drop trigger and function
        db.execute_unprepared("DROP TRIGGER IF EXISTS trigger_ipos_updated_at ON ipos;")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS update_ipos_updated_at();")
            .await?;

        manager
            .drop_table(Table::drop().table(Ipos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Ipos {
    Table,
    Id,
    CompanyName,
    Logo,
    PriceBand,
    OpenDate,
    CloseDate,
    IssueSize,
    IssueType,
    ListingDate,
    Status,
    IpoPrice,
    ListingPrice,
    CurrentMarketPrice,
    RhpDocument,
    DrhpDocument,
    CreatedAt,
    UpdatedAt,
}
