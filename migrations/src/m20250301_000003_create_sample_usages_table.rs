use sea_orm_migration::prelude::*;

use crate::m20250301_000002_create_allocation_lines_table::AllocationLines;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only audit of sample consumption against customers.
        manager
            .create_table(
                Table::create()
                    .table(SampleUsages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SampleUsages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SampleUsages::LineId).uuid().not_null())
                    .col(ColumnDef::new(SampleUsages::CustomerId).string().not_null())
                    .col(ColumnDef::new(SampleUsages::Qty).integer().not_null())
                    .col(ColumnDef::new(SampleUsages::UsedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sample_usages_line")
                            .from(SampleUsages::Table, SampleUsages::LineId)
                            .to(AllocationLines::Table, AllocationLines::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sample_usages_line_id")
                    .table(SampleUsages::Table)
                    .col(SampleUsages::LineId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SampleUsages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SampleUsages {
    Table,
    Id,
    LineId,
    CustomerId,
    Qty,
    UsedAt,
}
