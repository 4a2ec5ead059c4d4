use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_allocations_table::Allocations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ordered per-recipient quantity lines. used_qty is only ever moved
        // by the conditional update in the usage recorder.
        manager
            .create_table(
                Table::create()
                    .table(AllocationLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AllocationLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AllocationLines::AllocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AllocationLines::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AllocationLines::EmpCode).string().not_null())
                    .col(
                        ColumnDef::new(AllocationLines::EmpName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(AllocationLines::Qty).integer().not_null())
                    .col(
                        ColumnDef::new(AllocationLines::UsedQty)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allocation_lines_allocation")
                            .from(AllocationLines::Table, AllocationLines::AllocationId)
                            .to(Allocations::Table, Allocations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_allocation_lines_allocation_id")
                    .table(AllocationLines::Table)
                    .col(AllocationLines::AllocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_allocation_lines_emp_code")
                    .table(AllocationLines::Table)
                    .col(AllocationLines::EmpCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AllocationLines::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AllocationLines {
    Table,
    Id,
    AllocationId,
    Position,
    EmpCode,
    EmpName,
    Qty,
    UsedQty,
}
