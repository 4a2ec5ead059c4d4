use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per allocation document. Re-allocations insert new rows
        // carrying ancestor chain ids forward; rows are never deleted.
        manager
            .create_table(
                Table::create()
                    .table(Allocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Allocations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Allocations::RootId).string().not_null())
                    .col(ColumnDef::new(Allocations::RmId).string().null())
                    .col(ColumnDef::new(Allocations::BmId).string().null())
                    .col(ColumnDef::new(Allocations::ManagerId).string().null())
                    .col(ColumnDef::new(Allocations::Item).string().not_null())
                    .col(
                        ColumnDef::new(Allocations::Purpose)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Allocations::PurposeTag).string().not_null())
                    .col(ColumnDef::new(Allocations::AssignedBy).string().not_null())
                    .col(
                        ColumnDef::new(Allocations::AssignedRole)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Allocations::Region)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Allocations::Branch)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Allocations::ToVendor)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Allocations::DispatchedAt).timestamp().null())
                    .col(ColumnDef::new(Allocations::LrNo).string().null())
                    .col(ColumnDef::new(Allocations::LrUpdatedAt).timestamp().null())
                    .col(ColumnDef::new(Allocations::AllocatedOn).date().not_null())
                    .col(ColumnDef::new(Allocations::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Allocations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Allocations {
    Table,
    Id,
    RootId,
    RmId,
    BmId,
    ManagerId,
    Item,
    Purpose,
    PurposeTag,
    AssignedBy,
    AssignedRole,
    Region,
    Branch,
    ToVendor,
    DispatchedAt,
    LrNo,
    LrUpdatedAt,
    AllocatedOn,
    CreatedAt,
}
