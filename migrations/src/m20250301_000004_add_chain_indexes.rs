use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_allocations_table::Allocations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The lineage resolver union-matches on each chain column, so each
        // level id gets its own index.
        manager
            .create_index(
                Index::create()
                    .name("idx_allocations_root_id")
                    .table(Allocations::Table)
                    .col(Allocations::RootId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_allocations_rm_id")
                    .table(Allocations::Table)
                    .col(Allocations::RmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_allocations_bm_id")
                    .table(Allocations::Table)
                    .col(Allocations::BmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_allocations_to_vendor")
                    .table(Allocations::Table)
                    .col(Allocations::ToVendor)
                    .col(Allocations::PurposeTag)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_allocations_root_id",
            "idx_allocations_rm_id",
            "idx_allocations_bm_id",
            "idx_allocations_to_vendor",
        ] {
            manager
                .drop_index(
                    Index::drop()
                        .name(name)
                        .table(Allocations::Table)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
