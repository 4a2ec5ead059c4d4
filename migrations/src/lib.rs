pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_allocations_table;
mod m20250301_000002_create_allocation_lines_table;
mod m20250301_000003_create_sample_usages_table;
mod m20250301_000004_add_chain_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_allocations_table::Migration),
            Box::new(m20250301_000002_create_allocation_lines_table::Migration),
            Box::new(m20250301_000003_create_sample_usages_table::Migration),
            Box::new(m20250301_000004_add_chain_indexes::Migration),
        ]
    }
}
