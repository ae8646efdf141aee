//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

use crate::config::DEFAULT_STRING_LENGTH;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_password_reset_tokens_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_password_reset_tokens_table::Migration),
        ]
    }
}

/// String column capped at `DEFAULT_STRING_LENGTH`.
pub(crate) fn default_string<T: IntoIden>(column: T) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    def.string_len(DEFAULT_STRING_LENGTH);
    def
}
