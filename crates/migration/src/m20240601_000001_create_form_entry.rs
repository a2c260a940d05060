//! Create `form_entry` table.
//! One row per recorded measurement; `value` stays NULL until the entry is filled in.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FormEntry::Table)
                    .if_not_exists()
                    .col(uuid(FormEntry::Id).primary_key())
                    .col(string_len(FormEntry::Type, 128).not_null())
                    .col(timestamp_with_time_zone(FormEntry::Date).not_null())
                    .col(ColumnDef::new(FormEntry::Value).json_binary().null())
                    .col(string_len(FormEntry::Units, 64).not_null())
                    .col(string_len(FormEntry::DataType, 16).not_null())
                    .col(json_binary(FormEntry::Validations).not_null())
                    .col(timestamp_with_time_zone(FormEntry::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(FormEntry::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // List endpoints always sort by date descending
        manager
            .create_index(
                Index::create()
                    .name("idx_form_entry_date")
                    .table(FormEntry::Table)
                    .col(FormEntry::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FormEntry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FormEntry {
    Table,
    Id,
    Type,
    Date,
    Value,
    Units,
    DataType,
    Validations,
    CreatedAt,
    UpdatedAt,
}
