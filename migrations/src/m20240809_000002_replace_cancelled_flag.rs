use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The boolean flag becomes a nullable cancellation timestamp. The
        // original cancellation instant is not recoverable from a boolean,
        // so every existing row starts out with a null `cancelled_at`.
        manager
            .alter_table(
                Table::alter()
                    .table(Orders::Table)
                    .drop_column(Orders::Cancelled)
                    .to_owned(),
            )
            .await?;

        let mut col = ColumnDef::new(Orders::CancelledAt);
        col.timestamp().null();
        manager
            .alter_table(
                Table::alter()
                    .table(Orders::Table)
                    .add_column(col)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_cancelled_at")
                    .table(Orders::Table)
                    .col(Orders::CancelledAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Migration(
            "cancelled flag cannot be reconstructed from cancelled_at; no downgrade path".to_owned(),
        ))
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Cancelled,
    CancelledAt,
}
