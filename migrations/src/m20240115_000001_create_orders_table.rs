use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Original orders schema: cancellation is a plain boolean flag.
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Number)
                            .string()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::Asin).string().not_null())
                    .col(ColumnDef::new(Orders::Product).string().not_null())
                    .col(ColumnDef::new(Orders::OrderedAt).timestamp().not_null())
                    .col(ColumnDef::new(Orders::DeliveredAt).timestamp().null())
                    .col(ColumnDef::new(Orders::Etv).decimal().not_null().default(0))
                    .col(ColumnDef::new(Orders::EtvFactor).decimal().null())
                    .col(
                        ColumnDef::new(Orders::Cancelled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Orders::EtvReason).string_len(255).null())
                    .col(ColumnDef::new(Orders::Notes).string_len(2000).null())
                    .to_owned(),
            )
            .await?;

        // Both date axes are filter columns.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_ordered_at")
                    .table(Orders::Table)
                    .col(Orders::OrderedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_delivered_at")
                    .table(Orders::Table)
                    .col(Orders::DeliveredAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Number,
    Asin,
    Product,
    OrderedAt,
    DeliveredAt,
    Etv,
    EtvFactor,
    Cancelled,
    EtvReason,
    Notes,
}
