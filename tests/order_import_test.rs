mod common;

use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use etv_ledger::entities::order::Entity as OrderEntity;

use common::{cancellation, record, ts, TestDb};

#[tokio::test]
async fn import_inserts_new_orders() {
    let db = TestDb::new().await;

    let summary = db
        .import_service()
        .import_records(vec![
            record(
                "114-0000001-0000001",
                "B000AAA111",
                "USB-C Cable",
                ts(2024, 3, 14, 9, 30),
                Some(ts(2024, 3, 18, 16, 0)),
                dec!(12.99),
            ),
            record(
                "114-0000002-0000002",
                "B000BBB222",
                "Gadget Stand",
                ts(2024, 3, 14, 11, 0),
                None,
                dec!(25.50),
            ),
        ])
        .await
        .expect("import");

    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.cancellations, 0);

    let stored = OrderEntity::find()
        .all(&*db.pool)
        .await
        .expect("list orders");
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn reimporting_an_existing_number_changes_nothing() {
    let db = TestDb::new().await;
    let import = db.import_service();

    let original = record(
        "114-0000001-0000001",
        "B000AAA111",
        "USB-C Cable",
        ts(2024, 3, 14, 9, 30),
        Some(ts(2024, 3, 18, 16, 0)),
        dec!(12.99),
    );
    import
        .import_records(vec![original.clone()])
        .await
        .expect("first import");

    // A user adjustment between uploads must survive the re-upload.
    db.order_service()
        .set_etv_factor("114-0000001-0000001", Some(dec!(0.2)))
        .await
        .expect("set factor");

    // Same line again, but with divergent descriptive data: still a no-op.
    let mut altered = original;
    altered.product = "Renamed Cable".to_string();
    altered.etv = dec!(99.99);
    let summary = import
        .import_records(vec![altered])
        .await
        .expect("second import");

    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.skipped, 1);

    let stored = OrderEntity::find_by_id("114-0000001-0000001".to_string())
        .one(&*db.pool)
        .await
        .expect("fetch")
        .expect("row exists");
    assert_eq!(stored.product, "USB-C Cable");
    assert_eq!(stored.etv, dec!(12.99));
    assert_eq!(stored.etv_factor, Some(dec!(0.2)));
}

#[tokio::test]
async fn cancellation_line_marks_the_existing_row() {
    let db = TestDb::new().await;

    // The documented two-line case: a delivery line followed by a
    // cancellation line for the same number yields one row.
    let summary = db
        .import_service()
        .import_records(vec![
            record(
                "9999",
                "B000FFF666",
                "Mech Keyboard",
                ts(2024, 4, 10, 13, 0),
                None,
                dec!(59.99),
            ),
            cancellation("9999", ts(2024, 4, 12, 0, 0)),
        ])
        .await
        .expect("import");

    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.cancellations, 1);

    let stored = OrderEntity::find()
        .all(&*db.pool)
        .await
        .expect("list orders");
    assert_eq!(stored.len(), 1);
    let row = &stored[0];
    assert_eq!(row.number, "9999");
    assert_eq!(row.cancelled_at, Some(ts(2024, 4, 12, 0, 0)));
    assert_eq!(row.product, "Mech Keyboard");
    assert_eq!(row.etv, dec!(59.99));
}

#[tokio::test]
async fn repeated_cancellation_keeps_the_first_instant() {
    let db = TestDb::new().await;
    let import = db.import_service();

    import
        .import_records(vec![
            record(
                "9999",
                "B000FFF666",
                "Mech Keyboard",
                ts(2024, 4, 10, 13, 0),
                None,
                dec!(59.99),
            ),
            cancellation("9999", ts(2024, 4, 12, 0, 0)),
        ])
        .await
        .expect("first import");

    let summary = import
        .import_records(vec![cancellation("9999", ts(2024, 5, 1, 0, 0))])
        .await
        .expect("second import");
    assert_eq!(summary.cancellations, 0);

    let row = OrderEntity::find_by_id("9999".to_string())
        .one(&*db.pool)
        .await
        .expect("fetch")
        .expect("row exists");
    assert_eq!(row.cancelled_at, Some(ts(2024, 4, 12, 0, 0)));
}

#[tokio::test]
async fn negative_etv_rejects_the_whole_batch() {
    let db = TestDb::new().await;

    let err = db
        .import_service()
        .import_records(vec![
            record(
                "114-0000001-0000001",
                "B000AAA111",
                "USB-C Cable",
                ts(2024, 3, 14, 9, 30),
                None,
                dec!(12.99),
            ),
            record(
                "114-0000002-0000002",
                "B000BBB222",
                "Gadget Stand",
                ts(2024, 3, 14, 11, 0),
                None,
                dec!(-1.00),
            ),
        ])
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // Rejected before any storage access: the valid line is absent too.
    let stored = OrderEntity::find()
        .all(&*db.pool)
        .await
        .expect("list orders");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn empty_order_number_is_rejected() {
    let db = TestDb::new().await;

    let err = db
        .import_service()
        .import_records(vec![record(
            "",
            "B000AAA111",
            "USB-C Cable",
            ts(2024, 3, 14, 9, 30),
            None,
            dec!(12.99),
        )])
        .await
        .unwrap_err();
    assert!(err.is_validation());
}
