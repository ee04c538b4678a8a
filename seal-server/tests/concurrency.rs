//! Concurrent workflow calls against one WAL database
//!
//! Several pool connections race for SQLite's write lock; the guarded
//! updates must keep stock and serial uniqueness intact.

mod common;

use common::*;
use rand::Rng;
use seal_server::FulfillmentError;
use seal_server::db::repository::{payment, serial, stock};
use shared::models::{
    InvoiceCreate, InvoiceStatus, InvoiceType, OrderStatus, PaymentCreate, PaymentMethod,
    PrintingJobCreate,
};
use tokio::task::JoinSet;

/// Uppercase prefix unique per task: A, B, ..., Z, AA, AB, ...
fn prefix(idx: usize) -> String {
    let mut s = String::new();
    let mut n = idx + 1;
    while n > 0 {
        n -= 1;
        s.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    s
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_never_oversell() {
    const TASKS: usize = 12;
    const ON_HAND: i64 = 20;

    let env = TestEnv::with_connections(6).await;
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", ON_HAND).await;

    let quantities: Vec<i64> = {
        let mut rng = rand::thread_rng();
        (0..TASKS).map(|_| rng.gen_range(1..=4)).collect()
    };

    let mut tasks = JoinSet::new();
    for (idx, quantity) in quantities.into_iter().enumerate() {
        let service = env.state.fulfillment.clone();
        let p = prefix(idx);
        tasks.spawn(async move {
            let result = service
                .create_order(
                    &director(),
                    order(
                        customer_id,
                        vec![line(
                            product_id,
                            quantity,
                            &format!("{p}001"),
                            &format!("{p}{quantity:03}"),
                        )],
                    ),
                )
                .await;
            (quantity, result)
        });
    }

    let mut reserved = 0;
    while let Some(joined) = tasks.join_next().await {
        let (quantity, result) = joined.unwrap();
        match result {
            Ok(detail) => {
                assert_eq!(detail.order.status, OrderStatus::WaitingPrint);
                reserved += quantity;
            }
            Err(FulfillmentError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let s = stock::find(&env.state.pool, product_id).await.unwrap().unwrap();
    assert_eq!(s.reserved, reserved);
    assert_eq!(s.available + s.reserved, ON_HAND);
    assert!(s.available >= 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overlapping_ranges_issue_once() {
    const TASKS: usize = 6;

    let env = TestEnv::with_connections(6).await;
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", 1000).await;

    let mut tasks = JoinSet::new();
    for _ in 0..TASKS {
        let service = env.state.fulfillment.clone();
        tasks.spawn(async move {
            service
                .create_order(
                    &director(),
                    order(customer_id, vec![line(product_id, 50, "OV0001", "OV0050")]),
                )
                .await
        });
    }

    let mut winners = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => winners += 1,
            Err(FulfillmentError::DuplicateSerial { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(winners, 1);

    let pool = &env.state.pool;
    assert!(serial::search(pool, "OV0050").await.unwrap().is_some());
    let s = stock::find(pool, product_id).await.unwrap().unwrap();
    assert_eq!((s.available, s.reserved), (950, 50));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_reconcile_once() {
    let env = TestEnv::with_connections(6).await;
    let service = env.state.fulfillment.clone();
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", 100).await;

    // 20 x 1.50 + 10.00 tax = 40.00
    let detail = service
        .create_order(
            &director(),
            order(customer_id, vec![line(product_id, 20, "CP001", "CP020")]),
        )
        .await
        .unwrap();
    let job = service
        .create_printing_job(
            &director(),
            PrintingJobCreate {
                order_id: detail.order.id,
                assigned_to: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    service.complete_printing_job(&operator(), job.id).await.unwrap();
    let invoice = service
        .create_invoice(
            &director(),
            InvoiceCreate {
                order_id: detail.order.id,
                invoice_type: InvoiceType::Normal,
                due_date: None,
                tax_amount: 10.0,
            },
        )
        .await
        .unwrap();
    assert_eq!(invoice.total_amount, 40.0);

    let mut tasks = JoinSet::new();
    for _ in 0..4 {
        let service = service.clone();
        let invoice_id = invoice.id;
        tasks.spawn(async move {
            service
                .record_payment(
                    &cashier(),
                    PaymentCreate {
                        invoice_id,
                        amount: 10.0,
                        method: PaymentMethod::Cash,
                        reference_no: None,
                        notes: None,
                    },
                )
                .await
        });
    }

    let mut completed = 0;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.unwrap().unwrap();
        if outcome.invoice_status == InvoiceStatus::Paid {
            completed += 1;
            assert_eq!(outcome.order_status, OrderStatus::Completed);
        }
    }
    // Only the payment that closed the balance saw the invoice paid
    assert_eq!(completed, 1);

    let payments = payment::find_by_invoice(&env.state.pool, invoice.id).await.unwrap();
    assert_eq!(payments.len(), 4);
    assert_eq!(payments.iter().map(|p| p.amount).sum::<f64>(), 40.0);
}

#[test]
fn test_prefix_is_uppercase_and_unique() {
    let prefixes: Vec<String> = (0..60).map(prefix).collect();
    assert_eq!(prefixes[0], "A");
    assert_eq!(prefixes[25], "Z");
    assert_eq!(prefixes[26], "AA");
    let mut unique = prefixes.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), prefixes.len());
}
