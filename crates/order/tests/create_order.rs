mod common;

use common::{FailAt, MemoryStore, ScriptedInvoices, customer, dec, line, order_request, timeouts};
use order::{
    abstract_trait::order::service::DynOrderCommandService,
    di::{DependenciesInject, OrderTimeouts, Repositories},
    service::order::MAX_INVOICE_ATTEMPTS,
};
use prometheus_client::registry::Registry;
use rstest::rstest;
use shared::errors::ServiceError;
use std::{sync::Arc, time::Duration};

fn command_service(repos: Repositories, timeouts: OrderTimeouts) -> DynOrderCommandService {
    DependenciesInject::from_repositories(repos, timeouts, &mut Registry::default()).order_command
}

fn service_for(store: &Arc<MemoryStore>) -> DynOrderCommandService {
    command_service(store.default_repositories(), timeouts())
}

fn catalogue() -> Arc<MemoryStore> {
    MemoryStore::new()
        .with_product("A", "10.00", "10")
        .with_product("B", "5.00", "3")
}

#[tokio::test]
async fn places_order_and_decrements_stock() {
    let store = catalogue();
    let service = service_for(&store);

    let response = service
        .create_order(
            &customer("C1"),
            &order_request(vec![line("A", "2"), line("B", "1")]),
        )
        .await
        .expect("order placed");

    assert_eq!(response.status, "success");
    assert_eq!(response.message, "Order created successfully");
    assert!(response.data.invoice.starts_with("INV/"));
    assert_eq!(response.data.amount, dec("25.00"));
    assert!(response.data.excluded_products.is_empty());

    let orders = store.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].invoice, response.data.invoice);
    assert_eq!(orders[0].customer_id, "C1");
    assert_eq!(orders[0].created_by, "C1-name");
    assert_eq!(orders[0].status, "active");

    let items = store.items();
    assert_eq!(items.len(), 2);
    let line_sum: rust_decimal::Decimal = items.iter().map(|i| i.amount).sum();
    assert_eq!(line_sum, orders[0].amount);

    assert_eq!(store.stock("A"), dec("8"));
    assert_eq!(store.stock("B"), dec("2"));
}

#[tokio::test]
async fn fractional_quantities_are_rounded_per_line() {
    let store = MemoryStore::new().with_product("A", "10.33", "10");
    let service = service_for(&store);

    let response = service
        .create_order(&customer("C1"), &order_request(vec![line("A", "1.5")]))
        .await
        .expect("order placed");

    assert_eq!(response.data.amount, dec("15.50"));
    assert_eq!(store.stock("A"), dec("8.5"));
}

#[rstest]
#[case(FailAt::InsertHeader)]
#[case(FailAt::InsertItems)]
#[case(FailAt::DecrementStock)]
#[case(FailAt::Commit)]
#[tokio::test]
async fn failure_at_any_step_leaves_no_trace(#[case] step: FailAt) {
    let store = catalogue();
    store.fail_at(Some(step));
    let service = service_for(&store);

    let err = service
        .create_order(
            &customer("C1"),
            &order_request(vec![line("A", "2"), line("B", "1")]),
        )
        .await
        .unwrap_err();

    match &err {
        ServiceError::OrderPersistence(repo) => assert!(repo.step().is_some()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
    assert!(store.orders().is_empty());
    assert!(store.items().is_empty());
    assert_eq!(store.stock("A"), dec("10"));
    assert_eq!(store.stock("B"), dec("3"));
}

#[tokio::test]
async fn insufficient_stock_on_later_line_rolls_back_earlier_lines() {
    let store = catalogue();
    let service = service_for(&store);

    let err = service
        .create_order(
            &customer("C1"),
            &order_request(vec![line("A", "2"), line("B", "4")]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InsufficientStock(ref id) if id == "B"));
    assert!(store.orders().is_empty());
    assert_eq!(store.stock("A"), dec("10"));
    assert_eq!(store.stock("B"), dec("3"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_never_oversell() {
    let store = MemoryStore::new().with_product("A", "1.00", "5");
    store.delay_writes(Duration::from_millis(20));
    let service = service_for(&store);

    let first = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_order(&customer("C1"), &order_request(vec![line("A", "3")]))
                .await
        })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_order(&customer("C2"), &order_request(vec![line("A", "3")]))
                .await
        })
    };

    let results = [
        first.await.expect("task joined"),
        second.await.expect("task joined"),
    ];

    let placed = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(ServiceError::InsufficientStock(id)) if id == "A"))
        .count();

    assert_eq!((placed, rejected), (1, 1));
    assert_eq!(store.stock("A"), dec("2"));
    assert_eq!(store.orders().len(), 1);
}

#[tokio::test]
async fn line_keeps_price_paid_after_catalogue_change() {
    let store = catalogue();
    let service = service_for(&store);

    service
        .create_order(&customer("C1"), &order_request(vec![line("A", "1")]))
        .await
        .expect("order placed");

    store.set_price("A", "99.99");

    let items = store.items();
    assert_eq!(items[0].price, dec("10.00"));
    assert_eq!(items[0].amount, dec("10.00"));
}

#[tokio::test]
async fn zero_stock_products_are_left_out_and_reported() {
    let store = catalogue().with_product("Z", "7.00", "0");
    let service = service_for(&store);

    let response = service
        .create_order(
            &customer("C1"),
            &order_request(vec![line("Z", "1"), line("B", "1")]),
        )
        .await
        .expect("order placed");

    assert_eq!(response.data.amount, dec("5.00"));
    assert_eq!(response.data.excluded_products, vec!["Z".to_string()]);

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, "B");
    assert_eq!(store.stock("Z"), dec("0"));
}

#[tokio::test]
async fn all_lines_out_of_stock_writes_nothing() {
    let store = MemoryStore::new().with_product("Z", "7.00", "0");
    let service = service_for(&store);

    let err = service
        .create_order(&customer("C1"), &order_request(vec![line("Z", "1")]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::OutOfStock));
    assert_eq!(store.create_calls(), 0);
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn unknown_product_fails_before_any_write() {
    let store = catalogue();
    let service = service_for(&store);

    let err = service
        .create_order(
            &customer("C1"),
            &order_request(vec![line("A", "1"), line("GHOST", "1")]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::ProductNotFound(ref id) if id == "GHOST"));
    assert_eq!(store.create_calls(), 0);
    assert_eq!(store.stock("A"), dec("10"));
}

#[tokio::test]
async fn deleted_product_is_treated_as_missing() {
    let store = catalogue();
    store.put_product(
        "OLD",
        "3.00",
        "10",
        order::model::status::RecordStatus::Deleted,
    );
    let service = service_for(&store);

    let err = service
        .create_order(&customer("C1"), &order_request(vec![line("OLD", "1")]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::ProductNotFound(_)));
}

#[tokio::test]
async fn inventory_outage_is_not_reported_as_missing_product() {
    let store = catalogue();
    store.fail_product_lookup(true);
    let service = service_for(&store);

    let err = service
        .create_order(&customer("C1"), &order_request(vec![line("A", "1")]))
        .await
        .unwrap_err();

    match err {
        ServiceError::Repo(repo) => assert_eq!(repo.step(), Some("load product")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
#[case(vec![])]
#[case(vec![line("A", "0")])]
#[case(vec![line("A", "-1")])]
#[case(vec![line("", "1")])]
#[tokio::test]
async fn invalid_requests_are_rejected(#[case] lines: Vec<order::domain::requests::order::OrderProductRequest>) {
    let store = catalogue();
    let service = service_for(&store);

    let err = service
        .create_order(&customer("C1"), &order_request(lines))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(ref msgs) if !msgs.is_empty()));
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn resubmitting_after_failure_places_exactly_one_order() {
    let store = catalogue();
    let service = service_for(&store);
    let request = order_request(vec![line("A", "2")]);

    store.fail_at(Some(FailAt::Commit));
    let err = service
        .create_order(&customer("C1"), &request)
        .await
        .unwrap_err();
    assert!(err.is_retryable());

    store.fail_at(None);
    service
        .create_order(&customer("C1"), &request)
        .await
        .expect("retry succeeds");

    assert_eq!(store.orders().len(), 1);
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.stock("A"), dec("8"));
}

#[tokio::test]
async fn taken_invoice_is_replaced_with_a_fresh_one() {
    let store = catalogue();
    store.seed_order("INV/1", "someone-else");
    let invoices = ScriptedInvoices::new(&["INV/1", "INV/2"]);
    let service = command_service(store.repositories(invoices.clone()), timeouts());

    let response = service
        .create_order(&customer("C1"), &order_request(vec![line("A", "1")]))
        .await
        .expect("order placed on second invoice");

    assert_eq!(response.data.invoice, "INV/2");
    assert_eq!(invoices.issued(), 2);
    assert_eq!(store.stock("A"), dec("9"));
}

#[tokio::test]
async fn invoice_retries_are_bounded() {
    let store = catalogue();
    for invoice in ["INV/1", "INV/2", "INV/3"] {
        store.seed_order(invoice, "someone-else");
    }
    let invoices = ScriptedInvoices::new(&["INV/1", "INV/2", "INV/3"]);
    let service = command_service(store.repositories(invoices.clone()), timeouts());

    let err = service
        .create_order(&customer("C1"), &order_request(vec![line("A", "1")]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::OrderPersistence(ref repo) if repo.is_unique_violation()));
    assert_eq!(store.create_calls(), MAX_INVOICE_ATTEMPTS);
    assert_eq!(invoices.issued(), MAX_INVOICE_ATTEMPTS);
    assert_eq!(store.stock("A"), dec("10"));
}

#[tokio::test]
async fn slow_transaction_times_out_without_writing() {
    let store = catalogue();
    store.delay_writes(Duration::from_millis(500));
    let service = command_service(
        store.default_repositories(),
        OrderTimeouts {
            lock: Duration::from_secs(1),
            transaction: Duration::from_millis(20),
        },
    );

    let err = service
        .create_order(&customer("C1"), &order_request(vec![line("A", "1")]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::LockTimeout(_)));
    assert!(err.is_retryable());
    assert!(store.orders().is_empty());
    assert_eq!(store.stock("A"), dec("10"));
}
