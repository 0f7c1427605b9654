#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use order::{
    abstract_trait::{
        invoice::InvoiceGeneratorTrait,
        order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        product::ProductQueryRepositoryTrait,
    },
    di::{OrderTimeouts, Repositories},
    domain::requests::order::{
        CreateOrderItemRecordRequest, CreateOrderRecordRequest, CreateOrderRequest,
        FindMyOrders, OrderProductRequest, OrderSortField, SortDirection,
        TrashOrderRecordRequest,
    },
    model::{order::Order, order_item::OrderItem, product::Product, status::RecordStatus},
    service::invoice::TimestampInvoiceGenerator,
};
use rust_decimal::Decimal;
use shared::{config::CustomerClaims, errors::RepositoryError};
use std::{
    collections::{HashMap, VecDeque},
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal literal")
}

pub fn customer(id: &str) -> CustomerClaims {
    CustomerClaims {
        id: id.into(),
        name: format!("{id}-name"),
    }
}

pub fn line(product_id: &str, qty: &str) -> OrderProductRequest {
    OrderProductRequest {
        product_id: product_id.into(),
        qty: dec(qty),
    }
}

pub fn order_request(lines: Vec<OrderProductRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        payment: false,
        products: lines,
    }
}

pub fn timeouts() -> OrderTimeouts {
    OrderTimeouts {
        lock: Duration::from_secs(5),
        transaction: Duration::from_secs(5),
    }
}

/// Step of the order transaction at which the store should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    InsertHeader,
    InsertItems,
    DecrementStock,
    Commit,
}

impl FailAt {
    fn step(self) -> &'static str {
        match self {
            FailAt::InsertHeader => "insert order header",
            FailAt::InsertItems => "insert order items",
            FailAt::DecrementStock => "decrement stock",
            FailAt::Commit => "commit",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    products: HashMap<String, Product>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
}

/// In-memory stand-in for the Postgres tables.
///
/// `create_order` works on a staged copy of the tables and only swaps it in
/// when every step succeeded, so a failure leaves no trace.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_at: Mutex<Option<FailAt>>,
    fail_product_lookup: Mutex<bool>,
    write_delay: Mutex<Option<Duration>>,
    create_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_product(self: &Arc<Self>, id: &str, price: &str, stock: &str) -> Arc<Self> {
        self.put_product(id, price, stock, RecordStatus::Active);
        Arc::clone(self)
    }

    pub fn put_product(&self, id: &str, price: &str, stock: &str, status: RecordStatus) {
        let product = Product {
            id: id.into(),
            name: format!("Product {id}"),
            price: dec(price),
            stock: dec(stock),
            status: status.as_str().into(),
        };
        self.lock().products.insert(id.into(), product);
    }

    pub fn set_price(&self, id: &str, price: &str) {
        if let Some(product) = self.lock().products.get_mut(id) {
            product.price = dec(price);
        }
    }

    pub fn seed_order(&self, invoice: &str, customer_id: &str) {
        self.lock().orders.push(Order {
            invoice: invoice.into(),
            customer_id: customer_id.into(),
            amount: Decimal::ZERO,
            payment: false,
            status: RecordStatus::Active.as_str().into(),
            created_at: Utc::now().naive_utc(),
            created_by: "seed".into(),
            updated_at: None,
            updated_by: None,
        });
    }

    pub fn fail_at(&self, step: Option<FailAt>) {
        *self.fail_at.lock().expect("fail_at poisoned") = step;
    }

    pub fn fail_product_lookup(&self, fail: bool) {
        *self.fail_product_lookup.lock().expect("flag poisoned") = fail;
    }

    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock().expect("delay poisoned") = Some(delay);
    }

    pub fn stock(&self, id: &str) -> Decimal {
        self.lock()
            .products
            .get(id)
            .map(|p| p.stock)
            .expect("known product")
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    pub fn items(&self) -> Vec<OrderItem> {
        self.lock().items.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn repositories(self: &Arc<Self>, invoices: Arc<dyn InvoiceGeneratorTrait + Send + Sync>) -> Repositories {
        Repositories {
            products: self.clone(),
            order_command: self.clone(),
            order_query: self.clone(),
            invoices,
        }
    }

    pub fn default_repositories(self: &Arc<Self>) -> Repositories {
        self.repositories(Arc::new(TimestampInvoiceGenerator::new()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("tables poisoned")
    }

    fn check(&self, step: FailAt) -> Result<(), RepositoryError> {
        if *self.fail_at.lock().expect("fail_at poisoned") == Some(step) {
            return Err(RepositoryError::Custom("injected failure".into()).in_step(step.step()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        if *self.fail_product_lookup.lock().expect("flag poisoned") {
            return Err(RepositoryError::Custom("inventory unavailable".into()));
        }

        Ok(self
            .lock()
            .products
            .get(id)
            .filter(|p| p.status != RecordStatus::Deleted.as_str())
            .cloned())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for MemoryStore {
    async fn create_order(
        &self,
        order: &CreateOrderRecordRequest,
        items: &[CreateOrderItemRecordRequest],
    ) -> Result<(), RepositoryError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.write_delay.lock().expect("delay poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut tables = self.lock();
        let mut staged = tables.clone();
        let now = Utc::now().naive_utc();

        self.check(FailAt::InsertHeader)?;
        if staged.orders.iter().any(|o| o.invoice == order.invoice) {
            return Err(RepositoryError::AlreadyExists(format!(
                "duplicate key value violates unique constraint \"orders_pkey\" ({})",
                order.invoice
            ))
            .in_step("insert order header"));
        }
        staged.orders.push(Order {
            invoice: order.invoice.clone(),
            customer_id: order.customer_id.clone(),
            amount: order.amount,
            payment: order.payment,
            status: order.status.as_str().into(),
            created_at: now,
            created_by: order.created_by.clone(),
            updated_at: None,
            updated_by: None,
        });

        self.check(FailAt::InsertItems)?;
        staged.items.extend(items.iter().map(|item| OrderItem {
            invoice: item.invoice.clone(),
            product_id: item.product_id.clone(),
            qty: item.qty,
            price: item.price,
            amount: item.amount,
            status: item.status.as_str().into(),
            created_at: now,
            created_by: item.created_by.clone(),
            updated_at: None,
            updated_by: None,
        }));

        for item in items {
            self.check(FailAt::DecrementStock)?;
            match staged.products.get_mut(&item.product_id) {
                Some(product) if product.stock >= item.qty => product.stock -= item.qty,
                _ => {
                    return Err(RepositoryError::InsufficientStock(item.product_id.clone())
                        .in_step("decrement stock"));
                }
            }
        }

        self.check(FailAt::Commit)?;
        *tables = staged;
        Ok(())
    }

    async fn trash_order(&self, req: &TrashOrderRecordRequest) -> Result<Order, RepositoryError> {
        let mut tables = self.lock();
        let now = Utc::now().naive_utc();
        let deleted = RecordStatus::Deleted.as_str();

        let order = tables
            .orders
            .iter_mut()
            .find(|o| {
                o.invoice == req.invoice && o.customer_id == req.customer_id && o.status != deleted
            })
            .ok_or(RepositoryError::NotFound)?;
        order.status = deleted.into();
        order.updated_at = Some(now);
        order.updated_by = Some(req.updated_by.clone());
        let trashed = order.clone();

        for item in tables.items.iter_mut().filter(|i| i.invoice == req.invoice) {
            item.status = deleted.into();
            item.updated_at = Some(now);
            item.updated_by = Some(req.updated_by.clone());
        }

        Ok(trashed)
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for MemoryStore {
    async fn find_by_customer(
        &self,
        customer_id: &str,
        req: &FindMyOrders,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let needle = req
            .invoice
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .filter(|o| o.status != RecordStatus::Deleted.as_str())
            .filter(|o| match &needle {
                Some(n) => o.invoice.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        orders.sort_by(|a, b| {
            let ord = match req.sort_field {
                OrderSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                OrderSortField::Invoice => a.invoice.cmp(&b.invoice),
                OrderSortField::Amount => a.amount.cmp(&b.amount),
            }
            .then_with(|| a.invoice.cmp(&b.invoice));
            match req.sort_direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = orders.len() as i64;
        let page = orders
            .into_iter()
            .skip(req.offset() as usize)
            .take(req.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_invoice(&self, invoice: &str) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .lock()
            .orders
            .iter()
            .find(|o| o.invoice == invoice)
            .cloned())
    }

    async fn find_items_by_invoice(&self, invoice: &str) -> Result<Vec<OrderItem>, RepositoryError> {
        Ok(self
            .lock()
            .items
            .iter()
            .filter(|i| i.invoice == invoice)
            .cloned()
            .collect())
    }
}

/// Hands out a fixed sequence of invoices, then numbered fallbacks.
pub struct ScriptedInvoices {
    queue: Mutex<VecDeque<String>>,
    issued: AtomicUsize,
}

impl ScriptedInvoices {
    pub fn new(invoices: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(invoices.iter().map(|s| s.to_string()).collect()),
            issued: AtomicUsize::new(0),
        })
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

impl InvoiceGeneratorTrait for ScriptedInvoices {
    fn generate(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .expect("queue poisoned")
            .pop_front()
            .unwrap_or_else(|| format!("INV/fallback-{n}"))
    }
}
