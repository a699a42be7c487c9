//! In-memory OrderRepository for development and handler tests.

use async_trait::async_trait;
use chrono::Datelike;
use database::mongodb::parse_object_id;
use database::{Pagination, SortDirection};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, DateRange, Order, OrderAggregate, UpdateOrder};
use crate::repository::OrderRepository;

/// Customers stand in for the `users` collection: only orders whose
/// `user_id` was registered through [`add_customer`](Self::add_customer)
/// are returned by [`OrderRepository::list_by_customer`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<Vec<Order>>>,
    customers: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_customer(&self, customer_id: &str) {
        self.customers.write().await.insert(customer_id.to_string());
    }

    /// Inserts an order as-is, keeping its timestamps.
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    async fn in_range(&self, range: &DateRange, direction: SortDirection) -> Vec<Order> {
        let orders = self.orders.read().await;
        let mut matched: Vec<Order> = orders
            .iter()
            .filter(|o| range.contains(o.created_at))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if direction.is_descending() {
            matched.reverse();
        }
        matched
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, input: CreateOrder, total: Decimal) -> OrderResult<Order> {
        parse_object_id(&input.user_id)?;
        parse_object_id(&input.product_id)?;
        let order = Order::new(ObjectId::new().to_hex(), input, total);
        self.orders.write().await.push(order.clone());
        tracing::info!(order_id = %order.id, "Created order");
        Ok(order)
    }

    async fn get_by_id(&self, id: &str) -> OrderResult<Option<Order>> {
        parse_object_id(id)?;
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update(&self, id: &str, input: UpdateOrder, total: Decimal) -> OrderResult<Order> {
        parse_object_id(id)?;
        parse_object_id(&input.user_id)?;
        parse_object_id(&input.product_id)?;
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        order.apply_update(input, total);
        Ok(order.clone())
    }

    async fn delete(&self, id: &str) -> OrderResult<()> {
        parse_object_id(id)?;
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        if orders.len() == before {
            return Err(OrderError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, page: Pagination) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(page.slice(orders.as_slice()).to_vec())
    }

    async fn list_by_date_range(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<Order>> {
        let matched = self.in_range(&range, direction).await;
        Ok(page.slice(&matched).to_vec())
    }

    async fn list_aggregates(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<OrderAggregate>> {
        let matched = self.in_range(&range, SortDirection::Ascending).await;

        let mut buckets: BTreeMap<(i32, u32), (i64, Decimal)> = BTreeMap::new();
        for order in &matched {
            let key = (order.created_at.year(), order.created_at.month());
            let bucket = buckets.entry(key).or_insert((0, Decimal::ZERO));
            bucket.0 += 1;
            bucket.1 += order.total;
        }

        let mut aggregates: Vec<OrderAggregate> = buckets
            .into_iter()
            .map(|((year, month), (total_orders, total_revenue))| OrderAggregate {
                year,
                month: i32::try_from(month).unwrap_or_default(),
                total_orders,
                total_revenue,
            })
            .collect();
        if direction.is_descending() {
            aggregates.reverse();
        }
        Ok(page.slice(&aggregates).to_vec())
    }

    async fn list_by_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>> {
        parse_object_id(customer_id)?;
        let known = self.customers.read().await.contains(customer_id);
        let mut matched: Vec<Order> = if known {
            let orders = self.orders.read().await;
            orders
                .iter()
                .filter(|o| o.user_id == customer_id)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        if matched.is_empty() {
            return Err(OrderError::NoCustomerOrders(customer_id.to_string()));
        }
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }
}
