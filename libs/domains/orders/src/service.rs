//! Order Service - pricing and business rules on top of the repositories

use database::{Pagination, SortDirection};
use domain_products::{ProductError, ProductRepository};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{instrument, Span};
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{order_total, CreateOrder, DateRange, Order, OrderAggregate, UpdateOrder};
use crate::repository::OrderRepository;

/// Order service. Totals are always computed here from the referenced
/// product's current price; stock is left untouched.
pub struct OrderService<O: OrderRepository, P: ProductRepository> {
    orders: Arc<O>,
    products: Arc<P>,
    span: Span,
}

impl<O: OrderRepository, P: ProductRepository> OrderService<O, P> {
    pub fn new(orders: O, products: Arc<P>) -> Self {
        Self {
            orders: Arc::new(orders),
            products,
            span: tracing::info_span!("order_service"),
        }
    }

    /// Parent span for every service operation.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// `price * quantity` of the referenced product.
    async fn price(&self, product_id: &str, quantity: i32) -> OrderResult<Decimal> {
        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| ProductError::NotFound(product_id.to_string()))?;
        Ok(order_total(product.price, quantity))
    }

    #[instrument(parent = &self.span, skip(self, input), fields(product_id = %input.product_id, quantity = input.quantity))]
    pub async fn create_order(&self, input: CreateOrder) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let total = self.price(&input.product_id, input.quantity).await?;
        self.orders.create(input, total).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn get_order(&self, id: &str) -> OrderResult<Order> {
        self.orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Re-prices against the product's current price.
    #[instrument(parent = &self.span, skip(self, input), fields(product_id = %input.product_id))]
    pub async fn update_order(&self, id: &str, input: UpdateOrder) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let total = self.price(&input.product_id, input.quantity).await?;
        self.orders.update(id, input, total).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn delete_order(&self, id: &str) -> OrderResult<()> {
        self.orders.delete(id).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn list_orders(&self, page: Pagination) -> OrderResult<Vec<Order>> {
        self.orders.list(page).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn list_by_date_range(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<Order>> {
        self.orders.list_by_date_range(range, direction, page).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn list_aggregates(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<OrderAggregate>> {
        self.orders.list_aggregates(range, direction, page).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn list_by_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>> {
        self.orders.list_by_customer(customer_id).await
    }
}

impl<O: OrderRepository, P: ProductRepository> Clone for OrderService<O, P> {
    fn clone(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            products: Arc::clone(&self.products),
            span: self.span.clone(),
        }
    }
}
