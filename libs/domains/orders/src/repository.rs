use async_trait::async_trait;
use database::{Pagination, SortDirection};
use rust_decimal::Decimal;

use crate::error::OrderResult;
use crate::models::{CreateOrder, DateRange, Order, OrderAggregate, UpdateOrder};

/// Repository trait for Order persistence
///
/// `create` and `update` receive the total already computed by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, input: CreateOrder, total: Decimal) -> OrderResult<Order>;

    async fn get_by_id(&self, id: &str) -> OrderResult<Option<Order>>;

    async fn update(&self, id: &str, input: UpdateOrder, total: Decimal) -> OrderResult<Order>;

    async fn delete(&self, id: &str) -> OrderResult<()>;

    async fn list(&self, page: Pagination) -> OrderResult<Vec<Order>>;

    /// Orders created inside `range`, sorted by `createdAt`. No match is an
    /// empty page, not an error.
    async fn list_by_date_range(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<Order>>;

    /// Monthly buckets over `range`; `page` applies to buckets.
    async fn list_aggregates(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<OrderAggregate>>;

    /// Orders of a customer that exists in the users collection, newest
    /// first. No match is [`OrderError::NoCustomerOrders`](crate::OrderError::NoCustomerOrders).
    async fn list_by_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>>;
}
