use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{OrderError, OrderResult};

pub const DEFAULT_STATUS: &str = "pending";

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Customer reference; format-checked, existence is not
    pub user_id: String,
    pub product_id: String,
    pub quantity: i32,
    /// Free-text status
    pub status: String,
    /// Product price at write time times quantity
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 29.97)]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new order. The total is computed server-side.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(default = "default_status")]
    #[schema(default = "pending")]
    pub status: String,
}

/// DTO for updating an order. The total is recomputed from the product's
/// current price; an absent status keeps the stored one.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub status: Option<String>,
}

/// Orders and revenue for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderAggregate {
    pub year: i32,
    pub month: i32,
    pub total_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,
}

/// `GET /orders/range` and `GET /orders/aggregates`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// Sort flag: `1` ascending (default), `-1` descending
    #[param(value_type = Option<i32>)]
    pub order: Option<String>,
    /// First day, `YYYY-MM-DD`, inclusive
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD`, inclusive
    pub end_date: Option<String>,
}

/// Inclusive `createdAt` window covering whole UTC days.
///
/// `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// From 00:00:00.000 on `start` to 23:59:59.999 on `end`.
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> OrderResult<Self> {
        let end = end
            .and_time(NaiveTime::MIN)
            .and_utc()
            .checked_add_signed(TimeDelta::days(1) - TimeDelta::milliseconds(1))
            .ok_or_else(|| OrderError::Validation(format!("end_date {end} is out of range")))?;

        Ok(Self {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end,
        })
    }

    /// Parses both bounds; both are required.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> OrderResult<Self> {
        let start = parse_day("start_date", start)?;
        let end = parse_day("end_date", end)?;
        Self::from_days(start, end)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

fn parse_day(name: &str, raw: Option<&str>) -> OrderResult<NaiveDate> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| OrderError::Validation(format!("{name} is required")))?;

    NaiveDate::parse_from_str(raw, DateRange::DATE_FORMAT).map_err(|_| {
        OrderError::Validation(format!("{name} must be a date in YYYY-MM-DD format, got '{raw}'"))
    })
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// `price * quantity`, exact in decimal arithmetic.
pub fn order_total(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

impl Order {
    pub fn new(id: String, input: CreateOrder, total: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: input.user_id,
            product_id: input.product_id,
            quantity: input.quantity,
            status: input.status,
            total,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateOrder, total: Decimal) {
        self.user_id = update.user_id;
        self.product_id = update.product_id;
        self.quantity = update.quantity;
        if let Some(status) = update.status {
            self.status = status;
        }
        self.total = total;
        self.updated_at = Utc::now();
    }
}
