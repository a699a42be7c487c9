//! MongoDB implementation of OrderRepository

use async_trait::async_trait;
use database::mongodb::{from_bson_datetime, parse_object_id, to_bson_datetime};
use database::{Pagination, SortDirection};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{instrument, Span};

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, DateRange, Order, OrderAggregate, UpdateOrder};
use crate::repository::OrderRepository;

pub const ORDERS_COLLECTION: &str = "orders";
pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: ObjectId,
    product_id: ObjectId,
    quantity: i32,
    status: String,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<OrderDocument> for Order {
    fn from(doc: OrderDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: doc.user_id.to_hex(),
            product_id: doc.product_id.to_hex(),
            quantity: doc.quantity,
            status: doc.status,
            total: doc.total,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// MongoDB implementation of the OrderRepository
pub struct MongoOrderRepository {
    collection: Collection<OrderDocument>,
    users_collection: String,
    span: Span,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collections(db, ORDERS_COLLECTION, USERS_COLLECTION)
    }

    pub fn with_collections(db: &Database, orders: &str, users: &str) -> Self {
        Self {
            collection: db.collection(orders),
            users_collection: users.to_string(),
            span: tracing::info_span!("order_repository", collection = orders),
        }
    }

    /// Parent span for every repository operation.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn init_indexes(&self) -> OrderResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "createdAt": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "userId": 1, "createdAt": -1 })
                .options(IndexOptions::builder().name("idx_user".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "productId": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_product".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Order indexes created successfully");
        Ok(())
    }

    async fn aggregate_orders(&self, pipeline: Vec<Document>) -> OrderResult<Vec<Order>> {
        let cursor = self.collection.aggregate(pipeline).await?;
        let documents: Vec<OrderDocument> =
            cursor.with_type::<OrderDocument>().try_collect().await?;
        Ok(documents.into_iter().map(Order::from).collect())
    }

    fn created_at_match(range: &DateRange) -> Document {
        doc! {
            "$match": {
                "createdAt": {
                    "$gte": to_bson_datetime(range.start),
                    "$lte": to_bson_datetime(range.end),
                }
            }
        }
    }

    fn page_options(page: Pagination) -> FindOptions {
        FindOptions::builder()
            .skip(page.skip())
            .limit(page.limit())
            .sort(doc! { "_id": 1 })
            .build()
    }

    fn page_stages(page: Pagination) -> [Document; 2] {
        let skip = i64::try_from(page.skip()).unwrap_or(i64::MAX);
        [doc! { "$skip": skip }, doc! { "$limit": page.limit() }]
    }

    fn date_range_pipeline(
        range: &DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> Vec<Document> {
        let mut pipeline = vec![
            Self::created_at_match(range),
            doc! { "$sort": { "createdAt": direction.as_i32(), "_id": direction.as_i32() } },
        ];
        pipeline.extend(Self::page_stages(page));
        pipeline
    }

    /// Buckets by calendar month of `createdAt`; pagination is applied to the
    /// buckets, after sorting.
    fn aggregates_pipeline(
        range: &DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> Vec<Document> {
        let mut pipeline = vec![
            Self::created_at_match(range),
            doc! {
                "$group": {
                    "_id": {
                        "year": { "$year": "$createdAt" },
                        "month": { "$month": "$createdAt" },
                    },
                    "totalOrders": { "$sum": 1 },
                    "totalRevenue": { "$sum": "$total" },
                }
            },
            doc! {
                "$sort": {
                    "_id.year": direction.as_i32(),
                    "_id.month": direction.as_i32(),
                }
            },
        ];
        pipeline.extend(Self::page_stages(page));
        pipeline.push(doc! {
            "$project": {
                "_id": 0,
                "year": "$_id.year",
                "month": "$_id.month",
                "totalOrders": 1,
                "totalRevenue": 1,
            }
        });
        pipeline
    }

    /// Orders whose `userId` resolves to a document in `users`.
    fn customer_pipeline(customer: ObjectId, users_collection: &str) -> Vec<Document> {
        vec![
            doc! { "$match": { "userId": customer } },
            doc! {
                "$lookup": {
                    "from": users_collection,
                    "localField": "userId",
                    "foreignField": "_id",
                    "as": "customer",
                }
            },
            doc! { "$match": { "customer": { "$ne": [] } } },
            doc! { "$project": { "customer": 0 } },
            doc! { "$sort": { "createdAt": -1, "_id": -1 } },
        ]
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// `$sum` over stored doubles drifts; report revenue in whole cents.
fn round_revenue(mut bucket: OrderAggregate) -> OrderAggregate {
    bucket.total_revenue = bucket.total_revenue.round_dp(2);
    bucket
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(parent = &self.span, skip(self, input), fields(product_id = %input.product_id, total = %total))]
    async fn create(&self, input: CreateOrder, total: Decimal) -> OrderResult<Order> {
        let now = to_bson_datetime(chrono::Utc::now());
        let document = OrderDocument {
            id: Some(ObjectId::new()),
            user_id: parse_object_id(&input.user_id)?,
            product_id: parse_object_id(&input.product_id)?,
            quantity: input.quantity,
            status: input.status,
            total,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&document).await?;

        let order = Order::from(document);
        tracing::info!(order_id = %order.id, "Order created successfully");
        Ok(order)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn get_by_id(&self, id: &str) -> OrderResult<Option<Order>> {
        let oid = parse_object_id(id)?;
        let order = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(order.map(Order::from))
    }

    #[instrument(parent = &self.span, skip(self, input), fields(total = %total))]
    async fn update(&self, id: &str, input: UpdateOrder, total: Decimal) -> OrderResult<Order> {
        let oid = parse_object_id(id)?;
        let mut set = doc! {
            "userId": parse_object_id(&input.user_id)?,
            "productId": parse_object_id(&input.product_id)?,
            "quantity": input.quantity,
            "total": decimal_to_f64(total),
            "updatedAt": to_bson_datetime(chrono::Utc::now()),
        };
        if let Some(status) = input.status {
            set.insert("status", status);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .with_options(options)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;

        tracing::info!(order_id = %id, "Order updated successfully");
        Ok(Order::from(updated))
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn delete(&self, id: &str) -> OrderResult<()> {
        let oid = parse_object_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;

        if result.deleted_count == 0 {
            tracing::warn!(order_id = %id, "No order found to delete");
            return Err(OrderError::NotFound(id.to_string()));
        }

        tracing::info!(order_id = %id, "Order deleted successfully");
        Ok(())
    }

    #[instrument(parent = &self.span, skip(self), fields(page = page.page(), page_size = page.page_size()))]
    async fn list(&self, page: Pagination) -> OrderResult<Vec<Order>> {
        let cursor = self
            .collection
            .find(doc! {})
            .with_options(Self::page_options(page))
            .await?;
        let documents: Vec<OrderDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Order::from).collect())
    }

    #[instrument(parent = &self.span, skip(self), fields(start = %range.start, end = %range.end))]
    async fn list_by_date_range(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<Order>> {
        let orders = self
            .aggregate_orders(Self::date_range_pipeline(&range, direction, page))
            .await?;
        tracing::debug!(count = orders.len(), "Fetched orders by date range");
        Ok(orders)
    }

    #[instrument(parent = &self.span, skip(self), fields(start = %range.start, end = %range.end))]
    async fn list_aggregates(
        &self,
        range: DateRange,
        direction: SortDirection,
        page: Pagination,
    ) -> OrderResult<Vec<OrderAggregate>> {
        let pipeline = Self::aggregates_pipeline(&range, direction, page);
        let cursor = self.collection.aggregate(pipeline).await?;
        let buckets: Vec<OrderAggregate> =
            cursor.with_type::<OrderAggregate>().try_collect().await?;
        Ok(buckets.into_iter().map(round_revenue).collect())
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn list_by_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>> {
        let customer = parse_object_id(customer_id)?;
        let orders = self
            .aggregate_orders(Self::customer_pipeline(customer, &self.users_collection))
            .await?;

        if orders.is_empty() {
            tracing::warn!(customer_id, "No orders found for customer");
            return Err(OrderError::NoCustomerOrders(customer_id.to_string()));
        }
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn january() -> DateRange {
        DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap()
    }

    fn stage_names(pipeline: &[Document]) -> Vec<&str> {
        pipeline
            .iter()
            .map(|stage| stage.keys().next().unwrap().as_str())
            .collect()
    }

    #[test]
    fn test_date_range_pipeline() {
        let page = Pagination::new(2, 10).unwrap();
        let pipeline =
            MongoOrderRepository::date_range_pipeline(&january(), SortDirection::Descending, page);

        assert_eq!(stage_names(&pipeline), ["$match", "$sort", "$skip", "$limit"]);
        assert_eq!(
            pipeline[1],
            doc! { "$sort": { "createdAt": -1, "_id": -1 } }
        );
        assert_eq!(pipeline[2], doc! { "$skip": 10_i64 });
        assert_eq!(pipeline[3], doc! { "$limit": 10_i64 });

        let created_at = pipeline[0]
            .get_document("$match")
            .unwrap()
            .get_document("createdAt")
            .unwrap();
        assert_eq!(
            created_at.get_datetime("$gte").unwrap(),
            &to_bson_datetime(january().start)
        );
        assert_eq!(
            created_at.get_datetime("$lte").unwrap(),
            &to_bson_datetime(january().end)
        );
    }

    #[test]
    fn test_aggregates_pipeline_paginates_buckets() {
        let pipeline = MongoOrderRepository::aggregates_pipeline(
            &january(),
            SortDirection::Ascending,
            Pagination::default(),
        );

        assert_eq!(
            stage_names(&pipeline),
            ["$match", "$group", "$sort", "$skip", "$limit", "$project"]
        );
        assert_eq!(
            pipeline[2],
            doc! { "$sort": { "_id.year": 1, "_id.month": 1 } }
        );
        let group = pipeline[1].get_document("$group").unwrap();
        assert_eq!(
            group.get_document("totalOrders").unwrap(),
            &doc! { "$sum": 1 }
        );
    }

    #[test]
    fn test_customer_pipeline_requires_join() {
        let customer = ObjectId::new();
        let pipeline = MongoOrderRepository::customer_pipeline(customer, "users");

        assert_eq!(
            stage_names(&pipeline),
            ["$match", "$lookup", "$match", "$project", "$sort"]
        );
        assert_eq!(pipeline[0], doc! { "$match": { "userId": customer } });
        assert_eq!(
            pipeline[2],
            doc! { "$match": { "customer": { "$ne": [] } } }
        );
        assert_eq!(pipeline[4], doc! { "$sort": { "createdAt": -1, "_id": -1 } });
    }

    #[test]
    fn test_list_options_encode_for_huge_page() {
        let page = Pagination::new(1_000_000_000_000_000_000, 10).unwrap();
        let options = MongoOrderRepository::page_options(page);
        let encoded = bson::to_document(&options).unwrap();
        assert_eq!(encoded.get_i64("skip").unwrap(), i64::MAX);
    }

    #[test]
    fn test_bucket_revenue_is_rounded_to_cents() {
        let bucket = OrderAggregate {
            year: 2024,
            month: 1,
            total_orders: 2,
            total_revenue: Decimal::from_f64_retain(0.1 + 0.2).unwrap(),
        };
        let rounded = round_revenue(bucket);
        assert_eq!(rounded.total_revenue, Decimal::new(30, 2));
        assert_eq!(rounded.total_revenue.to_string(), "0.30");
    }
}
