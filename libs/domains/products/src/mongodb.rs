//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::{from_bson_datetime, parse_object_id, to_bson_datetime};
use database::{Pagination, SortDirection};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{instrument, Span};

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductSales, UpdateProduct};
use crate::repository::ProductRepository;

pub const PRODUCTS_COLLECTION: &str = "products";
/// Orders are read, never written, to rank top sellers.
pub const ORDERS_COLLECTION: &str = "orders";

/// Stored shape of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    stock: i32,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name,
            description: doc.description,
            price: doc.price,
            stock: doc.stock,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// Row produced by the top-selling pipeline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductSalesDocument {
    product_id: ObjectId,
    name: String,
    total_quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    total_revenue: Decimal,
}

impl From<ProductSalesDocument> for ProductSales {
    fn from(doc: ProductSalesDocument) -> Self {
        Self {
            product_id: doc.product_id.to_hex(),
            name: doc.name,
            total_quantity: doc.total_quantity,
            total_revenue: doc.total_revenue,
        }
    }
}

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
    orders: Collection<Document>,
    span: Span,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collections(db, PRODUCTS_COLLECTION, ORDERS_COLLECTION)
    }

    /// Uses custom collection names, e.g. for isolated test data.
    pub fn with_collections(db: &Database, products: &str, orders: &str) -> Self {
        Self {
            collection: db.collection(products),
            orders: db.collection(orders),
            span: tracing::info_span!("product_repository", collection = products),
        }
    }

    /// Parent span for every repository operation.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Creates the indexes backing name search, price filters and recency sort.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().name("idx_name".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(IndexOptions::builder().name("idx_price".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    async fn find_page(&self, filter: Document, options: FindOptions) -> ProductResult<Vec<Product>> {
        let cursor = self.collection.find(filter).with_options(options).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }

    fn page_options(page: Pagination, sort: Option<Document>) -> FindOptions {
        FindOptions::builder()
            .skip(page.skip())
            .limit(page.limit())
            .sort(sort)
            .build()
    }

    /// Case-insensitive match on the literal term.
    fn name_filter(name: &str) -> Document {
        doc! { "name": { "$regex": regex::escape(name), "$options": "i" } }
    }

    fn price_range_filter(min_price: Decimal, max_price: Decimal) -> Document {
        doc! { "price": { "$gte": decimal_to_bson(min_price), "$lte": decimal_to_bson(max_price) } }
    }

    /// Groups orders by product, ranks by units sold (ties by id) and joins the
    /// product name. Orders whose product no longer exists are dropped.
    fn top_selling_pipeline(products_collection: &str, limit: u64) -> Vec<Document> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        vec![
            doc! {
                "$group": {
                    "_id": "$productId",
                    "totalQuantity": { "$sum": "$quantity" },
                    "totalRevenue": { "$sum": "$total" },
                }
            },
            doc! { "$sort": { "totalQuantity": -1, "_id": 1 } },
            doc! {
                "$lookup": {
                    "from": products_collection,
                    "localField": "_id",
                    "foreignField": "_id",
                    "as": "product",
                }
            },
            doc! { "$unwind": "$product" },
            doc! { "$limit": limit },
            doc! {
                "$project": {
                    "_id": 0,
                    "productId": "$_id",
                    "name": "$product.name",
                    "totalQuantity": 1,
                    "totalRevenue": 1,
                }
            },
        ]
    }
}

/// Prices are stored as doubles; queries must compare against the same encoding.
fn decimal_to_bson(value: Decimal) -> Bson {
    Bson::Double(value.to_f64().unwrap_or_default())
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(parent = &self.span, skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let now = to_bson_datetime(chrono::Utc::now());
        let document = ProductDocument {
            id: Some(ObjectId::new()),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&document).await?;

        let product = Product::from(document);
        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let oid = parse_object_id(id)?;
        let product = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(product.map(Product::from))
    }

    #[instrument(parent = &self.span, skip(self, input))]
    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        let oid = parse_object_id(id)?;
        let update = doc! {
            "$set": {
                "name": input.name,
                "description": input.description,
                "price": decimal_to_bson(input.price),
                "stock": input.stock,
                "updatedAt": to_bson_datetime(chrono::Utc::now()),
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .with_options(options)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(Product::from(updated))
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn delete(&self, id: &str) -> ProductResult<()> {
        let oid = parse_object_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;

        if result.deleted_count == 0 {
            tracing::warn!(product_id = %id, "No product found to delete");
            return Err(ProductError::NotFound(id.to_string()));
        }

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(())
    }

    #[instrument(parent = &self.span, skip(self), fields(page = page.page(), page_size = page.page_size()))]
    async fn list(&self, page: Pagination) -> ProductResult<Vec<Product>> {
        let products = self.find_page(doc! {}, Self::page_options(page, None)).await?;
        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn search_by_name(&self, name: &str, page: Pagination) -> ProductResult<Vec<Product>> {
        self.find_page(Self::name_filter(name), Self::page_options(page, None))
            .await
    }

    #[instrument(parent = &self.span, skip(self), fields(price = %price))]
    async fn find_by_price(&self, price: Decimal, page: Pagination) -> ProductResult<Vec<Product>> {
        let filter = doc! { "price": decimal_to_bson(price) };
        let sort = doc! { "createdAt": -1 };
        self.find_page(filter, Self::page_options(page, Some(sort)))
            .await
    }

    #[instrument(parent = &self.span, skip(self), fields(min = %min_price, max = %max_price, order = %direction))]
    async fn find_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
        direction: SortDirection,
        page: Pagination,
    ) -> ProductResult<Vec<Product>> {
        let filter = Self::price_range_filter(min_price, max_price);
        let sort = doc! { "price": direction.as_i32() };
        self.find_page(filter, Self::page_options(page, Some(sort)))
            .await
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn top_selling(&self, limit: u64) -> ProductResult<Vec<ProductSales>> {
        let pipeline = Self::top_selling_pipeline(self.collection.name(), limit);
        let cursor = self.orders.aggregate(pipeline).await?;
        let rows: Vec<ProductSalesDocument> = cursor
            .with_type::<ProductSalesDocument>()
            .try_collect()
            .await?;
        Ok(rows.into_iter().map(ProductSales::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_name_filter_escapes_regex() {
        let filter = MongoProductRepository::name_filter("a.b+");
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"a\.b\+");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_price_range_filter_is_inclusive() {
        let filter = MongoProductRepository::price_range_filter(
            Decimal::from_str("1.5").unwrap(),
            Decimal::from(10),
        );
        let price = filter.get_document("price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 1.5);
        assert_eq!(price.get_f64("$lte").unwrap(), 10.0);
    }

    #[test]
    fn test_page_options() {
        let page = Pagination::new(3, 20).unwrap();
        let options = MongoProductRepository::page_options(page, Some(doc! { "price": -1 }));
        assert_eq!(options.skip, Some(40));
        assert_eq!(options.limit, Some(20));
        assert_eq!(options.sort, Some(doc! { "price": -1 }));
    }

    #[test]
    fn test_page_options_encode_for_huge_page() {
        let page = Pagination::new(1_000_000_000_000_000_000, 10).unwrap();
        let options = MongoProductRepository::page_options(page, None);
        let encoded = ::mongodb::bson::to_document(&options).unwrap();
        assert_eq!(encoded.get_i64("skip").unwrap(), i64::MAX);
    }

    #[test]
    fn test_top_selling_pipeline_shape() {
        let pipeline = MongoProductRepository::top_selling_pipeline("products", 5);
        let stages: Vec<&str> = pipeline
            .iter()
            .map(|stage| stage.keys().next().unwrap().as_str())
            .collect();
        assert_eq!(
            stages,
            ["$group", "$sort", "$lookup", "$unwind", "$limit", "$project"]
        );

        assert_eq!(
            pipeline[1],
            doc! { "$sort": { "totalQuantity": -1, "_id": 1 } }
        );
        assert_eq!(
            pipeline[2].get_document("$lookup").unwrap().get_str("from").unwrap(),
            "products"
        );
        assert_eq!(pipeline[4], doc! { "$limit": 5_i64 });
    }

    #[test]
    fn test_document_converts_to_product() {
        let id = ObjectId::new();
        let now = to_bson_datetime(chrono::Utc::now());
        let product = Product::from(ProductDocument {
            id: Some(id),
            name: "Widget".into(),
            description: String::new(),
            price: Decimal::from_str("9.99").unwrap(),
            stock: 100,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(product.id, id.to_hex());
        assert_eq!(product.created_at, from_bson_datetime(now));
    }
}
