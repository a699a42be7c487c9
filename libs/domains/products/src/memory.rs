//! In-memory ProductRepository for development and handler tests.

use async_trait::async_trait;
use database::mongodb::parse_object_id;
use database::{Pagination, SortDirection};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductSales, UpdateProduct};
use crate::repository::ProductRepository;

/// Ids are generated and validated exactly like the MongoDB store, so
/// malformed-id handling can be exercised without a database.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
    sales: Arc<RwLock<HashMap<String, (i64, Decimal)>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records units sold for [`ProductRepository::top_selling`].
    pub async fn record_sale(&self, product_id: &str, quantity: i64, revenue: Decimal) {
        let mut sales = self.sales.write().await;
        let entry = sales
            .entry(product_id.to_string())
            .or_insert((0, Decimal::ZERO));
        entry.0 += quantity;
        entry.1 += revenue;
    }

    async fn filtered<F>(&self, page: Pagination, keep: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool,
    {
        let products = self.products.read().await;
        let matched: Vec<Product> = products.iter().filter(|p| keep(p)).cloned().collect();
        page.slice(&matched).to_vec()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(ObjectId::new().to_hex(), input);
        self.products.write().await.push(product.clone());
        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        parse_object_id(id)?;
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        parse_object_id(id)?;
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;
        product.apply_update(input);
        Ok(product.clone())
    }

    async fn delete(&self, id: &str) -> ProductResult<()> {
        parse_object_id(id)?;
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(ProductError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, page: Pagination) -> ProductResult<Vec<Product>> {
        Ok(self.filtered(page, |_| true).await)
    }

    async fn search_by_name(&self, name: &str, page: Pagination) -> ProductResult<Vec<Product>> {
        let needle = name.to_lowercase();
        Ok(self
            .filtered(page, |p| p.name.to_lowercase().contains(&needle))
            .await)
    }

    async fn find_by_price(&self, price: Decimal, page: Pagination) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| p.price == price)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(&matched).to_vec())
    }

    async fn find_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
        direction: SortDirection,
        page: Pagination,
    ) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| p.price >= min_price && p.price <= max_price)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.price.cmp(&b.price));
        if direction.is_descending() {
            matched.reverse();
        }
        Ok(page.slice(&matched).to_vec())
    }

    async fn top_selling(&self, limit: u64) -> ProductResult<Vec<ProductSales>> {
        let products = self.products.read().await;
        let sales = self.sales.read().await;

        let mut ranked: Vec<ProductSales> = sales
            .iter()
            .filter_map(|(id, (quantity, revenue))| {
                products.iter().find(|p| &p.id == id).map(|p| ProductSales {
                    product_id: id.clone(),
                    name: p.name.clone(),
                    total_quantity: *quantity,
                    total_revenue: *revenue,
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.total_quantity
                .cmp(&a.total_quantity)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn input(name: &str, price: &str) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price: Decimal::from_str(price).unwrap(),
            stock: 10,
        }
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid_not_missing() {
        let repo = InMemoryProductRepository::new();
        assert!(matches!(
            repo.get_by_id("nope").await,
            Err(ProductError::InvalidId(_))
        ));
        assert!(matches!(
            repo.delete(&ObjectId::new().to_hex()).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_price_range_sorted_both_ways() {
        let repo = InMemoryProductRepository::new();
        for (name, price) in [("a", "5"), ("b", "1"), ("c", "20"), ("d", "10")] {
            repo.create(input(name, price)).await.unwrap();
        }
        let page = Pagination::default();

        let asc = repo
            .find_by_price_range(Decimal::from(1), Decimal::from(10), SortDirection::Ascending, page)
            .await
            .unwrap();
        let names: Vec<&str> = asc.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "d"]);

        let desc = repo
            .find_by_price_range(Decimal::from(1), Decimal::from(10), SortDirection::Descending, page)
            .await
            .unwrap();
        let names: Vec<&str> = desc.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["d", "a", "b"]);

        let inverted = repo
            .find_by_price_range(Decimal::from(10), Decimal::from(1), SortDirection::Ascending, page)
            .await
            .unwrap();
        assert!(inverted.is_empty());
    }

    #[tokio::test]
    async fn test_top_selling_ranks_by_quantity() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(input("a", "1")).await.unwrap();
        let b = repo.create(input("b", "2")).await.unwrap();

        repo.record_sale(&a.id, 2, Decimal::from(2)).await;
        repo.record_sale(&b.id, 5, Decimal::from(10)).await;
        repo.record_sale(&a.id, 1, Decimal::from(1)).await;
        repo.record_sale(&ObjectId::new().to_hex(), 50, Decimal::ZERO).await;

        let top = repo.top_selling(10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "b");
        assert_eq!(top[1].total_quantity, 3);
        assert_eq!(top[1].total_revenue, Decimal::from(3));

        assert_eq!(repo.top_selling(1).await.unwrap().len(), 1);
    }
}
