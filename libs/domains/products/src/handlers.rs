//! HTTP handlers for Products API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestIdentifierResponse, BadRequestQueryResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    parse_sort_direction, AppError, PageQuery, ValidatedJson,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, NameQuery, PriceQuery, PriceRangeQuery, Product, ProductSales,
    TopSellingQuery, UpdateProduct, DEFAULT_TOP_SELLING_LIMIT,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        search_by_name,
        search_by_price,
        search_by_price_range,
        top_selling,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ProductSales),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdentifierResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router; nest it under `/products`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_by_name))
        .route("/search/price", get(search_by_price))
        .route("/search/price-range", get(search_by_price_range))
        .route("/top-selling", get(top_selling))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("page_size" = Option<u64>, Query, description = "Page size (default 10); `limit` is accepted as an alias")
    ),
    responses(
        (status = 200, description = "Page of products", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    PageQuery(page): PageQuery,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products(page).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(&id).await?;
    Ok(Json(product))
}

/// Replace a product's name, description, price and stock
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(&id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search products by name (case-insensitive substring)
#[utoipa::path(
    get,
    path = "/search",
    tag = "Products",
    params(
        NameQuery,
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("page_size" = Option<u64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_by_name<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    PageQuery(page): PageQuery,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let name = query
        .name
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;
    let products = service.search_by_name(&name, page).await?;
    Ok(Json(products))
}

/// Products with exactly the given price, newest first
#[utoipa::path(
    get,
    path = "/search/price",
    tag = "Products",
    params(
        PriceQuery,
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("page_size" = Option<u64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_by_price<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    PageQuery(page): PageQuery,
    Query(query): Query<PriceQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let price = required_price("price", query.price.as_deref())?;
    let products = service.find_by_price(price, page).await?;
    Ok(Json(products))
}

/// Products within an inclusive price range, ordered by price
#[utoipa::path(
    get,
    path = "/search/price-range",
    tag = "Products",
    params(
        PriceRangeQuery,
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("page_size" = Option<u64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_by_price_range<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    PageQuery(page): PageQuery,
    Query(query): Query<PriceRangeQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let direction = parse_sort_direction(query.order.as_deref())?;
    let min_price = required_price("min_price", query.min_price.as_deref())?;
    let max_price = required_price("max_price", query.max_price.as_deref())?;

    let products = service
        .find_by_price_range(min_price, max_price, direction, page)
        .await?;
    Ok(Json(products))
}

/// Best-selling products by units ordered
#[utoipa::path(
    get,
    path = "/top-selling",
    tag = "Products",
    params(TopSellingQuery),
    responses(
        (status = 200, description = "Products ranked by units sold", body = Vec<ProductSales>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn top_selling<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<TopSellingQuery>,
) -> Result<Json<Vec<ProductSales>>, AppError> {
    let limit = match query.limit.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TOP_SELLING_LIMIT,
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AppError::BadRequest(format!("limit must be a positive integer, got '{raw}'"))
            })?,
    };
    let sales = service.top_selling(limit).await?;
    Ok(Json(sales))
}

fn required_price(name: &str, raw: Option<&str>) -> Result<Decimal, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))?;

    let value = Decimal::from_str(raw)
        .map_err(|_| AppError::BadRequest(format!("{name} must be a number, got '{raw}'")))?;
    if value < Decimal::ZERO {
        return Err(AppError::BadRequest(format!("{name} must not be negative")));
    }
    Ok(value)
}
