//! HTTP handlers for Orders API

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
use domain_products::ProductRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{
    CreateOrder, DateRange, DateRangeQuery, Order, OrderAggregate, UpdateOrder,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

type SharedService<O, P> = Arc<OrderService<O, P>>;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_orders,
        create_order,
        get_order,
        update_order,
        delete_order,
        list_by_date_range,
        list_aggregates,
        list_by_customer,
    ),
    components(
        schemas(Order, CreateOrder, UpdateOrder, OrderAggregate),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdentifierResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Orders", description = "Order endpoints and reporting queries")
    )
)]
pub struct ApiDoc;

/// Create the orders router; nest it under `/orders`.
pub fn router<O, P>(service: OrderService<O, P>) -> Router
where
    O: OrderRepository + 'static,
    P: ProductRepository + 'static,
{
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/range", get(list_by_date_range))
        .route("/aggregates", get(list_aggregates))
        .route("/customer/{customer_id}", get(list_by_customer))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .with_state(Arc::new(service))
}

/// List orders
#[utoipa::path(
    get,
    path = "",
    tag = "Orders",
    params(
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("page_size" = Option<u64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Page of orders", body = Vec<Order>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    PageQuery(page): PageQuery,
) -> OrderResult<Json<Vec<Order>>> {
    Ok(Json(service.list_orders(page).await?))
}

/// Place an order; the total is the product's current price times quantity
#[utoipa::path(
    post,
    path = "",
    tag = "Orders",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    Path(id): Path<String>,
) -> OrderResult<Json<Order>> {
    Ok(Json(service.get_order(&id).await?))
}

/// Replace an order and re-price it
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> OrderResult<Json<Order>> {
    Ok(Json(service.update_order(&id, input).await?))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    Path(id): Path<String>,
) -> OrderResult<impl IntoResponse> {
    service.delete_order(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Orders created between two dates (inclusive), sorted by creation time.
///
/// No match is an empty list.
#[utoipa::path(
    get,
    path = "/range",
    tag = "Orders",
    params(
        DateRangeQuery,
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("page_size" = Option<u64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Orders in range", body = Vec<Order>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_date_range<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    PageQuery(page): PageQuery,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let direction = parse_sort_direction(query.order.as_deref())?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    let orders = service.list_by_date_range(range, direction, page).await?;
    Ok(Json(orders))
}

/// Monthly order counts and revenue; pagination applies to months
#[utoipa::path(
    get,
    path = "/aggregates",
    tag = "Orders",
    params(
        DateRangeQuery,
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("page_size" = Option<u64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Monthly buckets", body = Vec<OrderAggregate>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_aggregates<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    PageQuery(page): PageQuery,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<OrderAggregate>>, AppError> {
    let direction = parse_sort_direction(query.order.as_deref())?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    let buckets = service.list_aggregates(range, direction, page).await?;
    Ok(Json(buckets))
}

/// Orders of a registered customer, newest first
#[utoipa::path(
    get,
    path = "/customer/{customer_id}",
    tag = "Orders",
    params(("customer_id" = String, Path, description = "Customer (user) ID")),
    responses(
        (status = 200, description = "Customer orders", body = Vec<Order>),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_customer<O: OrderRepository, P: ProductRepository>(
    State(service): State<SharedService<O, P>>,
    Path(customer_id): Path<String>,
) -> OrderResult<Json<Vec<Order>>> {
    Ok(Json(service.list_by_customer(&customer_id).await?))
}
