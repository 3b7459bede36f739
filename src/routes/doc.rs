use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartView},
        orders::{
            CancelItemsRequest, CreateOrderRequest, ItemsCancelled, OrderCancelled,
            OrderSearchResult, OrderWithItems, SearchOutcome, SearchRequest,
        },
        products::{CreateProductRequest, ProductList},
    },
    error::FieldError,
    models::{CartEntry, ItemRef, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, params, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        products::list_products,
        products::get_product,
        products::create_product,
        orders::create_order,
        orders::search_form,
        orders::search_orders,
        orders::cancel_items,
        orders::cancel_order
    ),
    components(
        schemas(
            Product,
            CartEntry,
            Order,
            OrderItem,
            ItemRef,
            FieldError,
            AddToCartRequest,
            CartView,
            CreateProductRequest,
            ProductList,
            CreateOrderRequest,
            SearchRequest,
            CancelItemsRequest,
            OrderWithItems,
            OrderSearchResult,
            ItemsCancelled,
            OrderCancelled,
            SearchOutcome,
            params::Pagination,
            params::ProductQuery,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<OrderWithItems>,
            ApiResponse<SearchOutcome>,
            ApiResponse<ItemsCancelled>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order placement, lookup and cancellation"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
