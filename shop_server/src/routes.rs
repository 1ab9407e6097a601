//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will
//! cause the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation
//! (e.g. I/O, database operations, etc.) should be expressed as futures or asynchronous functions. Async
//! handlers get executed concurrently by worker threads and thus don't block execution.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use shop_engine::{
    db_types::OrderStatus,
    traits::{CartManagement, OrderManagement, ProductCatalog},
    CartApi,
    CatalogApi,
    OrderFlowApi,
};

use crate::{
    auth::OwnerId,
    data_objects::{AddItemRequest, JsonResponse, StatusQuery},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(product_by_id => Get "/products/{product_id}" impl ProductCatalog);
/// Resolves a product for display. This is the storefront's read-only window into the catalog; catalog
/// management itself lives upstream.
pub async fn product_by_id<B: ProductCatalog>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    trace!("💻️ GET product #{product_id}");
    let product = api.product(product_id).await?;
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(add_cart_item => Post "/cart/add" impl CartManagement);
/// Adds a product to the buyer's cart. Adding a product that is already in the cart increments its quantity.
/// Returns the full cart at live catalog prices.
pub async fn add_cart_item<B: CartManagement>(
    owner: OwnerId,
    body: web::Json<AddItemRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    trace!("💻️ POST cart/add for user #{}", owner.0);
    let cart = api.add_item(owner.0, params.product_id, params.quantity).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(update_cart_quantity => Put "/cart/{line_id}/quantity/{quantity}" impl CartManagement);
pub async fn update_cart_quantity<B: CartManagement>(
    owner: OwnerId,
    path: web::Path<(i64, i64)>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (line_id, quantity) = path.into_inner();
    trace!("💻️ PUT cart quantity for user #{}", owner.0);
    let cart = api.update_quantity(owner.0, line_id, quantity).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(remove_cart_item => Delete "/cart/{line_id}" impl CartManagement);
pub async fn remove_cart_item<B: CartManagement>(
    owner: OwnerId,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let line_id = path.into_inner();
    trace!("💻️ DELETE cart line #{line_id} for user #{}", owner.0);
    let cart = api.remove_item(owner.0, line_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(get_cart => Get "/cart" impl CartManagement);
pub async fn get_cart<B: CartManagement>(
    owner: OwnerId,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET cart for user #{}", owner.0);
    let cart = api.cart(owner.0).await?;
    Ok(HttpResponse::Ok().json(cart))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderManagement);
/// Converts the buyer's cart into a new `Draft` order. Prices are frozen at this point and the cart is
/// emptied.
pub async fn create_order<B: OrderManagement>(
    owner: OwnerId,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ POST orders for user #{}", owner.0);
    let order = api.create_order(owner.0).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(my_orders => Get "/orders" impl OrderManagement);
pub async fn my_orders<B: OrderManagement>(
    owner: OwnerId,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET orders for user #{}", owner.0);
    let orders = api.orders_for(owner.0).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement);
pub async fn order_by_id<B: OrderManagement>(
    owner: OwnerId,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ GET order #{order_id} for user #{}", owner.0);
    let order = api.order(owner.0, order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(delete_order => Delete "/orders/{order_id}" impl OrderManagement);
/// Deletes an order that has not been paid for yet. Orders that have left the `Draft`/`Pending` band are
/// immutable and cannot be deleted.
pub async fn delete_order<B: OrderManagement>(
    owner: OwnerId,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ DELETE order #{order_id} for user #{}", owner.0);
    api.delete_order(owner.0, order_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order #{order_id} deleted"))))
}

route!(update_order_status => Put "/orders/{order_id}/status" impl OrderManagement);
/// The buyer-facing status update, e.g. `PUT /orders/42/status?status=Cancelled`. Restricted to the
/// `Draft`/`Pending`/`Cancelled` targets; `Paid` is only ever set by the webhook.
pub async fn update_order_status<B: OrderManagement>(
    owner: OwnerId,
    path: web::Path<i64>,
    query: web::Query<StatusQuery>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let new_status: OrderStatus = query.into_inner().status;
    trace!("💻️ PUT order #{order_id} status to {new_status} for user #{}", owner.0);
    let order = api.update_status(owner.0, order_id, new_status).await?;
    Ok(HttpResponse::Ok().json(order))
}
