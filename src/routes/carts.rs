use std::collections::HashMap;

use anyhow::{Context, Result};
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, QueryResult, SelectableHelper};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    aliases::DieselError,
    error::AppError,
    models::{CartEntity, CartItemEntity, CreateCartEntity, CreateCartItemEntity},
    schema::{cart_items, carts, recipes},
    state::AppState,
};

/// Defines the cart routes with OpenAPI specs. Carts are the explicit,
/// per-session entity for "how many units does this shopper want", decoupled
/// from the catalogue's stock field.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/api/carts",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(create_cart))
            .routes(utoipa_axum::routes!(get_cart))
            .routes(utoipa_axum::routes!(update_cart))
            .routes(utoipa_axum::routes!(delete_cart)),
    )
}

/// Unit prices for the given recipe ids, keyed by id.
async fn recipe_unit_prices(
    conn: &mut AsyncPgConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, f64>> {
    let prices: Vec<(i32, f64)> = recipes::table
        .filter(recipes::id.eq_any(&ids))
        .select((recipes::id, recipes::price))
        .get_results(conn)
        .await
        .context("Failed to get recipe prices")?;

    Ok(prices.into_iter().collect())
}

fn items_total(items: &[CartItemEntity], unit_prices: &HashMap<i32, f64>) -> f64 {
    items
        .iter()
        .map(|item| {
            let unit_price = unit_prices.get(&item.recipe_id).copied().unwrap_or(0.0);
            item.quantity as f64 * unit_price
        })
        .sum()
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateCartReq {
    pub customer_id: Option<i32>,
    pub items: Vec<CartItemReq>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CartItemReq {
    pub recipe_id: i32,
    pub quantity: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateCartRes {
    pub cart: CartEntity,
    pub cart_items: Vec<CartItemEntity>,
}

/// Create a new cart with its items in one transaction.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Carts"],
    request_body = CreateCartReq,
    responses(
        (status = 200, description = "Created cart successfully", body = CreateCartRes)
    )
)]
async fn create_cart(
    State(state): State<AppState>,
    Json(body): Json<CreateCartReq>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let (cart, cart_items) = conn
        .transaction(move |tx| {
            Box::pin(async move {
                let cart: CartEntity = diesel::insert_into(carts::table)
                    .values(CreateCartEntity {
                        customer_id: body.customer_id,
                    })
                    .returning(CartEntity::as_returning())
                    .get_result(tx)
                    .await
                    .context("Failed to create cart")?;

                let cart_items: Vec<CreateCartItemEntity> = body
                    .items
                    .into_iter()
                    .filter(|item| item.quantity > 0)
                    .map(|item| CreateCartItemEntity {
                        cart_id: cart.id,
                        recipe_id: item.recipe_id,
                        quantity: item.quantity,
                    })
                    .collect();

                let cart_items = diesel::insert_into(cart_items::table)
                    .values(cart_items)
                    .returning(CartItemEntity::as_returning())
                    .get_results(tx)
                    .await
                    .context("Failed to create cart items")?;

                Ok::<(CartEntity, Vec<CartItemEntity>), anyhow::Error>((cart, cart_items))
            })
        })
        .await
        .context("Transaction failed")?;

    Ok(Json(CreateCartRes { cart, cart_items }))
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct GetCartRes {
    pub cart: CartEntity,
    pub cart_items: Vec<CartItemEntity>,
    pub total_price: f64,
}

/// Fetch a cart with its items and the total priced from the catalogue.
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Carts"],
    params(
        ("id" = i32, Path, description = "Cart ID to fetch")
    ),
    responses(
        (status = 200, description = "Get cart successfully", body = GetCartRes),
        (status = 404, description = "Cart not found")
    )
)]
async fn get_cart(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let cart: QueryResult<CartEntity> = carts::table.find(id).get_result(conn).await;

    let cart = match cart {
        Ok(cart) => cart,
        Err(DieselError::NotFound) => return Err(AppError::NotFound("Cart not found")),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    let cart_items: Vec<CartItemEntity> = cart_items::table
        .filter(cart_items::cart_id.eq(cart.id))
        .get_results(conn)
        .await
        .context("Failed to get cart items")?;

    let ids = cart_items.iter().map(|item| item.recipe_id).collect();
    let unit_prices = recipe_unit_prices(conn, ids).await?;
    let total_price = items_total(&cart_items, &unit_prices);

    Ok(Json(GetCartRes {
        cart,
        cart_items,
        total_price,
    }))
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateCartReq {
    pub items: Vec<CartItemReq>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateCartRes {
    pub deleted_items: Vec<CartItemEntity>,
    pub updated_items: Vec<CartItemEntity>,
    pub updated_cart: CartEntity,
}

/// Reconcile a cart against a new item list: items missing from the request
/// are deleted, the rest are upserted, all in one transaction.
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Carts"],
    params(
        ("id" = i32, Path, description = "Cart ID to update")
    ),
    request_body = UpdateCartReq,
    responses(
        (status = 200, description = "Updated cart successfully", body = UpdateCartRes),
        (status = 404, description = "Cart not found")
    )
)]
async fn update_cart(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    Json(body): Json<UpdateCartReq>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let result = conn
        .transaction(move |conn| {
            Box::pin(async move {
                let cart: i64 = carts::table
                    .find(id)
                    .count()
                    .get_result(conn)
                    .await
                    .context("Failed to get count")?;

                if cart == 0 {
                    return Err(AppError::NotFound("Cart not found"));
                }

                let new_recipe_ids: Vec<i32> =
                    body.items.iter().map(|item| item.recipe_id).collect();

                let deleted_items: Vec<CartItemEntity> = diesel::delete(
                    cart_items::table
                        .filter(cart_items::cart_id.eq(id))
                        .filter(cart_items::recipe_id.ne_all(&new_recipe_ids)),
                )
                .returning(CartItemEntity::as_returning())
                .get_results(conn)
                .await
                .context("Failed to delete cart items")?;

                for item in &body.items {
                    diesel::insert_into(cart_items::table)
                        .values((
                            cart_items::cart_id.eq(id),
                            cart_items::recipe_id.eq(item.recipe_id),
                            cart_items::quantity.eq(item.quantity),
                        ))
                        .on_conflict((cart_items::cart_id, cart_items::recipe_id))
                        .do_update()
                        .set(cart_items::quantity.eq(item.quantity))
                        .execute(conn)
                        .await
                        .context("Failed to upsert cart item")?;
                }

                let updated_cart = diesel::update(carts::table.find(id))
                    .set(carts::updated_at.eq(diesel::dsl::now))
                    .returning(CartEntity::as_returning())
                    .get_result(conn)
                    .await
                    .context("Failed to update cart timestamp")?;

                let updated_items: Vec<CartItemEntity> = cart_items::table
                    .filter(cart_items::cart_id.eq(id))
                    .get_results(conn)
                    .await
                    .context("Failed to get updated items")?;

                Ok::<(Vec<CartItemEntity>, Vec<CartItemEntity>, CartEntity), AppError>((
                    deleted_items,
                    updated_items,
                    updated_cart,
                ))
            })
        })
        .await;

    match result {
        Ok((deleted_items, updated_items, updated_cart)) => Ok(Json(UpdateCartRes {
            deleted_items,
            updated_items,
            updated_cart,
        })),
        Err(err) => Err(err),
    }
}

/// Delete a cart by id; its items go with it.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Carts"],
    params(
        ("id" = i32, Path, description = "Cart ID to delete")
    ),
    responses(
        (status = 200, description = "Deleted cart successfully", body = CartEntity),
        (status = 404, description = "Cart not found")
    )
)]
async fn delete_cart(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let cart: QueryResult<CartEntity> = diesel::delete(carts::table.find(id))
        .returning(CartEntity::as_returning())
        .get_result(conn)
        .await;

    match cart {
        Ok(cart) => Ok(Json(cart)),
        Err(DieselError::NotFound) => Err(AppError::NotFound("Cart not found")),
        Err(err) => Err(AppError::Other(err.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_are_priced_per_unit() {
        let items = vec![
            CartItemEntity {
                cart_id: 1,
                recipe_id: 1,
                quantity: 2,
            },
            CartItemEntity {
                cart_id: 1,
                recipe_id: 2,
                quantity: 1,
            },
        ];
        let unit_prices = HashMap::from([(1, 12.5), (2, 4.0)]);

        assert_eq!(items_total(&items, &unit_prices), 29.0);
    }

    #[test]
    fn unknown_recipes_price_as_zero() {
        let items = vec![CartItemEntity {
            cart_id: 1,
            recipe_id: 9,
            quantity: 3,
        }];

        assert_eq!(items_total(&items, &HashMap::new()), 0.0);
    }
}
