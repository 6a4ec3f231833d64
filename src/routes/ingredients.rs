use anyhow::{Context, Result};
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    error::AppError,
    models::{CreateIngredientEntity, IngredientEntity, UpdateIngredientEntity},
    schema::ingredients,
    state::AppState,
};

/// Defines all standalone ingredient routes with OpenAPI specs.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/api/ingredients",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_ingredients))
            .routes(utoipa_axum::routes!(create_ingredient))
            .routes(utoipa_axum::routes!(update_ingredient))
            .routes(utoipa_axum::routes!(delete_ingredient)),
    )
}

#[derive(Deserialize, ToSchema)]
struct CreateIngredientReq {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Create a standalone ingredient. Rows created here carry no parent recipe.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Ingredients"],
    request_body = CreateIngredientReq,
    responses(
        (status = 200, description = "Created ingredient successfully", body = IngredientEntity)
    )
)]
async fn create_ingredient(
    State(state): State<AppState>,
    Json(body): Json<CreateIngredientReq>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let ingredient: IngredientEntity = diesel::insert_into(ingredients::table)
        .values(CreateIngredientEntity {
            recipe_id: None,
            name: body.name,
            quantity: body.quantity,
            unit: body.unit,
        })
        .returning(IngredientEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to create ingredient")?;

    Ok(Json(ingredient))
}

/// Fetch all ingredients in the system.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Ingredients"],
    responses(
        (status = 200, description = "List all ingredients", body = Vec<IngredientEntity>)
    )
)]
async fn get_ingredients(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let ingredients: Vec<IngredientEntity> = ingredients::table
        .get_results(conn)
        .await
        .context("Failed to get ingredients")?;

    Ok(Json(ingredients))
}

#[derive(Deserialize, ToSchema)]
struct UpdateIngredientReq {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

/// Update an ingredient's scalar fields. Failures, absent ids included,
/// collapse to the generic 500.
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Ingredients"],
    params(
        ("id" = i32, Path, description = "Ingredient ID to update")
    ),
    request_body = UpdateIngredientReq,
    responses(
        (status = 200, description = "Updated ingredient successfully", body = IngredientEntity)
    )
)]
async fn update_ingredient(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    Json(body): Json<UpdateIngredientReq>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let changes = UpdateIngredientEntity {
        name: body.name,
        quantity: body.quantity,
        unit: body.unit,
    };

    let ingredient: IngredientEntity = if changes.has_changes() {
        diesel::update(ingredients::table.find(id))
            .set(changes)
            .returning(IngredientEntity::as_returning())
            .get_result(conn)
            .await
            .context("Failed to update ingredient")?
    } else {
        ingredients::table
            .find(id)
            .get_result(conn)
            .await
            .context("Failed to get ingredient")?
    };

    Ok(Json(ingredient))
}

/// Delete an ingredient by id.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Ingredients"],
    params(
        ("id" = i32, Path, description = "Ingredient ID to delete")
    ),
    responses(
        (status = 200, description = "Deleted ingredient successfully", body = IngredientEntity)
    )
)]
async fn delete_ingredient(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let deleted: IngredientEntity = diesel::delete(ingredients::table.find(id))
        .returning(IngredientEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to delete ingredient")?;

    Ok(Json(deleted))
}
