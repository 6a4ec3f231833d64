use anyhow::{Context, Result};
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, QueryResult, SelectableHelper};
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    aliases::DieselError,
    error::AppError,
    models::{
        CreateIngredientEntity, CreateRecipeEntity, IngredientEntity, RecipeEntity,
        UpdateRecipeEntity,
    },
    schema::{ingredients, recipes},
    state::AppState,
};

/// Defines all recipe catalogue routes with OpenAPI specs.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/api/recipes",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_recipes))
            .routes(utoipa_axum::routes!(create_recipe))
            .routes(utoipa_axum::routes!(get_recipe))
            .routes(utoipa_axum::routes!(update_recipe))
            .routes(utoipa_axum::routes!(delete_recipe)),
    )
}

/// A recipe together with its ingredient rows, the shape returned whenever
/// ingredients are included.
#[derive(Serialize, ToSchema)]
struct RecipeWithIngredients {
    #[serde(flatten)]
    recipe: RecipeEntity,
    ingredients: Vec<IngredientEntity>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateRecipeReq {
    pub name: String,
    pub description: String,
    pub cooking_instructions: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientReq>,
}

#[derive(Deserialize, ToSchema)]
struct RecipeIngredientReq {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Create a recipe together with its ingredient rows in one transaction.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Recipes"],
    request_body = CreateRecipeReq,
    responses(
        (status = 200, description = "Created recipe successfully", body = RecipeWithIngredients)
    )
)]
async fn create_recipe(
    State(state): State<AppState>,
    Json(body): Json<CreateRecipeReq>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let (recipe, ingredients) = conn
        .transaction(move |conn| {
            Box::pin(async move {
                let recipe: RecipeEntity = diesel::insert_into(recipes::table)
                    .values(CreateRecipeEntity {
                        name: body.name,
                        description: body.description,
                        cooking_instructions: body.cooking_instructions,
                        price: body.price,
                        quantity: body.quantity,
                    })
                    .returning(RecipeEntity::as_returning())
                    .get_result(conn)
                    .await
                    .context("Failed to create recipe")?;

                let rows: Vec<CreateIngredientEntity> = body
                    .ingredients
                    .into_iter()
                    .map(|item| CreateIngredientEntity {
                        recipe_id: Some(recipe.id),
                        name: item.name,
                        quantity: item.quantity,
                        unit: item.unit,
                    })
                    .collect();

                let ingredients = diesel::insert_into(ingredients::table)
                    .values(rows)
                    .returning(IngredientEntity::as_returning())
                    .get_results(conn)
                    .await
                    .context("Failed to create ingredients")?;

                Ok::<(RecipeEntity, Vec<IngredientEntity>), anyhow::Error>((recipe, ingredients))
            })
        })
        .await
        .context("Transaction failed")?;

    Ok(Json(RecipeWithIngredients {
        recipe,
        ingredients,
    }))
}

/// Fetch the whole catalogue. Ingredients are not nested here.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Recipes"],
    responses(
        (status = 200, description = "List all recipes", body = Vec<RecipeEntity>)
    )
)]
async fn get_recipes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let recipes: Vec<RecipeEntity> = recipes::table
        .get_results(conn)
        .await
        .context("Failed to get recipes")?;

    Ok(Json(recipes))
}

/// Fetch a specific recipe with its ingredients.
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Recipes"],
    params(
        ("id" = i32, Path, description = "Recipe ID to fetch")
    ),
    responses(
        (status = 200, description = "Get recipe successfully", body = RecipeWithIngredients),
        (status = 404, description = "Recipe not found")
    )
)]
async fn get_recipe(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let recipe: QueryResult<RecipeEntity> = recipes::table.find(id).get_result(conn).await;

    let recipe = match recipe {
        Ok(recipe) => recipe,
        Err(DieselError::NotFound) => return Err(AppError::NotFound("Recipe not found")),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    let ingredients: Vec<IngredientEntity> = ingredients::table
        .filter(ingredients::recipe_id.eq(recipe.id))
        .get_results(conn)
        .await
        .context("Failed to get ingredients")?;

    Ok(Json(RecipeWithIngredients {
        recipe,
        ingredients,
    }))
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateRecipeReq {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cooking_instructions: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub ingredients: Option<Vec<RecipeIngredientReq>>,
}

/// Update a recipe's scalar fields and, when an ingredients array is present,
/// replace the full ingredient set. Everything runs in one transaction so a
/// failed replacement never leaves the recipe without its ingredients.
///
/// A missing id surfaces as a 500 here, not a 404; only the GET endpoint
/// distinguishes not-found.
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Recipes"],
    params(
        ("id" = i32, Path, description = "Recipe ID to update")
    ),
    request_body = UpdateRecipeReq,
    responses(
        (status = 200, description = "Updated recipe successfully", body = RecipeWithIngredients)
    )
)]
async fn update_recipe(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    Json(body): Json<UpdateRecipeReq>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let (recipe, ingredients) = conn
        .transaction(move |conn| {
            Box::pin(async move {
                let changes = UpdateRecipeEntity {
                    name: body.name,
                    description: body.description,
                    cooking_instructions: body.cooking_instructions,
                    price: body.price,
                    quantity: body.quantity,
                };

                let recipe: RecipeEntity = if changes.has_changes() {
                    diesel::update(recipes::table.find(id))
                        .set(changes)
                        .returning(RecipeEntity::as_returning())
                        .get_result(conn)
                        .await
                        .context("Failed to update recipe")?
                } else {
                    recipes::table
                        .find(id)
                        .get_result(conn)
                        .await
                        .context("Failed to get recipe")?
                };

                if let Some(items) = body.ingredients {
                    diesel::delete(ingredients::table.filter(ingredients::recipe_id.eq(id)))
                        .execute(conn)
                        .await
                        .context("Failed to delete ingredients")?;

                    let rows: Vec<CreateIngredientEntity> = items
                        .into_iter()
                        .map(|item| CreateIngredientEntity {
                            recipe_id: Some(id),
                            name: item.name,
                            quantity: item.quantity,
                            unit: item.unit,
                        })
                        .collect();

                    diesel::insert_into(ingredients::table)
                        .values(rows)
                        .execute(conn)
                        .await
                        .context("Failed to recreate ingredients")?;
                }

                let ingredients: Vec<IngredientEntity> = ingredients::table
                    .filter(ingredients::recipe_id.eq(id))
                    .get_results(conn)
                    .await
                    .context("Failed to get ingredients")?;

                Ok::<(RecipeEntity, Vec<IngredientEntity>), anyhow::Error>((recipe, ingredients))
            })
        })
        .await
        .context("Transaction failed")?;

    Ok(Json(RecipeWithIngredients {
        recipe,
        ingredients,
    }))
}

/// Delete a recipe by id. An absent id is not distinguished and collapses to
/// the generic 500.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Recipes"],
    params(
        ("id" = i32, Path, description = "Recipe ID to delete")
    ),
    responses(
        (status = 200, description = "Deleted recipe successfully", body = RecipeEntity)
    )
)]
async fn delete_recipe(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let deleted: RecipeEntity = diesel::delete(recipes::table.find(id))
        .returning(RecipeEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to delete recipe")?;

    Ok(Json(deleted))
}
