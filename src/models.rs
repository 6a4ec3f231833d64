use chrono::{DateTime, Utc};
use diesel::{
    Selectable,
    prelude::{AsChangeset, Identifiable, Insertable, Queryable},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Recipes

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct RecipeEntity {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub cooking_instructions: String,
    pub price: f64,
    pub quantity: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
pub struct CreateRecipeEntity {
    pub name: String,
    pub description: String,
    pub cooking_instructions: String,
    pub price: f64,
    pub quantity: i32,
}

/// Changeset for the recipe PUT. The browser cart sync sends `{"quantity"}`
/// alone, so every field has to be optional.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::recipes)]
pub struct UpdateRecipeEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cooking_instructions: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
}

impl UpdateRecipeEntity {
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.cooking_instructions.is_some()
            || self.price.is_some()
            || self.quantity.is_some()
    }
}

// Ingredients

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct IngredientEntity {
    pub id: i32,
    pub recipe_id: Option<i32>,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct CreateIngredientEntity {
    pub recipe_id: Option<i32>,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct UpdateIngredientEntity {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl UpdateIngredientEntity {
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.quantity.is_some() || self.unit.is_some()
    }
}

// Customers

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct CustomerEntity {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: String,
    pub mobile_number: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::customers)]
pub struct CreateCustomerEntity {
    pub name: String,
    pub email: String,
    pub address: String,
    pub mobile_number: String,
}

// Orders

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct OrderEntity {
    pub id: i32,
    pub customer_id: i32,
    pub recipe_id: i32,
    pub quantity: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::orders)]
pub struct CreateOrderEntity {
    pub customer_id: i32,
    pub recipe_id: i32,
    pub quantity: i32,
}

// Carts

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, ToSchema)]
#[diesel(table_name = crate::schema::carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct CartEntity {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, Debug, ToSchema)]
#[diesel(table_name = crate::schema::cart_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct CartItemEntity {
    pub cart_id: i32,
    pub recipe_id: i32,
    pub quantity: i32,
}

#[derive(Insertable, Deserialize, Debug)]
#[diesel(table_name = crate::schema::carts)]
pub struct CreateCartEntity {
    pub customer_id: Option<i32>,
}

#[derive(Insertable, Deserialize, Debug)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CreateCartItemEntity {
    pub cart_id: i32,
    pub recipe_id: i32,
    pub quantity: i32,
}
