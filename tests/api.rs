//! End-to-end checks against a live PostgreSQL instance. They are skipped by
//! default and need a database:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/meals cargo test -- --ignored
//! ```

use axum::Router;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use meals_storefront::{db, routes, state::AppState};
use serde_json::{Value, json};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

async fn spawn_service() -> String {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    db::run_migrations_blocking(MIGRATIONS, &url).await.unwrap();
    let db_pool = db::init_pool(&url).await.unwrap();

    let api = routes::recipes::routes_with_openapi()
        .merge(routes::ingredients::routes_with_openapi())
        .merge(routes::customers::routes_with_openapi())
        .merge(routes::orders::routes_with_openapi())
        .merge(routes::carts::routes_with_openapi());
    let app = Router::new().merge(api).with_state(AppState { db_pool });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn sample_recipe(ingredients: Value) -> Value {
    json!({
        "name": "Pasta",
        "description": "Fresh tagliatelle",
        "cookingInstructions": "Boil for 4 minutes",
        "price": 12.5,
        "quantity": 0,
        "ingredients": ingredients,
    })
}

#[tokio::test]
#[ignore]
async fn missing_recipe_is_a_404() {
    let base_url = spawn_service().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base_url}/api/recipes/2147483647"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Recipe not found" })
    );
}

#[tokio::test]
#[ignore]
async fn creating_a_recipe_links_its_ingredients() {
    let base_url = spawn_service().await;
    let client = reqwest::Client::new();

    let recipe: Value = client
        .post(format!("{base_url}/api/recipes"))
        .json(&sample_recipe(json!([
            { "name": "Flour", "quantity": 200.0, "unit": "g" },
            { "name": "Egg", "quantity": 2.0, "unit": "pcs" },
        ])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ingredients = recipe["ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 2);
    for ingredient in ingredients {
        assert_eq!(ingredient["recipeId"], recipe["id"]);
    }
}

#[tokio::test]
#[ignore]
async fn put_replaces_the_full_ingredient_set() {
    let base_url = spawn_service().await;
    let client = reqwest::Client::new();

    let recipe: Value = client
        .post(format!("{base_url}/api/recipes"))
        .json(&sample_recipe(json!([
            { "name": "Flour", "quantity": 200.0, "unit": "g" },
            { "name": "Egg", "quantity": 2.0, "unit": "pcs" },
        ])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = recipe["id"].as_i64().unwrap();
    let old_ids: Vec<Value> = recipe["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].clone())
        .collect();

    let updated: Value = client
        .put(format!("{base_url}/api/recipes/{id}"))
        .json(&json!({
            "ingredients": [{ "name": "Rice", "quantity": 150.0, "unit": "g" }],
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let new_ingredients = updated["ingredients"].as_array().unwrap();
    assert_eq!(new_ingredients.len(), 1);
    assert_eq!(new_ingredients[0]["name"], "Rice");
    for ingredient in new_ingredients {
        assert!(!old_ids.contains(&ingredient["id"]));
    }
}

#[tokio::test]
#[ignore]
async fn deleting_an_ingredient_removes_it_from_the_recipe() {
    let base_url = spawn_service().await;
    let client = reqwest::Client::new();

    let recipe: Value = client
        .post(format!("{base_url}/api/recipes"))
        .json(&sample_recipe(json!([
            { "name": "Flour", "quantity": 200.0, "unit": "g" },
        ])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let recipe_id = recipe["id"].as_i64().unwrap();
    let ingredient_id = recipe["ingredients"][0]["id"].as_i64().unwrap();

    let deleted = client
        .delete(format!("{base_url}/api/ingredients/{ingredient_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 200);

    let fetched: Value = client
        .get(format!("{base_url}/api/recipes/{recipe_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(fetched["ingredients"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn posting_a_customer_echoes_the_fields() {
    let base_url = spawn_service().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base_url}/api/customers"))
        .json(&json!({
            "name": "A",
            "email": "a@x.com",
            "address": "1 St",
            "mobileNumber": "555",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let customer: Value = response.json().await.unwrap();
    assert!(customer["id"].is_i64());
    assert_eq!(customer["name"], "A");
    assert_eq!(customer["email"], "a@x.com");
    assert_eq!(customer["address"], "1 St");
    assert_eq!(customer["mobileNumber"], "555");
}

#[tokio::test]
#[ignore]
async fn cart_updates_reconcile_the_item_set() {
    let base_url = spawn_service().await;
    let client = reqwest::Client::new();

    let pasta: Value = client
        .post(format!("{base_url}/api/recipes"))
        .json(&sample_recipe(json!([])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let pasta_id = pasta["id"].as_i64().unwrap();

    let created: Value = client
        .post(format!("{base_url}/api/carts"))
        .json(&json!({
            "customerId": null,
            "items": [{ "recipeId": pasta_id, "quantity": 2 }],
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cart_id = created["cart"]["id"].as_i64().unwrap();

    let fetched: Value = client
        .get(format!("{base_url}/api/carts/{cart_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["totalPrice"], json!(25.0));

    let updated: Value = client
        .put(format!("{base_url}/api/carts/{cart_id}"))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["deletedItems"].as_array().unwrap().len(), 1);
    assert!(updated["updatedItems"].as_array().unwrap().is_empty());
}
