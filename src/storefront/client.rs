use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A catalogue entry as served by `GET /api/recipes`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub cooking_instructions: String,
    pub price: f64,
    pub quantity: i32,
}

/// The checkout form fields, posted verbatim to `/api/customers`.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub address: String,
    pub mobile_number: String,
}

/// A stored customer record, id assigned by the service.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: String,
    pub mobile_number: String,
}

/// Thin REST client over the catalogue/order service.
#[derive(Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn fetch_recipes(&self) -> Result<Vec<Recipe>> {
        let recipes = self
            .http
            .get(format!("{}/api/recipes", self.base_url))
            .send()
            .await
            .context("Failed to fetch recipes")?
            .error_for_status()
            .context("Fetching recipes returned an error status")?
            .json()
            .await
            .context("Failed to parse recipes JSON")?;

        Ok(recipes)
    }

    /// The cart sync the browser performs: overwrite the recipe's `quantity`
    /// field with this shopper's current count.
    pub async fn set_recipe_quantity(&self, recipe_id: i32, quantity: i32) -> Result<()> {
        self.http
            .put(format!("{}/api/recipes/{}", self.base_url, recipe_id))
            .json(&json!({ "quantity": quantity }))
            .send()
            .await
            .context("Failed to update recipe quantity")?
            .error_for_status()
            .context("Updating recipe quantity returned an error status")?;

        Ok(())
    }

    pub async fn create_customer(&self, details: &CustomerDetails) -> Result<Customer> {
        let customer = self
            .http
            .post(format!("{}/api/customers", self.base_url))
            .json(details)
            .send()
            .await
            .context("Failed to store customer details")?
            .error_for_status()
            .context("Storing customer details returned an error status")?
            .json()
            .await
            .context("Failed to parse customer JSON")?;

        Ok(customer)
    }
}
