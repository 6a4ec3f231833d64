use tracing::{error, info};

use super::{
    cart::Cart,
    client::{CustomerDetails, Recipe, StorefrontClient},
};

/// Which storefront view the shopper is looking at. The checkout popup only
/// ever opens on top of the cart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browsing,
    CartOpen,
    CheckoutOpen,
}

/// The storefront session: catalogue, cart, checkout form and current view.
/// Cart mutations are optimistic; a failed server write rolls the line back
/// and the failure is only logged, never surfaced past that.
pub struct Storefront {
    client: StorefrontClient,
    catalogue: Vec<Recipe>,
    cart: Cart,
    customer: CustomerDetails,
    view: View,
}

impl Storefront {
    pub fn new(client: StorefrontClient) -> Self {
        Self {
            client,
            catalogue: Vec::new(),
            cart: Cart::default(),
            customer: CustomerDetails::default(),
            view: View::Browsing,
        }
    }

    pub fn catalogue(&self) -> &[Recipe] {
        &self.catalogue
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn customer_mut(&mut self) -> &mut CustomerDetails {
        &mut self.customer
    }

    /// Load the catalogue. On failure the list stays empty and the UI falls
    /// back to "No recipes found".
    pub async fn load_catalogue(&mut self) {
        match self.client.fetch_recipes().await {
            Ok(recipes) => self.catalogue = recipes,
            Err(err) => error!("Error fetching recipes: {err:#}"),
        }
    }

    pub async fn add_to_cart(&mut self, recipe_id: i32) {
        let previous = self.cart.count_of(recipe_id);
        let count = self.cart.add(recipe_id);
        self.sync_quantity(recipe_id, count, previous).await;
    }

    pub async fn increase_quantity(&mut self, recipe_id: i32) {
        let previous = self.cart.count_of(recipe_id);
        let Some(count) = self.cart.increase(recipe_id) else {
            return;
        };
        self.sync_quantity(recipe_id, count, previous).await;
    }

    /// A decrement at a count of one is refused outright; no server write
    /// happens in that case.
    pub async fn decrease_quantity(&mut self, recipe_id: i32) {
        let previous = self.cart.count_of(recipe_id);
        let Some(count) = self.cart.decrease(recipe_id) else {
            return;
        };
        self.sync_quantity(recipe_id, count, previous).await;
    }

    async fn sync_quantity(&mut self, recipe_id: i32, count: i32, previous: Option<i32>) {
        match self.client.set_recipe_quantity(recipe_id, count).await {
            Ok(()) => self.cart.confirm(recipe_id),
            Err(err) => {
                error!("Error updating recipe quantity: {err:#}");
                self.cart.restore(recipe_id, previous);
            }
        }
    }

    pub fn total_price(&self) -> f64 {
        self.cart.total_price(&self.catalogue)
    }

    pub fn open_cart(&mut self) {
        if self.view == View::Browsing {
            self.view = View::CartOpen;
        }
    }

    /// Cancelling the cart throws the session away: the lines and the
    /// half-typed customer form are both discarded.
    pub fn close_cart(&mut self) {
        self.view = View::Browsing;
        self.cart.clear();
        self.customer = CustomerDetails::default();
    }

    pub fn open_checkout(&mut self) {
        if self.view == View::CartOpen {
            self.view = View::CheckoutOpen;
        }
    }

    pub fn close_checkout(&mut self) {
        if self.view == View::CheckoutOpen {
            self.view = View::CartOpen;
        }
    }

    /// Submit the customer record. Success and failure both land back on the
    /// cart view; nothing else is cleared.
    ///
    /// TODO: decide the cart → order linkage. `POST /api/orders` exists on
    /// the service but nothing ties the placed order to the cart lines yet;
    /// this flow stores only the customer record.
    pub async fn place_order(&mut self) -> bool {
        let confirmed = match self.client.create_customer(&self.customer).await {
            Ok(customer) => {
                info!("Customer details stored successfully (id {})", customer.id);
                true
            }
            Err(err) => {
                error!("Error storing customer details: {err:#}");
                false
            }
        };
        self.close_checkout();
        confirmed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing,
    };
    use serde_json::{Value, json};

    use super::*;

    #[derive(Clone, Default)]
    struct StubState {
        puts: Arc<Mutex<Vec<(i32, Value)>>>,
        fail_puts: bool,
    }

    async fn stub_recipes() -> Json<Value> {
        Json(json!([
            {
                "id": 1,
                "name": "Pasta",
                "description": "Fresh tagliatelle",
                "cookingInstructions": "Boil for 4 minutes",
                "price": 12.5,
                "quantity": 0,
            },
            {
                "id": 2,
                "name": "Soup",
                "description": "Tomato soup",
                "cookingInstructions": "Simmer",
                "price": 4.0,
                "quantity": 0,
            },
        ]))
    }

    async fn stub_put_recipe(
        Path(id): Path<i32>,
        State(state): State<StubState>,
        Json(body): Json<Value>,
    ) -> Response {
        state.puts.lock().unwrap().push((id, body));
        if state.fail_puts {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred" })),
            )
                .into_response()
        } else {
            Json(json!({ "id": id })).into_response()
        }
    }

    async fn stub_create_customer(Json(mut body): Json<Value>) -> Json<Value> {
        body["id"] = json!(7);
        Json(body)
    }

    async fn spawn_stub(fail_puts: bool) -> (String, StubState) {
        let state = StubState {
            fail_puts,
            ..StubState::default()
        };
        let app = Router::new()
            .route("/api/recipes", routing::get(stub_recipes))
            .route("/api/recipes/{id}", routing::put(stub_put_recipe))
            .route("/api/customers", routing::post(stub_create_customer))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), state)
    }

    fn puts(state: &StubState) -> Vec<(i32, Value)> {
        state.puts.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn adding_a_new_recipe_puts_quantity_one() {
        let (base_url, stub) = spawn_stub(false).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));

        shop.add_to_cart(1).await;

        assert_eq!(shop.cart().count_of(1), Some(1));
        assert_eq!(puts(&stub), vec![(1, json!({ "quantity": 1 }))]);
    }

    #[tokio::test]
    async fn adding_again_puts_the_incremented_count() {
        let (base_url, stub) = spawn_stub(false).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));

        shop.add_to_cart(1).await;
        shop.add_to_cart(1).await;

        assert_eq!(shop.cart().count_of(1), Some(2));
        assert_eq!(
            puts(&stub),
            vec![
                (1, json!({ "quantity": 1 })),
                (1, json!({ "quantity": 2 })),
            ]
        );
    }

    #[tokio::test]
    async fn decrease_at_one_issues_no_put() {
        let (base_url, stub) = spawn_stub(false).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));

        shop.add_to_cart(1).await;
        shop.decrease_quantity(1).await;

        assert_eq!(shop.cart().count_of(1), Some(1));
        // Only the initial add reached the server.
        assert_eq!(puts(&stub).len(), 1);
    }

    #[tokio::test]
    async fn failed_sync_rolls_the_line_back() {
        let (base_url, stub) = spawn_stub(true).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));

        shop.add_to_cart(1).await;

        assert!(shop.cart().is_empty());
        assert_eq!(puts(&stub).len(), 1);
    }

    #[tokio::test]
    async fn failed_increase_restores_the_previous_count() {
        let (base_url, _stub) = spawn_stub(false).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));

        shop.add_to_cart(1).await;
        shop.add_to_cart(1).await;
        assert_eq!(shop.cart().count_of(1), Some(2));

        // Same session, but the service starts failing.
        let (failing_url, _failing_stub) = spawn_stub(true).await;
        shop.client = StorefrontClient::new(failing_url);

        shop.increase_quantity(1).await;
        assert_eq!(shop.cart().count_of(1), Some(2));
    }

    #[tokio::test]
    async fn total_price_tracks_the_catalogue() {
        let (base_url, _stub) = spawn_stub(false).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));
        shop.load_catalogue().await;

        assert_eq!(shop.total_price(), 0.0);

        shop.add_to_cart(1).await;
        shop.add_to_cart(1).await;
        shop.add_to_cart(2).await;

        assert_eq!(shop.total_price(), 29.0);
    }

    #[tokio::test]
    async fn place_order_closes_only_the_checkout_popup() {
        let (base_url, _stub) = spawn_stub(false).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));

        shop.add_to_cart(1).await;
        shop.open_cart();
        shop.open_checkout();
        shop.customer_mut().name = "A".into();
        shop.customer_mut().email = "a@x.com".into();

        assert!(shop.place_order().await);
        assert_eq!(shop.view(), View::CartOpen);
        assert_eq!(shop.cart().count_of(1), Some(1));
    }

    #[tokio::test]
    async fn closing_the_cart_discards_the_session() {
        let (base_url, _stub) = spawn_stub(false).await;
        let mut shop = Storefront::new(StorefrontClient::new(base_url));

        shop.add_to_cart(1).await;
        shop.open_cart();
        shop.customer_mut().name = "A".into();
        shop.close_cart();

        assert_eq!(shop.view(), View::Browsing);
        assert!(shop.cart().is_empty());
        assert_eq!(shop.customer().name, "");
    }

    #[tokio::test]
    async fn catalogue_stays_empty_when_the_service_is_down() {
        let mut shop = Storefront::new(StorefrontClient::new("http://127.0.0.1:1"));
        shop.load_catalogue().await;

        assert!(shop.catalogue().is_empty());
    }
}
