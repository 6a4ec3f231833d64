use anyhow::{Context, Result};
use axum::{Json, extract::State, response::IntoResponse};
use diesel::SelectableHelper;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    error::AppError,
    models::{CreateCustomerEntity, CustomerEntity},
    schema::customers,
    state::AppState,
};

/// Defines the customer routes with OpenAPI specs.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/api/customers",
        OpenApiRouter::new().routes(utoipa_axum::routes!(create_customer)),
    )
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateCustomerReq {
    pub name: String,
    pub email: String,
    pub address: String,
    pub mobile_number: String,
}

/// Store the customer details submitted by the checkout popup. No uniqueness
/// is enforced; placing two orders stores two rows.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Customers"],
    request_body = CreateCustomerReq,
    responses(
        (status = 200, description = "Created customer successfully", body = CustomerEntity)
    )
)]
async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<CreateCustomerReq>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let customer: CustomerEntity = diesel::insert_into(customers::table)
        .values(CreateCustomerEntity {
            name: body.name,
            email: body.email,
            address: body.address,
            mobile_number: body.mobile_number,
        })
        .returning(CustomerEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to create customer")?;

    Ok(Json(customer))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_request_accepts_the_wire_shape() {
        let body: CreateCustomerReq = serde_json::from_value(json!({
            "name": "A",
            "email": "a@x.com",
            "address": "1 St",
            "mobileNumber": "555",
        }))
        .unwrap();

        assert_eq!(body.mobile_number, "555");
    }
}
