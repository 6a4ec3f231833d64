use utoipa::openapi::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Interactive API docs served at `/swagger-ui`.
pub fn create_swagger_ui(openapi: OpenApi) -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi)
}
