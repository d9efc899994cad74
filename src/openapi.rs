use axum::{http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::handlers;
use crate::models::{Endereco, EnderecoDto, Prospect, ProspectDto};

/// OpenAPI document of the prospect endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prospect Pessoa Física API",
        description = "Cadastro de prospects pessoa física e fila de atendimento"
    ),
    paths(
        handlers::create_prospect,
        handlers::update_prospect,
        handlers::get_prospect,
        handlers::delete_prospect,
        handlers::list_prospects,
        handlers::get_service_queue,
        handlers::next_prospect,
    ),
    components(schemas(Prospect, Endereco, ProspectDto, EnderecoDto)),
    tags(
        (name = "prospect-pessoa-fisica", description = "CRUD de prospects pessoa física"),
        (name = "service-queue", description = "Fila de atendimento em memória")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI specification as JSON.
pub async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// The page loads the document served by [`serve_openapi_spec`].
pub async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Prospect API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}
