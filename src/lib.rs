pub mod config;
pub mod error;
pub mod thirdparty;
pub mod tickets;

use std::sync::Arc;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use error::ErrorResponse;
use thirdparty::{LoggingPaymentGateway, LoggingSeatReservation};
use tickets::{
    PurchaseReceipt, PurchaseRequest, TicketLineRequest, TicketPriceResponse, TicketService,
    TicketType,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        tickets::handlers::purchase_tickets,
        tickets::handlers::get_ticket_prices,
    ),
    components(
        schemas(
            PurchaseRequest,
            TicketLineRequest,
            PurchaseReceipt,
            TicketPriceResponse,
            TicketType,
            ErrorResponse
        )
    ),
    tags(
        (name = "tickets", description = "Ticket purchase endpoints")
    ),
    info(
        title = "Ticket Service API",
        version = "1.0.0",
        description = "Validates, prices and purchases baskets of event tickets"
    )
)]
pub struct ApiDoc;

/// Handler for GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Ticket service wired to the in-process payment and seat collaborators
pub fn default_ticket_service() -> TicketService {
    TicketService::new(
        Arc::new(LoggingPaymentGateway::new()),
        Arc::new(LoggingSeatReservation::new()),
    )
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds tracing and CORS middleware
pub fn create_router(service: TicketService) -> Router {
    // Allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .route("/api/tickets/purchase", post(tickets::purchase_tickets))
        .route("/api/tickets/prices", get(tickets::get_ticket_prices))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(service)
}
