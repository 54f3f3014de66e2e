use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::ApiError;
use crate::tickets::{PurchaseReceipt, PurchaseRequest, TicketPriceResponse, TicketService};

/// Handler for POST /api/tickets/purchase
/// Validates and prices a basket, takes payment and reserves seats
#[utoipa::path(
    post,
    path = "/api/tickets/purchase",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Tickets purchased", body = PurchaseReceipt),
        (status = 400, description = "Purchase rejected", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn purchase_tickets(
    State(service): State<TicketService>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<PurchaseReceipt>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(
        "Purchase request with {} ticket lines",
        request.ticket_type_requests.len()
    );

    // Collaborators are synchronous and may block on their own I/O
    let receipt = tokio::task::spawn_blocking(move || service.purchase(&request))
        .await
        .map_err(|e| ApiError::InternalError(format!("purchase task failed: {}", e)))??;

    Ok(Json(receipt))
}

/// Handler for GET /api/tickets/prices
/// Lists the price and seat requirement of every ticket type
#[utoipa::path(
    get,
    path = "/api/tickets/prices",
    responses(
        (status = 200, description = "Ticket price list", body = Vec<TicketPriceResponse>)
    ),
    tag = "tickets"
)]
pub async fn get_ticket_prices() -> Json<Vec<TicketPriceResponse>> {
    Json(TicketService::price_list())
}
