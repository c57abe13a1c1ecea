use api_types::payment::{PaymentSheetRequest, PaymentSheetResponse};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn payment_sheet(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentSheetRequest>,
) -> Result<Json<PaymentSheetResponse>, ServerError> {
    let sheet = state.engine.payment_sheet(payload.event_id).await?;
    Ok(Json(PaymentSheetResponse {
        payment_intent: sheet.client_secret,
        customer: sheet.customer,
    }))
}
