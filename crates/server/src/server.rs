use axum::{
    Router,
    routing::{get, post, put},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{events, payments, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(state: ServerState) -> Router {
    let users = Router::new()
        .route("/create-account", post(users::create_account))
        .route("/login", post(users::login))
        .route("/{id}/push-token", put(users::update_push_token));

    let events = Router::new()
        .route("/create-event", post(events::create_event))
        .route("/validate-invite-code", post(events::validate_invite_code))
        .route("/join-event", post(events::join_event))
        .route("/event/{id}", get(events::event_detail))
        .route("/user-events/{user_id}", get(events::user_events))
        .route("/user/{id}", get(events::user))
        .route("/update-participant-color", post(events::swap_colors))
        .route("/cancel-event/{id}", put(events::cancel_event))
        .route("/leave-event", post(events::leave_event));

    let payments = Router::new().route("/payment-sheet", post(payments::payment_sheet));

    Router::new()
        .nest("/users", users)
        .nest("/events", events)
        .nest("/payments", payments)
        .with_state(state)
}

pub async fn run(engine: Arc<Engine>, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState { engine })).await
}

pub fn spawn_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
