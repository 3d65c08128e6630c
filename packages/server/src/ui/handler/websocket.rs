//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionSession, RoomId, SessionEvent, Username, ValueObjectError},
    infrastructure::dto::websocket::{ClientEvent, SendMessagePayload, ServerEvent},
    ui::state::{AppState, ConnectQuery},
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        SendMessageError, SendMessageUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> Username (Domain Model)
    let username = match query.username.map(Username::try_from) {
        Some(Ok(username)) => username,
        Some(Err(e)) => {
            tracing::warn!("Rejecting connection with invalid username: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
        None => {
            tracing::warn!("Rejecting connection without username");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, username)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, username: Username) {
    // Create a channel for this session to receive events
    let (tx, mut rx) = mpsc::unbounded_channel::<SessionEvent>();

    let connect_usecase = ConnectSessionUseCase::new(state.hub.clone());
    let session = match connect_usecase.execute(username, tx).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to register session: {}", e);
            return;
        }
    };
    let session_id = session.id;

    let (mut sender, mut receiver) = socket.split();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on session '{}': {}", session.id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => {
                        let handle = dispatch(state_clone.clone(), session.clone(), event);
                        if let Err(e) = handle.await {
                            tracing::error!("Event handler for '{}' failed: {}", session.id, e);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring malformed frame from '{}': {}", session.id, e);
                    }
                },
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", session.id);
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", session.id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward room events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&ServerEvent::from(event)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect_usecase = DisconnectSessionUseCase::new(state.hub.clone());
    if let Err(e) = disconnect_usecase.execute(session_id).await {
        tracing::warn!("Failed to disconnect session '{}': {}", session_id, e);
    }
}

/// Run one client event to completion on its own task.
///
/// The receive loop can be aborted at any await when the connection drops.
/// Detaching the handler keeps a message that reached the store from being
/// left without its broadcast.
fn dispatch(state: Arc<AppState>, session: ConnectionSession, event: ClientEvent) -> JoinHandle<()> {
    tokio::spawn(async move { handle_client_event(&state, &session, event).await })
}

async fn handle_client_event(state: &AppState, session: &ConnectionSession, event: ClientEvent) {
    match event {
        ClientEvent::JoinRoom(room) => {
            let room = match RoomId::try_from(room) {
                Ok(room) => room,
                Err(e) => {
                    tracing::warn!("Invalid room from '{}': {}", session.id, e);
                    return;
                }
            };
            let usecase =
                JoinRoomUseCase::new(state.hub.clone(), state.store.clone(), state.history_limit);
            if let Err(e) = usecase.execute(session.id, room).await {
                tracing::warn!("Failed to join room: {}", e);
            }
        }
        ClientEvent::SendMessage(payload) => handle_send_message(state, session, payload).await,
        ClientEvent::LeaveRoom => {
            let usecase = LeaveRoomUseCase::new(state.hub.clone());
            if let Err(e) = usecase.execute(session.id).await {
                tracing::warn!("Failed to leave room: {}", e);
            }
        }
    }
}

async fn handle_send_message(state: &AppState, session: &ConnectionSession, payload: SendMessagePayload) {
    // The sender is always the authenticated username
    if let Some(sender) = payload.sender.as_deref()
        && sender != session.username.as_str()
    {
        tracing::warn!(
            "Session '{}' claimed sender '{}'; using '{}'",
            session.id,
            sender,
            session.username
        );
    }

    let requested_room = match payload.room.map(RoomId::try_from).transpose() {
        Ok(room) => room,
        Err(e) => {
            tracing::warn!("Invalid room from '{}': {}", session.id, e);
            return;
        }
    };

    let usecase = SendMessageUseCase::new(state.hub.clone(), state.store.clone());
    match usecase.execute(session.id, payload.content, requested_room).await {
        Ok(_) => {}
        Err(SendMessageError::InvalidMessage(ValueObjectError::MessageContentEmpty)) => {
            tracing::debug!("Dropped empty message from '{}'", session.id);
        }
        Err(e) => {
            tracing::warn!("Failed to send message: {}", e);
        }
    }
}
