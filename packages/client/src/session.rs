//! Interactive chat session: WebSocket on one side, the prompt on the other.

use futures_util::{Sink, SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::{ClientEvent, SendMessagePayload, ServerEvent};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::{self, Message}};
use url::form_urlencoded;

use crate::{
    command::Command,
    error::ClientError,
    formatter::{format_history_header, format_message},
    view::{ChatView, ViewUpdate},
};

/// Connection parameters
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `ws://127.0.0.1:8080`
    pub url: String,
    pub username: String,
    /// Room joined right after connecting
    pub room: String,
}

/// Connect, join the initial room and run until `/quit` or the server goes away
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let url = connect_url(&config.url, &config.username);
    let (stream, _) = connect_async(url.as_str())
        .await
        .map_err(|source| ClientError::Connect {
            url: url.clone(),
            source,
        })?;
    tracing::info!("Connected to {}", url);
    println!("Connected as {}. Commands: /join <room>, /leave, /quit", config.username);

    let (mut ws_tx, mut ws_rx) = stream.split();

    let mut view = ChatView::new();
    view.switch_to(&config.room);
    send_event(&mut ws_tx, &ClientEvent::JoinRoom(config.room.clone())).await?;

    // rustyline blocks, so it gets its own thread
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Command>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let prompt = format!("{}> ", config.username);
    std::thread::spawn(move || read_input(prompt, ready_tx, input_tx));
    if let Ok(Err(e)) = ready_rx.await {
        return Err(e.into());
    }

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => render(view.apply(event)),
                    Err(e) => tracing::warn!("Ignoring malformed frame: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => {
                    println!("Server closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            command = input_rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    Command::Join(room) => {
                        view.switch_to(&room);
                        send_event(&mut ws_tx, &ClientEvent::JoinRoom(room)).await?;
                    }
                    Command::Leave => {
                        if let Some(room) = view.room() {
                            println!("Left #{room}");
                        }
                        view.leave();
                        send_event(&mut ws_tx, &ClientEvent::LeaveRoom).await?;
                    }
                    Command::Say(content) => {
                        let Some(room) = view.room() else {
                            println!("Join a room first: /join <room>");
                            continue;
                        };
                        let event = ClientEvent::SendMessage(SendMessagePayload {
                            sender: Some(config.username.clone()),
                            content,
                            room: Some(room.to_string()),
                        });
                        send_event(&mut ws_tx, &event).await?;
                    }
                    Command::Invalid(usage) => println!("{usage}"),
                    Command::Empty => {}
                    Command::Quit => break,
                }
            }
        }
    }

    if let Err(e) = ws_tx.close().await {
        tracing::debug!("Error while closing WebSocket: {}", e);
    }
    tracing::info!("Disconnected");
    Ok(())
}

/// WebSocket endpoint for `username` under the server base URL
fn connect_url(base: &str, username: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("username", username)
        .finish();
    format!("{}/ws?{}", base.trim_end_matches('/'), query)
}

async fn send_event<S>(sink: &mut S, event: &ClientEvent) -> Result<(), ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(event)?;
    sink.send(Message::Text(json.into())).await?;
    Ok(())
}

fn render(update: ViewUpdate) {
    match update {
        ViewUpdate::Replaced { room, messages } => {
            println!("{}", format_history_header(&room, messages.len()));
            for message in &messages {
                println!("{}", format_message(message));
            }
        }
        ViewUpdate::Appended(message) => println!("{}", format_message(&message)),
        ViewUpdate::Ignored => {}
    }
}

fn read_input(
    prompt: String,
    ready: oneshot::Sender<Result<(), ReadlineError>>,
    tx: mpsc::UnboundedSender<Command>,
) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => {
            let _ = ready.send(Ok(()));
            editor
        }
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if tx.send(Command::parse(&line)).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                let _ = tx.send(Command::Quit);
                break;
            }
            Err(e) => {
                tracing::error!("Readline error: {}", e);
                let _ = tx.send(Command::Quit);
                break;
            }
        }
    }
}
