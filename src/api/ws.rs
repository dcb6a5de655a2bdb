//! WebSocket stream of timer events

use std::sync::Arc;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::state::{AppState, TimerEvent};

/// Handle GET /ws/pomodoro - upgrade and forward every timer event
pub async fn events_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

/// Encode an event as a `{"type", "payload"}` text frame
pub fn encode_event(event: &TimerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to encode {} event: {}", event.kind(), e);
            None
        }
    }
}

async fn stream_events(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    forward_events(sender, receiver, state).await;
}

/// Push timer events into `sender` until the client goes away. `receiver`
/// is only watched for the close.
pub async fn forward_events<S, R, E>(mut sender: S, mut receiver: R, state: Arc<AppState>)
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let mut events = state.timer.subscribe();
    info!("Timer event subscriber connected");

    // Give the new client the current state straight away
    if let Ok(snapshot) = state.timer.get_state() {
        if let Some(text) = encode_event(&TimerEvent::StateChanged(snapshot)) {
            if sender.send(Message::Text(text)).await.is_err() {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Some(text) = encode_event(&event) else { continue };
                    if sender.send(Message::Text(text)).await.is_err() {
                        debug!("Subscriber send failed, closing");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },

            message = receiver.next() => match message {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Clients have nothing to say on this channel
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Timer event subscriber disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{SessionCompletion, SessionType, TimerPhase, TimerSettings, TimerSnapshot};
    use futures::channel::mpsc;

    fn frame(message: Option<Message>) -> serde_json::Value {
        match message {
            Some(Message::Text(text)) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected a text frame, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn client_gets_current_state_then_live_events() {
        let state = Arc::new(AppState::new(8000, "127.0.0.1".to_string(), TimerSettings::default()));
        let (server_tx, mut client_rx) = mpsc::unbounded::<Message>();
        let (client_tx, server_rx) = mpsc::unbounded::<Message>();

        let forwarder = tokio::spawn(forward_events(
            server_tx,
            server_rx.map(Ok::<_, axum::Error>),
            Arc::clone(&state),
        ));

        let first = frame(client_rx.next().await);
        assert_eq!(first["type"], "state_changed");
        assert_eq!(first["payload"]["state"], "stopped");

        state.timer.start().unwrap();
        let started = frame(client_rx.next().await);
        assert_eq!(started["type"], "state_changed");
        assert_eq!(started["payload"]["state"], "running");

        let tick = frame(client_rx.next().await);
        assert_eq!(tick["type"], "timer_state");
        assert_eq!(tick["payload"]["time_left_seconds"], 1499);

        state.timer.reset().unwrap();
        drop(client_tx);
        forwarder.await.unwrap();
    }

    #[tokio::test]
    async fn close_frame_ends_the_stream() {
        let state = Arc::new(AppState::new(8000, "127.0.0.1".to_string(), TimerSettings::default()));
        let (server_tx, mut client_rx) = mpsc::unbounded::<Message>();
        let (client_tx, server_rx) = mpsc::unbounded::<Message>();

        client_tx.unbounded_send(Message::Close(None)).unwrap();
        forward_events(server_tx, server_rx.map(Ok::<_, axum::Error>), state).await;

        assert_eq!(frame(client_rx.next().await)["type"], "state_changed");
    }

    #[test]
    fn completion_frames_carry_both_session_types() {
        let snapshot = TimerSnapshot {
            session_type: SessionType::ShortBreak,
            time_left_seconds: 300,
            state: TimerPhase::Stopped,
            sessions_completed: 1,
            person_present: true,
            auto_pause_enabled: true,
            progress_percent: 0.0,
            formatted_time: "05:00".to_string(),
        };
        let event = TimerEvent::SessionComplete(SessionCompletion {
            completed_session_type: SessionType::Work,
            next_session_type: SessionType::ShortBreak,
            sessions_completed: 1,
            state: snapshot,
        });

        let text = encode_event(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "session_complete");
        assert_eq!(value["payload"]["completed_session_type"], "work");
        assert_eq!(value["payload"]["next_session_type"], "short_break");
        assert_eq!(value["payload"]["state"]["formatted_time"], "05:00");
    }
}
