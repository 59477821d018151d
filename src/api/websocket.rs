use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_ws::Message;
use futures_util::StreamExt as _;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::api::models_ws::{WsClientMessage, WsSubscribedEvent, WsTokenEvent};
use crate::relay::{Fragment, StreamRelay};

/// Live token feed. A client subscribes to conversations over one socket and
/// receives every fragment the relay publishes for them from that point on;
/// anything already streamed before the subscribe has to come from the store.
#[get("/ws")]
pub async fn ws_stream(
    req: HttpRequest,
    body: web::Payload,
    relay: web::Data<Arc<StreamRelay>>,
) -> Result<HttpResponse, Error> {
    let (response, mut session, mut msg_stream) = actix_ws::handle(&req, body)?;

    let subscriber_id = Uuid::new_v4();
    let relay = relay.as_ref().clone();

    info!("WebSocket connection established, subscriber {}", subscriber_id);

    let (tx, mut rx) = mpsc::unbounded_channel::<Fragment>();

    // Forward relayed fragments to the socket. Ends when the relay drops our
    // sender (removed on disconnect) or the client goes away.
    let mut fragment_session = session.clone();
    actix_web::rt::spawn(async move {
        while let Some(fragment) = rx.recv().await {
            let event = WsTokenEvent::from(fragment);
            if fragment_session
                .text(serde_json::to_string(&event).unwrap())
                .await
                .is_err()
            {
                break;
            }
        }
    });

    actix_web::rt::spawn(async move {
        while let Some(Ok(msg)) = msg_stream.next().await {
            match msg {
                Message::Ping(bytes) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                }
                Message::Text(text) => {
                    let client_msg: Result<WsClientMessage, _> = serde_json::from_str(&text);
                    if let Ok(msg) = client_msg {
                        if msg.r#type == "subscribe" {
                            if let Some(conversation_id) = msg.conversation_id {
                                relay.subscribe(conversation_id, subscriber_id, tx.clone());
                                let ack = WsSubscribedEvent::new(conversation_id);
                                let _ = session
                                    .text(serde_json::to_string(&ack).unwrap())
                                    .await;
                            }
                        }
                    }
                }
                Message::Close(reason) => {
                    let _ = session.close(reason).await;
                    break;
                }
                _ => {}
            }
        }

        // Tear down all bindings so the relay doesn't keep dead handles
        relay.remove_subscriber(subscriber_id);
        info!("WebSocket connection closed, subscriber {}", subscriber_id);
    });

    Ok(response)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ws_stream);
}
