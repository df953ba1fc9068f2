use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::Message;

use crate::auth::session::SessionContext;
use crate::store::RecordStore;

/// GET /records/live: WebSocket pushing a refresh hint whenever the remote
/// table changes. The store subscription lives exactly as long as the socket.
pub async fn ws_connect(
    req: HttpRequest,
    body: web::Payload,
    ctx: SessionContext,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, actix_web::Error> {
    if !ctx.is_authenticated() {
        return Ok(HttpResponse::Unauthorized().finish());
    }

    let Some(mut changes) = store.subscribe() else {
        return Ok(HttpResponse::NotFound().body("Live updates are not available for this storage backend"));
    };

    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, body)?;
    let store = store.into_inner();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                changed = changes.next() => {
                    if changed.is_none() {
                        break;
                    }
                    let count = store.list().await.len();
                    let msg = serde_json::json!({
                        "type": "records_changed",
                        "count": count,
                    });
                    if ws_session.text(msg.to_string()).await.is_err() {
                        break;
                    }
                }
                msg = msg_stream.recv() => match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        if ws_session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    // Any end of the client stream releases the subscription
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
            }
        }

        // Deregister before closing
        drop(changes);
        let _ = ws_session.close(None).await;
        log::debug!("Live table socket closed");
    });

    Ok(response)
}
