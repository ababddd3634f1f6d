//! Event rendering and the push-delivery listener
//!
//! Event messages carry a template with `%N` placeholders that are
//! substituted from `MessageArgs`. The listener is a short-lived local
//! HTTP server used as an event-subscription delivery target: it
//! accepts POST bodies containing an `Events` array and prints each
//! event in arrival order until the process is interrupted.

use crate::client::model::{EventBatch, EventRecord};
use crate::error::Result;
use axum::{http::StatusCode, routing::post, Json, Router};
use std::net::SocketAddr;
use tracing::info;

// =============================================================================
// Rendering
// =============================================================================

/// Substitute `%N` placeholders in the message template with the
/// 1-indexed message arguments.
pub fn render_message(event: &EventRecord) -> String {
    let mut message = event.message.clone();
    for (idx, arg) in event.message_args.iter().enumerate() {
        message = message.replace(&format!("%{}", idx + 1), arg);
    }
    message
}

/// One fixed-width human-readable line: id, severity, message.
pub fn render_line(event: &EventRecord) -> String {
    format!(
        "{:<3} : {:>7} : {}",
        event.event_id,
        event.severity,
        render_message(event)
    )
}

// =============================================================================
// Push Listener
// =============================================================================

/// Serve the push-delivery target until interrupted. Each incoming
/// POST is processed in the order received.
pub async fn run_listener(bind: SocketAddr) -> Result<()> {
    let app = Router::new().route("/", post(receive_events));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("event listener on {bind}");
    println!("Listening for events on {bind}...CTRL+C to exit");

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::Internal(format!("event listener: {e}")))?;
    Ok(())
}

async fn receive_events(Json(batch): Json<EventBatch>) -> StatusCode {
    for event in &batch.events {
        println!("{}", render_line(event));
    }
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(message: &str, args: &[&str]) -> EventRecord {
        EventRecord {
            event_id: "0".into(),
            severity: "OK".into(),
            message: message.to_string(),
            message_args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_message_substitution() {
        let e = event("Fabric %1 port %2 down", &["Rabbit", "17"]);
        assert_eq!(render_message(&e), "Fabric Rabbit port 17 down");
    }

    #[test]
    fn test_render_message_no_args() {
        let e = event("Upstream link established", &[]);
        assert_eq!(render_message(&e), "Upstream link established");
    }

    #[test]
    fn test_render_message_repeated_placeholder() {
        let e = event("%1 and %1 again", &["x"]);
        assert_eq!(render_message(&e), "x and x again");
    }

    #[test]
    fn test_render_line_widths() {
        let e = EventRecord {
            event_id: "7".into(),
            severity: "Warning".into(),
            message: "m".into(),
            message_args: vec![],
        };
        assert_eq!(render_line(&e), "7   : Warning : m");
    }
}
