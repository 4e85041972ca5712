// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Draining a subscription for a bounded window of time.

use crate::subscriber::session::Session;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};

/// Receives messages on the session until `window` elapses.
///
/// Every delivery is acknowledged, decodable or not; returning a message to
/// the backlog after the window closed would only delay the inevitable
/// expiry. Returns the UTF-8 payloads in arrival order.
pub async fn listen(session: &mut Session, window: Duration) -> Vec<String> {
    let deadline = Instant::now() + window;
    let mut payloads = Vec::new();
    while let Ok(next) = timeout_at(deadline, session.next()).await {
        let Some((message, handler)) = next else {
            tracing::info!("the subscription stream closed before the window elapsed");
            break;
        };
        match String::from_utf8(message.data.to_vec()) {
            Ok(text) => {
                tracing::info!(message_id = %message.message_id, payload = %text, "received response");
                payloads.push(text);
            }
            Err(_) => {
                tracing::warn!(message_id = %message.message_id, "dropping undecodable message");
            }
        }
        handler.ack();
    }
    tracing::info!(count = payloads.len(), "listen window closed");
    payloads
}
