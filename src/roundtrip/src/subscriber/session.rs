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

use super::handler::AckHandler;
use crate::broker::SubscribeStream;
use crate::model::Message;
use tokio::sync::mpsc;

/// Represents an open subscribe session.
///
/// This is a stream-like struct for serving messages to an application. Each
/// message comes with an [AckHandler] for acknowledging or rejecting it.
/// Dropping the session cancels the pull; deliveries already handed out may
/// still be acknowledged through their handlers.
///
/// # Example
/// ```no_run
/// # use pubsub_roundtrip::subscriber::session::Session;
/// # async fn sample(mut session: Session) {
/// while let Some((message, handler)) = session.next().await {
///     println!("received message: {message:?}");
///     handler.ack();
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    deliveries: mpsc::Receiver<crate::broker::Delivery>,
    ack_tx: mpsc::UnboundedSender<crate::broker::AckResult>,
}

impl Session {
    pub(crate) fn new(stream: SubscribeStream) -> Self {
        Self {
            deliveries: stream.deliveries,
            ack_tx: stream.acks,
        }
    }

    /// Returns the next message received on this subscription.
    ///
    /// `None` means the broker closed the stream; in practice the stream
    /// stays open until the session is dropped.
    pub async fn next(&mut self) -> Option<(Message, AckHandler)> {
        let delivery = self.deliveries.recv().await?;
        let handler = AckHandler::new(delivery.ack_id, self.ack_tx.clone());
        Some((delivery.message, handler))
    }
}
