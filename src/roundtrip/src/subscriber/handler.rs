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

use crate::broker::AckResult;
use tokio::sync::mpsc::UnboundedSender;

/// A handler for acknowledging or rejecting one delivered message.
///
/// Dropping the handler without calling either method leaves the message
/// unacknowledged; the broker redelivers it eventually.
#[derive(Debug)]
pub struct AckHandler {
    ack_id: String,
    ack_tx: UnboundedSender<AckResult>,
}

impl AckHandler {
    pub(crate) fn new(ack_id: String, ack_tx: UnboundedSender<AckResult>) -> Self {
        Self { ack_id, ack_tx }
    }

    /// Acknowledge the message associated with this handler.
    ///
    /// This removes the message from the subscription's backlog. The
    /// acknowledgment is best effort; under broker-side redelivery the
    /// message may still be seen again.
    pub fn ack(self) {
        let _ = self.ack_tx.send(AckResult::Ack(self.ack_id));
    }

    /// Rejects the message associated with this handler.
    ///
    /// The broker will redeliver the message, possibly to another consumer.
    pub fn nack(self) {
        let _ = self.ack_tx.send(AckResult::Nack(self.ack_id));
    }
}
