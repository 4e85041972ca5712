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

//! The transport seam between the clients and a message broker.
//!
//! The provisioning, publisher, and subscriber code in this crate only talks
//! to a [Broker]. The bundled [memory::InMemoryBroker] implements the trait
//! in-process; a transport for a managed service implements the same
//! contract.

pub mod memory;

use crate::Result;
use crate::model::{Message, SubscriptionName, TopicName};
use tokio::sync::mpsc;

/// The action a consumer takes on a received message.
#[derive(Debug, PartialEq)]
pub enum AckResult {
    /// The message was processed; remove it from the backlog.
    Ack(String),

    /// The message was rejected; redeliver it.
    Nack(String),
}

/// A single delivery on a subscription.
#[derive(Debug)]
pub struct Delivery {
    /// The delivered message.
    pub message: Message,

    /// The broker-assigned ack handle for this delivery.
    pub ack_id: String,
}

/// An open pull stream on a subscription.
///
/// The broker pushes deliveries onto the bounded `deliveries` queue; the
/// consumer drains it and reports the outcome of each delivery on `acks`.
/// Dropping the stream ends the pull; unacknowledged messages remain the
/// broker's responsibility.
#[derive(Debug)]
pub struct SubscribeStream {
    /// Deliveries, in the order the broker hands them out.
    pub deliveries: mpsc::Receiver<Delivery>,

    /// Ack/nack reports back to the broker.
    pub acks: mpsc::UnboundedSender<AckResult>,
}

/// A message broker.
///
/// Creation operations are create-or-report: a duplicate creation returns
/// [Error::AlreadyExists][crate::Error::AlreadyExists] so callers can
/// implement idempotent provisioning. `publish` resolves once the broker has
/// accepted the message, returning the assigned message id.
#[async_trait::async_trait]
pub trait Broker: std::fmt::Debug + Send + Sync {
    /// Creates a topic.
    async fn create_topic(&self, name: &TopicName) -> Result<()>;

    /// Creates a subscription bound to `topic`.
    async fn create_subscription(
        &self,
        name: &SubscriptionName,
        topic: &TopicName,
    ) -> Result<()>;

    /// Publishes a message to `topic`, returning the assigned message id.
    async fn publish(&self, topic: &TopicName, message: Message) -> Result<String>;

    /// Opens a pull stream on the subscription.
    async fn subscribe(&self, name: &SubscriptionName) -> Result<SubscribeStream>;
}
