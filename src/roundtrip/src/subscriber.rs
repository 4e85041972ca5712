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

/// Handlers for acknowledging or rejecting messages.
pub mod handler;

/// Defines the return interface for [Subscriber::subscribe].
pub mod session;

use crate::Result;
use crate::broker::Broker;
use crate::model::SubscriptionName;
use session::Session;
use std::sync::Arc;

/// A subscriber client for a broker.
///
/// Use this client to receive messages from a subscription.
///
/// # Example
/// ```no_run
/// # use pubsub_roundtrip::subscriber::Subscriber;
/// # use pubsub_roundtrip::model::SubscriptionName;
/// # async fn sample(subscriber: Subscriber) -> pubsub_roundtrip::Result<()> {
/// let name = SubscriptionName::new("my-project", "my-subscription");
/// let mut session = subscriber.subscribe(&name).await?;
/// while let Some((message, handler)) = session.next().await {
///     println!("received message: {message:?}");
///     handler.ack();
/// }
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Subscriber {
    inner: Arc<dyn Broker>,
}

impl Subscriber {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self { inner: broker }
    }

    /// Opens a [Session] on the subscription.
    ///
    /// Fails if the subscription does not exist or the transport cannot be
    /// established; either is fatal to the caller.
    pub async fn subscribe(&self, name: &SubscriptionName) -> Result<Session> {
        let stream = self.inner.subscribe(name).await?;
        Ok(Session::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::memory::InMemoryBroker;
    use crate::model::TopicName;

    #[tokio::test]
    async fn subscribe_missing_subscription() -> anyhow::Result<()> {
        let subscriber = Subscriber::new(Arc::new(InMemoryBroker::new()));
        let err = subscriber
            .subscribe(&SubscriptionName::new("p", "missing"))
            .await
            .expect_err("subscribing to a missing subscription should fail");
        assert!(err.is_not_found(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn subscribe_existing_subscription() -> anyhow::Result<()> {
        let broker = Arc::new(InMemoryBroker::new());
        broker.create_topic(&TopicName::new("p", "t")).await?;
        broker
            .create_subscription(&SubscriptionName::new("p", "s"), &TopicName::new("p", "t"))
            .await?;
        let subscriber = Subscriber::new(broker);
        let _session = subscriber
            .subscribe(&SubscriptionName::new("p", "s"))
            .await?;
        Ok(())
    }
}
