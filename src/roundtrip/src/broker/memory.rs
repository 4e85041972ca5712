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

//! An in-process broker with at-least-once delivery.

use super::{AckResult, Broker, Delivery, SubscribeStream};
use crate::model::{Message, SubscriptionName, TopicName};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Notify, mpsc};

/// Deliveries buffered per consumer before the broker applies backpressure.
/// Overflow stays in the subscription backlog; nothing is dropped.
const DELIVERY_QUEUE_DEPTH: usize = 16;

/// A broker that lives entirely in the process.
///
/// Topics and subscriptions are held in a shared map. Publishing fans a
/// message out to the backlog of every subscription bound to the topic; a
/// forwarder task per open pull stream moves backlog entries into the
/// consumer's bounded delivery queue and applies acks and nacks.
///
/// Delivery is at-least-once: a nacked message is requeued, and when a
/// consumer goes away its unacknowledged messages return to the backlog for
/// the next consumer. An acked message is never redelivered.
///
/// Cloning is cheap; clones share the same topics and subscriptions.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBroker {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    topics: HashSet<String>,
    subscriptions: HashMap<String, Arc<Subscription>>,
}

#[derive(Debug)]
struct Subscription {
    topic: String,
    queues: Mutex<Queues>,
    // Signals forwarders that the backlog gained an entry.
    signal: Notify,
}

#[derive(Debug, Default)]
struct Queues {
    backlog: VecDeque<Delivery>,
    // Delivered but not yet acknowledged, keyed by ack id.
    outstanding: HashMap<String, Message>,
}

impl Subscription {
    fn new(topic: String) -> Self {
        Self {
            topic,
            queues: Mutex::new(Queues::default()),
            signal: Notify::new(),
        }
    }

    fn queues(&self) -> MutexGuard<'_, Queues> {
        self.queues.lock().expect("never poisoned")
    }

    fn enqueue(&self, delivery: Delivery) {
        self.queues().backlog.push_back(delivery);
        self.signal.notify_one();
    }
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("never poisoned")
    }
}

#[async_trait::async_trait]
impl Broker for InMemoryBroker {
    async fn create_topic(&self, name: &TopicName) -> Result<()> {
        let mut state = self.state();
        if !state.topics.insert(name.as_str().to_string()) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        Ok(())
    }

    async fn create_subscription(
        &self,
        name: &SubscriptionName,
        topic: &TopicName,
    ) -> Result<()> {
        let mut state = self.state();
        if !state.topics.contains(topic.as_str()) {
            return Err(Error::NotFound(topic.to_string()));
        }
        if state.subscriptions.contains_key(name.as_str()) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        state.subscriptions.insert(
            name.as_str().to_string(),
            Arc::new(Subscription::new(topic.as_str().to_string())),
        );
        Ok(())
    }

    async fn publish(&self, topic: &TopicName, message: Message) -> Result<String> {
        let bound = {
            let state = self.state();
            if !state.topics.contains(topic.as_str()) {
                return Err(Error::NotFound(topic.to_string()));
            }
            state
                .subscriptions
                .values()
                .filter(|s| s.topic == topic.as_str())
                .cloned()
                .collect::<Vec<_>>()
        };

        let message_id = uuid::Uuid::new_v4().to_string();
        let message = message.set_message_id(message_id.clone());
        // A topic with no bound subscription accepts and discards the message.
        for subscription in bound {
            subscription.enqueue(Delivery {
                message: message.clone(),
                ack_id: uuid::Uuid::new_v4().to_string(),
            });
        }
        Ok(message_id)
    }

    async fn subscribe(&self, name: &SubscriptionName) -> Result<SubscribeStream> {
        let subscription = self
            .state()
            .subscriptions
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        let (delivery_tx, delivery_rx) = mpsc::channel(DELIVERY_QUEUE_DEPTH);
        let (ack_tx, ack_rx) = mpsc::unbounded_channel();
        tokio::spawn(forward(subscription.clone(), delivery_tx));
        tokio::spawn(apply_acks(subscription, ack_rx));

        Ok(SubscribeStream {
            deliveries: delivery_rx,
            acks: ack_tx,
        })
    }
}

/// Moves backlog entries into the consumer's delivery queue.
async fn forward(subscription: Arc<Subscription>, tx: mpsc::Sender<Delivery>) {
    loop {
        let next = subscription.queues().backlog.pop_front();
        let Some(delivery) = next else {
            tokio::select! {
                _ = subscription.signal.notified() => continue,
                _ = tx.closed() => break,
            }
        };
        subscription
            .queues()
            .outstanding
            .insert(delivery.ack_id.clone(), delivery.message.clone());
        if let Err(mpsc::error::SendError(delivery)) = tx.send(delivery).await {
            // The consumer dropped the stream; the undelivered message goes
            // back to the front of the backlog.
            let mut queues = subscription.queues();
            queues.outstanding.remove(&delivery.ack_id);
            queues.backlog.push_front(delivery);
            break;
        }
    }
}

/// Applies ack/nack reports; requeues leftovers when the consumer goes away.
async fn apply_acks(
    subscription: Arc<Subscription>,
    mut ack_rx: mpsc::UnboundedReceiver<AckResult>,
) {
    while let Some(ack) = ack_rx.recv().await {
        match ack {
            AckResult::Ack(ack_id) => {
                subscription.queues().outstanding.remove(&ack_id);
            }
            AckResult::Nack(ack_id) => {
                let message = subscription.queues().outstanding.remove(&ack_id);
                if let Some(message) = message {
                    subscription.enqueue(Delivery { message, ack_id });
                }
            }
        }
    }
    // All ack handles are gone: whatever was delivered but never acknowledged
    // becomes deliverable again.
    let leftovers = {
        let mut queues = subscription.queues();
        queues.outstanding.drain().collect::<Vec<_>>()
    };
    for (ack_id, message) in leftovers {
        subscription.enqueue(Delivery { message, ack_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn topic(id: &str) -> TopicName {
        TopicName::new("p", id)
    }

    fn sub(id: &str) -> SubscriptionName {
        SubscriptionName::new("p", id)
    }

    async fn recv(stream: &mut SubscribeStream) -> Option<Delivery> {
        tokio::time::timeout(Duration::from_secs(5), stream.deliveries.recv())
            .await
            .ok()
            .flatten()
    }

    async fn expect_empty(stream: &mut SubscribeStream) {
        let got = tokio::time::timeout(Duration::from_millis(50), stream.deliveries.recv()).await;
        assert!(got.is_err(), "unexpected delivery: {got:?}");
    }

    #[tokio::test]
    async fn duplicate_topic() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        let err = broker
            .create_topic(&topic("t"))
            .await
            .expect_err("second creation should report a duplicate");
        assert!(err.is_already_exists(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_subscription() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        broker.create_subscription(&sub("s"), &topic("t")).await?;
        let err = broker
            .create_subscription(&sub("s"), &topic("t"))
            .await
            .expect_err("second creation should report a duplicate");
        assert!(err.is_already_exists(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn subscription_requires_topic() {
        let broker = InMemoryBroker::new();
        let err = broker
            .create_subscription(&sub("s"), &topic("missing"))
            .await
            .expect_err("binding to a missing topic should fail");
        assert!(err.is_not_found(), "{err:?}");
    }

    #[tokio::test]
    async fn publish_requires_topic() {
        let broker = InMemoryBroker::new();
        let err = broker
            .publish(&topic("missing"), Message::new().set_data("x"))
            .await
            .expect_err("publishing to a missing topic should fail");
        assert!(err.is_not_found(), "{err:?}");
    }

    #[tokio::test]
    async fn subscribe_requires_subscription() {
        let broker = InMemoryBroker::new();
        let err = broker
            .subscribe(&sub("missing"))
            .await
            .expect_err("subscribing to a missing subscription should fail");
        assert!(err.is_not_found(), "{err:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn publish_without_subscription_is_discarded() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        // Accepted, but nobody is bound to the topic yet.
        broker
            .publish(&topic("t"), Message::new().set_data("early"))
            .await?;

        // A subscription created afterwards does not see the message.
        broker.create_subscription(&sub("s"), &topic("t")).await?;
        let mut stream = broker.subscribe(&sub("s")).await?;
        expect_empty(&mut stream).await;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn fan_out_to_each_bound_subscription() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        broker.create_subscription(&sub("s1"), &topic("t")).await?;
        broker.create_subscription(&sub("s2"), &topic("t")).await?;

        let id = broker
            .publish(&topic("t"), Message::new().set_data("hello"))
            .await?;

        for name in ["s1", "s2"] {
            let mut stream = broker.subscribe(&sub(name)).await?;
            let delivery = recv(&mut stream).await.expect("one delivery per subscription");
            assert_eq!(delivery.message.data.as_ref(), b"hello");
            assert_eq!(delivery.message.message_id, id);
        }
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn topics_are_isolated() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t-req")).await?;
        broker.create_topic(&topic("t-resp")).await?;
        broker
            .create_subscription(&sub("s-resp"), &topic("t-resp"))
            .await?;

        broker
            .publish(&topic("t-req"), Message::new().set_data("request"))
            .await?;

        let mut stream = broker.subscribe(&sub("s-resp")).await?;
        expect_empty(&mut stream).await;

        broker
            .publish(&topic("t-resp"), Message::new().set_data("response"))
            .await?;
        let delivery = recv(&mut stream).await.expect("a response delivery");
        assert_eq!(delivery.message.data.as_ref(), b"response");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn ack_prevents_redelivery() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        broker.create_subscription(&sub("s"), &topic("t")).await?;
        broker
            .publish(&topic("t"), Message::new().set_data("once"))
            .await?;

        let mut stream = broker.subscribe(&sub("s")).await?;
        let delivery = recv(&mut stream).await.expect("first delivery");
        stream.acks.send(AckResult::Ack(delivery.ack_id))?;
        drop(stream);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mut stream = broker.subscribe(&sub("s")).await?;
        expect_empty(&mut stream).await;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn nack_redelivers() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        broker.create_subscription(&sub("s"), &topic("t")).await?;
        broker
            .publish(&topic("t"), Message::new().set_data("again"))
            .await?;

        let mut stream = broker.subscribe(&sub("s")).await?;
        let delivery = recv(&mut stream).await.expect("first delivery");
        stream.acks.send(AckResult::Nack(delivery.ack_id))?;

        let redelivery = recv(&mut stream).await.expect("redelivery after nack");
        assert_eq!(redelivery.message.data.as_ref(), b"again");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn consumer_drop_requeues_unacked() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        broker.create_subscription(&sub("s"), &topic("t")).await?;
        broker
            .publish(&topic("t"), Message::new().set_data("sticky"))
            .await?;

        let mut stream = broker.subscribe(&sub("s")).await?;
        let _ = recv(&mut stream).await.expect("first delivery");
        // Walk away without acknowledging.
        drop(stream);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mut stream = broker.subscribe(&sub("s")).await?;
        let delivery = recv(&mut stream).await.expect("redelivery to the next consumer");
        assert_eq!(delivery.message.data.as_ref(), b"sticky");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn backlog_survives_backpressure() -> anyhow::Result<()> {
        const TOTAL: usize = 4 * DELIVERY_QUEUE_DEPTH;

        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        broker.create_subscription(&sub("s"), &topic("t")).await?;
        for i in 0..TOTAL {
            broker
                .publish(&topic("t"), Message::new().set_data(format!("m-{i}")))
                .await?;
        }

        let mut stream = broker.subscribe(&sub("s")).await?;
        let mut received = Vec::new();
        for _ in 0..TOTAL {
            let delivery = recv(&mut stream).await.expect("every message is delivered");
            received.push(delivery.message.data.clone());
            stream.acks.send(AckResult::Ack(delivery.ack_id))?;
        }
        assert_eq!(received.len(), TOTAL);
        assert_eq!(received[0].as_ref(), b"m-0");
        Ok(())
    }

    #[tokio::test]
    async fn publish_assigns_unique_ids() -> anyhow::Result<()> {
        let broker = InMemoryBroker::new();
        broker.create_topic(&topic("t")).await?;
        let a = broker.publish(&topic("t"), Message::new()).await?;
        let b = broker.publish(&topic("t"), Message::new()).await?;
        assert_ne!(a, b);
        Ok(())
    }
}
