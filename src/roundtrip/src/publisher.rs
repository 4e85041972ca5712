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

use crate::model::{Message, TopicName};
use crate::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};

/// A publisher client for one topic.
///
/// Messages are handed to a background worker; [Publisher::publish] returns
/// a [PublishFuture] that resolves with the broker-assigned message id once
/// the broker accepts the message.
///
/// # Example
/// ```no_run
/// # use pubsub_roundtrip::publisher::Publisher;
/// # use pubsub_roundtrip::model::Message;
/// # async fn sample(publisher: Publisher) -> pubsub_roundtrip::Result<()> {
/// let id = publisher.publish(Message::new().set_data("hello")).await?;
/// println!("published message {id}");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Publisher {
    topic: TopicName,
    sender: mpsc::UnboundedSender<BundledMessage>,
}

impl Publisher {
    pub fn builder(broker: Arc<dyn crate::broker::Broker>, topic: TopicName) -> PublisherBuilder {
        PublisherBuilder { broker, topic }
    }

    /// Queues the message for publishing.
    ///
    /// The returned future resolves when the broker accepts or rejects the
    /// message. Awaiting it is the only way to observe the outcome.
    pub fn publish(&self, message: Message) -> PublishFuture {
        let (tx, rx) = oneshot::channel();
        let bundled = BundledMessage { message, tx };
        if let Err(send_error) = self.sender.send(bundled) {
            // The worker is gone; resolve the future with the error.
            let BundledMessage { tx, .. } = send_error.0;
            let _ = tx.send(Err(Error::transport("the publisher worker was shut down")));
        }
        PublishFuture(rx)
    }

    /// The topic this publisher writes to.
    pub fn topic(&self) -> &TopicName {
        &self.topic
    }
}

/// A builder for [Publisher].
pub struct PublisherBuilder {
    broker: Arc<dyn crate::broker::Broker>,
    topic: TopicName,
}

impl PublisherBuilder {
    /// Creates the publisher and starts its background worker.
    pub fn build(self) -> Publisher {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Worker {
            broker: self.broker,
            topic: self.topic.clone(),
            receiver,
        };
        tokio::spawn(worker.run());
        Publisher {
            topic: self.topic,
            sender,
        }
    }
}

/// The future returned by [Publisher::publish].
#[derive(Debug)]
pub struct PublishFuture(oneshot::Receiver<Result<String>>);

impl Future for PublishFuture {
    type Output = Result<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|res| match res {
            Ok(result) => result,
            Err(_) => Err(Error::transport("the publisher worker was shut down")),
        })
    }
}

/// A message and the channel to resolve its [PublishFuture].
#[derive(Debug)]
struct BundledMessage {
    message: Message,
    tx: oneshot::Sender<Result<String>>,
}

/// The background worker servicing one publisher.
///
/// Runs until every `Publisher` clone is dropped, then drains the queue and
/// exits.
struct Worker {
    broker: Arc<dyn crate::broker::Broker>,
    topic: TopicName,
    receiver: mpsc::UnboundedReceiver<BundledMessage>,
}

impl Worker {
    async fn run(mut self) {
        while let Some(bundled) = self.receiver.recv().await {
            let result = self.broker.publish(&self.topic, bundled.message).await;
            if let Err(e) = &result {
                tracing::warn!(topic = %self.topic, error = ?e, "publish failed");
            }
            // The caller may have dropped its future.
            let _ = bundled.tx.send(result);
        }
    }
}
