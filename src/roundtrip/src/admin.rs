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

//! Idempotent provisioning of topics and subscriptions.

use crate::Result;
use crate::broker::Broker;
use crate::config::Config;
use crate::model::{SubscriptionName, TopicName};

/// Creates the topic if it does not already exist.
///
/// A topic that already exists is not an error; this is what makes repeated
/// runs against the same project safe.
pub async fn ensure_topic(broker: &dyn Broker, name: &TopicName) -> Result<()> {
    match broker.create_topic(name).await {
        Ok(()) => {
            tracing::info!(topic = %name, "created topic");
            Ok(())
        }
        Err(e) if e.is_already_exists() => {
            tracing::info!(topic = %name, "topic already exists");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Creates the subscription if it does not already exist.
pub async fn ensure_subscription(
    broker: &dyn Broker,
    name: &SubscriptionName,
    topic: &TopicName,
) -> Result<()> {
    match broker.create_subscription(name, topic).await {
        Ok(()) => {
            tracing::info!(subscription = %name, topic = %topic, "created subscription");
            Ok(())
        }
        Err(e) if e.is_already_exists() => {
            tracing::info!(subscription = %name, "subscription already exists");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// The resources one request/response exchange needs.
#[derive(Clone, Debug)]
pub struct Topology {
    pub request_topic: TopicName,
    pub response_topic: TopicName,
    pub response_subscription: SubscriptionName,
}

impl Topology {
    pub fn new(config: &Config) -> Self {
        Self {
            request_topic: config.request_topic(),
            response_topic: config.response_topic(),
            response_subscription: config.response_subscription(),
        }
    }

    /// Provisions all resources, tolerating ones that already exist.
    ///
    /// The response subscription is created last so it never dangles on a
    /// missing topic.
    pub async fn ensure(&self, broker: &dyn Broker) -> Result<()> {
        ensure_topic(broker, &self.request_topic).await?;
        ensure_topic(broker, &self.response_topic).await?;
        ensure_subscription(broker, &self.response_subscription, &self.response_topic).await?;
        Ok(())
    }
}
