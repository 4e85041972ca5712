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

//! Helpers shared by the runnable samples.

use pubsub_roundtrip::Result;
use pubsub_roundtrip::admin::{ensure_subscription, ensure_topic};
use pubsub_roundtrip::broker::Broker;
use pubsub_roundtrip::config::Config;
use pubsub_roundtrip::model::{Message, SubscriptionName};
use pubsub_roundtrip::publisher::Publisher;
use pubsub_roundtrip::subscriber::Subscriber;
use std::sync::Arc;
use tokio::task::JoinHandle;

const ECHO_SUBSCRIPTION_ID: &str = "echo-responder";

/// Starts a background task that answers requests.
///
/// The responder subscribes to the request topic and republishes every
/// payload on the response topic, byte for byte. It runs until the broker is
/// dropped or the returned handle is aborted.
pub async fn start_echo_responder(
    broker: Arc<dyn Broker>,
    config: &Config,
) -> Result<JoinHandle<()>> {
    let request_topic = config.request_topic();
    let subscription = SubscriptionName::new(&config.project_id, ECHO_SUBSCRIPTION_ID);
    ensure_topic(broker.as_ref(), &request_topic).await?;
    ensure_topic(broker.as_ref(), &config.response_topic()).await?;
    ensure_subscription(broker.as_ref(), &subscription, &request_topic).await?;

    let publisher = Publisher::builder(broker.clone(), config.response_topic()).build();
    let mut session = Subscriber::new(broker).subscribe(&subscription).await?;

    Ok(tokio::spawn(async move {
        while let Some((message, handler)) = session.next().await {
            tracing::info!(message_id = %message.message_id, "echoing request");
            let response = Message::new().set_data(message.data.clone());
            if let Err(e) = publisher.publish(response).await {
                tracing::warn!(error = ?e, "failed to echo request");
                handler.nack();
                continue;
            }
            handler.ack();
        }
    }))
}
