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

//! The end-to-end request/response exchange.

use crate::admin::Topology;
use crate::broker::Broker;
use crate::config::Config;
use crate::listener::listen;
use crate::model::Message;
use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The outcome of one exchange.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// The broker-assigned id of the published request.
    pub request_id: String,

    /// The response payloads received before the listen window closed.
    pub responses: Vec<String>,
}

/// The request payload, as a JSON document.
fn request_payload() -> Result<Vec<u8>> {
    let body = BTreeMap::from([("name", "harsh")]);
    serde_json::to_vec(&body).map_err(Error::from)
}

/// Runs one request/response exchange.
///
/// Provisions the topics and the response subscription, publishes the
/// request, then listens on the response subscription until the configured
/// window elapses. Receiving no responses is a normal outcome; nothing
/// echoes requests back unless a responder is running.
pub async fn run(broker: Arc<dyn Broker>, config: &Config) -> Result<RunSummary> {
    Topology::new(config).ensure(broker.as_ref()).await?;

    let publisher = Publisher::builder(broker.clone(), config.request_topic()).build();
    let message = Message::new().set_data(request_payload()?);
    let request_id = publisher.publish(message).await?;
    tracing::info!(message_id = %request_id, topic = %publisher.topic(), "published request");

    let mut session = Subscriber::new(broker)
        .subscribe(&config.response_subscription())
        .await?;
    let responses = listen(&mut session, config.listen_window).await;

    Ok(RunSummary {
        request_id,
        responses,
    })
}
