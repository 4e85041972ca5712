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

//! End-to-end exchanges over the in-memory broker.

use pubsub_roundtrip::admin::Topology;
use pubsub_roundtrip::broker::Broker;
use pubsub_roundtrip::broker::memory::InMemoryBroker;
use pubsub_roundtrip::config::Config;
use pubsub_roundtrip::run::run;
use roundtrip_samples::start_echo_responder;
use std::sync::Arc;
use std::time::Duration;

fn test_config() -> Config {
    Config::new("test-project").set_listen_window(Duration::from_secs(5))
}

#[tokio::test(start_paused = true)]
async fn round_trip_with_echo_responder() -> anyhow::Result<()> {
    let broker: Arc<dyn Broker> = Arc::new(InMemoryBroker::new());
    let config = test_config();
    let responder = start_echo_responder(broker.clone(), &config).await?;

    let summary = run(broker, &config).await?;
    assert!(!summary.request_id.is_empty());
    assert_eq!(summary.responses, vec![r#"{"name":"harsh"}"#.to_string()]);

    responder.abort();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn run_without_responder_receives_nothing() -> anyhow::Result<()> {
    let broker: Arc<dyn Broker> = Arc::new(InMemoryBroker::new());
    let summary = run(broker, &test_config()).await?;
    assert!(summary.responses.is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn repeated_runs_reuse_provisioned_resources() -> anyhow::Result<()> {
    let broker: Arc<dyn Broker> = Arc::new(InMemoryBroker::new());
    let config = test_config();
    let responder = start_echo_responder(broker.clone(), &config).await?;

    let first = run(broker.clone(), &config).await?;
    let second = run(broker.clone(), &config).await?;
    assert_ne!(first.request_id, second.request_id);
    assert_eq!(second.responses, vec![r#"{"name":"harsh"}"#.to_string()]);

    responder.abort();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn provisioning_is_idempotent() -> anyhow::Result<()> {
    let broker = InMemoryBroker::new();
    let config = test_config();
    let topology = Topology::new(&config);
    topology.ensure(&broker).await?;
    topology.ensure(&broker).await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn responses_are_consumed_exactly_once() -> anyhow::Result<()> {
    let broker: Arc<dyn Broker> = Arc::new(InMemoryBroker::new());
    let config = test_config();
    let responder = start_echo_responder(broker.clone(), &config).await?;

    let first = run(broker.clone(), &config).await?;
    assert_eq!(first.responses.len(), 1);

    // The echoed response was acknowledged; a later run must not see it again.
    responder.abort();
    let second = run(broker, &config).await?;
    assert!(second.responses.is_empty());
    Ok(())
}
