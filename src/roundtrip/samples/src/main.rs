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

//! Runs one request/response round trip over the in-memory broker.

use clap::Parser;
use pubsub_roundtrip::broker::Broker;
use pubsub_roundtrip::broker::memory::InMemoryBroker;
use pubsub_roundtrip::config::Config;
use pubsub_roundtrip::credentials::ServiceAccountKey;
use pubsub_roundtrip::run::run;
use roundtrip_samples::start_echo_responder;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(about = "Publish a request and listen for responses")]
struct Args {
    /// The project owning the topics and the subscription.
    #[arg(long, default_value = "demo-project")]
    project_id: String,

    /// Short id of the topic the request is published to.
    #[arg(long, default_value = "request-topic")]
    request_topic: String,

    /// Short id of the topic responses arrive on.
    #[arg(long, default_value = "response-topic")]
    response_topic: String,

    /// Short id of the subscription bound to the response topic.
    #[arg(long, default_value = "response-subscription")]
    response_subscription: String,

    /// Path to a service account key file.
    #[arg(long)]
    credentials_file: Option<PathBuf>,

    /// How long to listen for responses.
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    listen_window: Duration,

    /// Run an echo responder so the request comes back as a response.
    #[arg(long)]
    echo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = Config::new(&args.project_id)
        .set_request_topic_id(&args.request_topic)
        .set_response_topic_id(&args.response_topic)
        .set_response_subscription_id(&args.response_subscription)
        .set_listen_window(args.listen_window);
    if let Some(path) = &args.credentials_file {
        let key = ServiceAccountKey::from_file(path)?;
        tracing::info!(client_email = %key.client_email, "loaded service account key");
        config = config.set_credentials_file(path);
    }

    let broker: Arc<dyn Broker> = Arc::new(InMemoryBroker::new());
    if args.echo {
        start_echo_responder(broker.clone(), &config).await?;
    }

    let summary = run(broker, &config).await?;
    println!("published request {}", summary.request_id);
    for (i, payload) in summary.responses.iter().enumerate() {
        println!("response {i}: {payload}");
    }
    if summary.responses.is_empty() {
        println!("no responses arrived before the listen window closed");
    }
    Ok(())
}
