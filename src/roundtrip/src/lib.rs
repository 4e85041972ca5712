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

//! Request/reply round trip over a Pub/Sub-style broker.
//!
//! This crate contains the building blocks for a minimal request/response
//! pattern on top of a managed message broker: provision a request topic, a
//! response topic, and a response subscription; publish one JSON request; and
//! listen on the response subscription for a bounded window.
//!
//! The broker itself sits behind the [Broker][broker::Broker] trait. The
//! bundled [InMemoryBroker][broker::memory::InMemoryBroker] implements the
//! same at-least-once contract a managed service provides, so the whole flow
//! runs (and is tested) in-process.
//!
//! # Example
//! ```
//! # async fn sample() -> pubsub_roundtrip::Result<()> {
//! use pubsub_roundtrip::broker::memory::InMemoryBroker;
//! use pubsub_roundtrip::config::Config;
//! use std::sync::Arc;
//!
//! let broker: Arc<dyn pubsub_roundtrip::broker::Broker> =
//!     Arc::new(InMemoryBroker::new());
//! let config = Config::new("my-project")
//!     .set_listen_window(std::time::Duration::from_secs(1));
//! let summary = pubsub_roundtrip::run::run(broker, &config).await?;
//! println!("published request {}", summary.request_id);
//! # Ok(()) }
//! ```

pub mod admin;
pub mod broker;
pub mod config;
pub mod credentials;
pub mod error;
pub mod listener;
pub mod model;
pub mod publisher;
pub mod run;
pub mod subscriber;

pub use error::Error;

/// The result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
