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

//! Run configuration.
//!
//! Every value the round trip needs is carried explicitly here and passed
//! into each component, rather than living in process-wide constants.

use crate::model::{SubscriptionName, TopicName};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_REQUEST_TOPIC_ID: &str = "request-topic";
const DEFAULT_RESPONSE_TOPIC_ID: &str = "response-topic";
const DEFAULT_RESPONSE_SUBSCRIPTION_ID: &str = "response-subscription";
const DEFAULT_LISTEN_WINDOW: Duration = Duration::from_secs(30);

/// Configuration for one round trip run.
///
/// # Example
/// ```
/// use pubsub_roundtrip::config::Config;
/// use std::time::Duration;
///
/// let config = Config::new("my-project")
///     .set_request_topic_id("orders")
///     .set_listen_window(Duration::from_secs(10));
/// assert_eq!(config.request_topic().as_str(), "projects/my-project/topics/orders");
/// ```
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Config {
    /// The project owning the topics and the subscription.
    pub project_id: String,

    /// Short id of the topic the request is published to.
    pub request_topic_id: String,

    /// Short id of the topic the responder publishes to.
    pub response_topic_id: String,

    /// Short id of the subscription bound to the response topic.
    pub response_subscription_id: String,

    /// Path to a service-account-style key file.
    ///
    /// Only consumed by transports that authenticate; the in-memory broker
    /// ignores it.
    pub credentials_file: Option<PathBuf>,

    /// How long the listener stays subscribed to the response subscription.
    pub listen_window: Duration,
}

impl Config {
    /// Creates a configuration for `project_id` with the default resource ids
    /// and a 30 second listen window.
    pub fn new<T: Into<String>>(project_id: T) -> Self {
        Self {
            project_id: project_id.into(),
            request_topic_id: DEFAULT_REQUEST_TOPIC_ID.to_string(),
            response_topic_id: DEFAULT_RESPONSE_TOPIC_ID.to_string(),
            response_subscription_id: DEFAULT_RESPONSE_SUBSCRIPTION_ID.to_string(),
            credentials_file: None,
            listen_window: DEFAULT_LISTEN_WINDOW,
        }
    }

    /// Sets the value for [request_topic_id][Config::request_topic_id].
    pub fn set_request_topic_id<T: Into<String>>(mut self, v: T) -> Self {
        self.request_topic_id = v.into();
        self
    }

    /// Sets the value for [response_topic_id][Config::response_topic_id].
    pub fn set_response_topic_id<T: Into<String>>(mut self, v: T) -> Self {
        self.response_topic_id = v.into();
        self
    }

    /// Sets the value for
    /// [response_subscription_id][Config::response_subscription_id].
    pub fn set_response_subscription_id<T: Into<String>>(mut self, v: T) -> Self {
        self.response_subscription_id = v.into();
        self
    }

    /// Sets the value for [credentials_file][Config::credentials_file].
    pub fn set_credentials_file<T: Into<PathBuf>>(mut self, v: T) -> Self {
        self.credentials_file = Some(v.into());
        self
    }

    /// Sets the value for [listen_window][Config::listen_window].
    pub fn set_listen_window(mut self, v: Duration) -> Self {
        self.listen_window = v;
        self
    }

    /// The fully-qualified request topic name.
    pub fn request_topic(&self) -> TopicName {
        TopicName::new(&self.project_id, &self.request_topic_id)
    }

    /// The fully-qualified response topic name.
    pub fn response_topic(&self) -> TopicName {
        TopicName::new(&self.project_id, &self.response_topic_id)
    }

    /// The fully-qualified response subscription name.
    pub fn response_subscription(&self) -> SubscriptionName {
        SubscriptionName::new(&self.project_id, &self.response_subscription_id)
    }
}
