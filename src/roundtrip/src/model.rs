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

//! The resource names and message type exchanged with a broker.

use std::fmt;

/// A fully-qualified topic name, `projects/{project}/topics/{topic}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TopicName(String);

impl TopicName {
    /// Builds the fully-qualified name from a project id and a short topic id.
    pub fn new(project_id: &str, topic_id: &str) -> Self {
        Self(format!("projects/{project_id}/topics/{topic_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully-qualified subscription name,
/// `projects/{project}/subscriptions/{subscription}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionName(String);

impl SubscriptionName {
    /// Builds the fully-qualified name from a project id and a short
    /// subscription id.
    pub fn new(project_id: &str, subscription_id: &str) -> Self {
        Self(format!("projects/{project_id}/subscriptions/{subscription_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message exchanged over a broker.
///
/// The payload is an opaque byte sequence. The broker assigns `message_id`
/// when the message is accepted for publication; the id is empty until then.
///
/// # Example
/// ```
/// use pubsub_roundtrip::model::Message;
/// let message = Message::new().set_data("Hello, World!");
/// assert_eq!(message.data.as_ref(), b"Hello, World!");
/// assert!(message.message_id.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Message {
    /// The message payload.
    pub data: bytes::Bytes,

    /// The broker-assigned id, unique within the topic.
    pub message_id: String,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for [data][Message::data].
    pub fn set_data<T: Into<bytes::Bytes>>(mut self, v: T) -> Self {
        self.data = v.into();
        self
    }

    /// Sets the value for [message_id][Message::message_id].
    pub fn set_message_id<T: Into<String>>(mut self, v: T) -> Self {
        self.message_id = v.into();
        self
    }
}
