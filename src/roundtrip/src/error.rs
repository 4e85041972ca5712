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

//! Errors for the round-trip clients and brokers.
//!
//! Most applications only need the predicates. Provisioning, for example,
//! recovers from [Error::AlreadyExists] and treats everything else as fatal:
//!
//! ```
//! fn recover(result: pubsub_roundtrip::Result<()>) -> pubsub_roundtrip::Result<()> {
//!     match result {
//!         Err(e) if e.is_already_exists() => Ok(()),
//!         other => other,
//!     }
//! }
//! ```

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error returned by all clients and brokers in this crate.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The resource already exists.
    ///
    /// Creation operations report this so callers can implement
    /// create-or-noop provisioning.
    #[error("resource {0} already exists")]
    AlreadyExists(String),

    /// The resource does not exist.
    #[error("resource {0} was not found")]
    NotFound(String),

    /// The caller is not authorized to perform the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The operation was interrupted by a transport failure.
    #[error("the operation was interrupted by a transport error")]
    Transport(#[source] BoxError),

    /// The credential file could not be loaded.
    #[error("failed to load the service account credentials")]
    Credentials(#[source] BoxError),

    /// The request payload could not be serialized.
    #[error("failed to serialize the request payload")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates an error representing a transport failure.
    pub fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self::Transport(source.into())
    }

    /// Creates an error representing a credential loading problem.
    pub fn credentials<T: Into<BoxError>>(source: T) -> Self {
        Self::Credentials(source.into())
    }

    /// The target resource already exists.
    ///
    /// Provisioning treats this as success.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    /// The target resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The caller lacks permission. Always fatal, never retried.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
