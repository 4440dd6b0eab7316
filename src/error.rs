use serde::{Deserialize, Serialize};

/// Version tag embedded in serialized error payloads. Bumped when the
/// payload layout changes; deserializing a payload with a different tag
/// fails instead of silently misreading it.
pub const ERROR_PAYLOAD_VERSION: u32 = 1;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown format: {name}")]
    UnknownFormat { name: String },

    #[error(transparent)]
    Read(#[from] ReadModelError),

    #[error(transparent)]
    Write(#[from] WriteModelError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to serialize an in-memory [`Network`](crate::model::Network) to a
/// target document.
///
/// Carries an optional message (stored verbatim) and an optional underlying
/// cause. Both may be absent; neither is validated. The message and cause are
/// fixed at construction.
#[derive(Debug, Default)]
pub struct WriteModelError {
    message: Option<String>,
    cause: Option<BoxError>,
}

impl WriteModelError {
    /// Error with no message and no cause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Error wrapping a prior error, without a message of its own.
    pub fn from_cause(cause: impl Into<BoxError>) -> Self {
        Self {
            message: None,
            cause: Some(cause.into()),
        }
    }

    /// Error with a message and no cause.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Error with both a message and an underlying cause.
    pub fn with_message_and_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: Some(message.into()),
            cause: Some(cause.into()),
        }
    }

    /// The message exactly as passed at construction, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The wrapped cause, if any. Also reachable through
    /// [`std::error::Error::source`].
    pub fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|c| c.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl std::fmt::Display for WriteModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str("error while writing a model"),
        }
    }
}

impl std::error::Error for WriteModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause()
    }
}

impl Serialize for WriteModelError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorPayload::capture(self.message.as_deref(), self.cause()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WriteModelError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (message, cause) = ErrorPayload::deserialize(deserializer)?
            .into_parts()
            .map_err(serde::de::Error::custom)?;
        Ok(Self { message, cause })
    }
}

/// Failure to parse an input document into an in-memory
/// [`Network`](crate::model::Network).
///
/// Same shape as [`WriteModelError`], read direction: optional verbatim
/// message, optional cause, both fixed at construction.
#[derive(Debug, Default)]
pub struct ReadModelError {
    message: Option<String>,
    cause: Option<BoxError>,
}

impl ReadModelError {
    /// Error with no message and no cause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Error wrapping a prior error, without a message of its own.
    pub fn from_cause(cause: impl Into<BoxError>) -> Self {
        Self {
            message: None,
            cause: Some(cause.into()),
        }
    }

    /// Error with a message and no cause.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Error with both a message and an underlying cause.
    pub fn with_message_and_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: Some(message.into()),
            cause: Some(cause.into()),
        }
    }

    /// The message exactly as passed at construction, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The wrapped cause, if any. Also reachable through
    /// [`std::error::Error::source`].
    pub fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|c| c.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl std::fmt::Display for ReadModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str("error while reading a model"),
        }
    }
}

impl std::error::Error for ReadModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause()
    }
}

impl Serialize for ReadModelError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorPayload::capture(self.message.as_deref(), self.cause()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ReadModelError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (message, cause) = ErrorPayload::deserialize(deserializer)?
            .into_parts()
            .map_err(serde::de::Error::custom)?;
        Ok(Self { message, cause })
    }
}

/// A cause rebuilt from a serialized error payload.
///
/// Crossing a process boundary keeps each link's rendered description, not
/// the concrete type, so rehydrated chains are made of these.
#[derive(Debug)]
pub struct RemoteCause {
    description: String,
    source: Option<Box<RemoteCause>>,
}

impl std::fmt::Display for RemoteCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

impl std::error::Error for RemoteCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Wire form shared by both model error kinds: the version tag, the verbatim
/// message, and the cause chain flattened to one description per link.
#[derive(Serialize, Deserialize)]
struct ErrorPayload {
    version: u32,
    message: Option<String>,
    causes: Vec<String>,
}

impl ErrorPayload {
    fn capture(message: Option<&str>, cause: Option<&(dyn std::error::Error + 'static)>) -> Self {
        let mut causes = Vec::new();
        let mut next = cause;
        while let Some(err) = next {
            causes.push(err.to_string());
            next = err.source();
        }
        Self {
            version: ERROR_PAYLOAD_VERSION,
            message: message.map(String::from),
            causes,
        }
    }

    fn into_parts(self) -> Result<(Option<String>, Option<BoxError>), String> {
        if self.version != ERROR_PAYLOAD_VERSION {
            return Err(format!(
                "unsupported error payload version {} (expected {ERROR_PAYLOAD_VERSION})",
                self.version
            ));
        }
        let cause = self
            .causes
            .into_iter()
            .rev()
            .fold(None, |source, description| {
                Some(Box::new(RemoteCause {
                    description,
                    source,
                }))
            });
        Ok((self.message, cause.map(|c| c as BoxError)))
    }
}
