//! Backend message decoding.
//!
//! One JSON object per message; a recording is JSONL, one message per line.
//! The delta `kind` is matched against the known mutation kinds and an
//! unknown kind is an error, never a best guess.

use std::fmt;

use dtree_core::{
    BlockConfig, BlockFlags, BlockLayout, Content, DeltaPath, Generation, LeafMetadata, Mutation,
    MutationKind,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::element::{Element, ElementDelta};
use crate::session::RunOutcome;

/// A decoded backend message.
#[derive(Debug, Clone)]
pub enum SessionMessage<C: Content> {
    /// A new script run starts; its deltas carry `generation`.
    NewRun { generation: Generation },
    /// One mutation of the current run.
    Delta(Mutation<C>),
    /// The current run ended.
    RunFinished(RunOutcome),
    /// The user asked for a rerun; everything on screen is now stale.
    RerunRequested,
}

/// What went wrong decoding a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not JSON, not an object, or a required field is missing or mistyped.
    Malformed { message: String },
    /// `type` names no known message.
    UnknownMessageType { message_type: String },
    /// A delta's `kind` names no known mutation.
    UnknownMutationKind { kind: String },
}

/// Error decoding a message, with its 1-based line when read from a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub line: Option<usize>,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    fn malformed(message: impl fmt::Display) -> Self {
        Self::from(DecodeErrorKind::Malformed {
            message: message.to_string(),
        })
    }

    fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self { line: None, kind }
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { message } => write!(f, "malformed message: {message}"),
            Self::UnknownMessageType { message_type } => {
                write!(f, "unknown message type \"{message_type}\"")
            }
            Self::UnknownMutationKind { kind } => write!(f, "unknown delta kind \"{kind}\""),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for DecodeError {}

// ── Message bodies ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NewRunRecord {
    generation: Generation,
}

#[derive(Deserialize)]
struct RunFinishedRecord {
    outcome: RunOutcome,
}

#[derive(Deserialize)]
struct SetLeafRecord {
    path: Vec<usize>,
    element: Element,
    #[serde(default)]
    metadata: LeafMetadata,
}

#[derive(Deserialize)]
struct SetContainerRecord {
    path: Vec<usize>,
    #[serde(default)]
    block: BlockRecord,
}

#[derive(Deserialize, Default)]
struct BlockRecord {
    #[serde(default)]
    allow_empty: bool,
    #[serde(default)]
    layout: BlockLayout,
}

impl From<BlockRecord> for BlockConfig {
    fn from(record: BlockRecord) -> Self {
        let flags = if record.allow_empty {
            BlockFlags::ALLOW_EMPTY
        } else {
            BlockFlags::empty()
        };
        Self {
            flags,
            layout: record.layout,
        }
    }
}

#[derive(Deserialize)]
struct AppendRecord {
    path: Vec<usize>,
    delta: ElementDelta,
}

fn body<T: DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(DecodeError::malformed)
}

fn string_field<'a>(value: &'a Value, key: &str) -> Result<&'a str, DecodeError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::malformed(format!("missing \"{key}\" field")))
}

// ── Decoding ────────────────────────────────────────────────────────────

/// Decode a single JSON message.
pub fn decode_message(input: &str) -> Result<SessionMessage<Element>, DecodeError> {
    let value: Value = serde_json::from_str(input).map_err(DecodeError::malformed)?;
    if !value.is_object() {
        return Err(DecodeError::malformed("expected a JSON object"));
    }

    match string_field(&value, "type")? {
        "new_run" => {
            let record: NewRunRecord = body(value)?;
            Ok(SessionMessage::NewRun {
                generation: record.generation,
            })
        }
        "delta" => decode_delta(value).map(SessionMessage::Delta),
        "run_finished" => {
            let record: RunFinishedRecord = body(value)?;
            Ok(SessionMessage::RunFinished(record.outcome))
        }
        "rerun_requested" => Ok(SessionMessage::RerunRequested),
        other => Err(DecodeErrorKind::UnknownMessageType {
            message_type: other.to_string(),
        }
        .into()),
    }
}

fn decode_delta(value: Value) -> Result<Mutation<Element>, DecodeError> {
    let kind_name = string_field(&value, "kind")?;
    let kind = MutationKind::from_name(kind_name).ok_or_else(|| {
        DecodeError::from(DecodeErrorKind::UnknownMutationKind {
            kind: kind_name.to_string(),
        })
    })?;

    let mutation = match kind {
        MutationKind::SetLeaf => {
            let record: SetLeafRecord = body(value)?;
            Mutation::SetLeaf {
                path: DeltaPath::from_vec(record.path),
                content: record.element,
                metadata: record.metadata,
            }
        }
        MutationKind::SetContainer => {
            let record: SetContainerRecord = body(value)?;
            Mutation::SetContainer {
                path: DeltaPath::from_vec(record.path),
                config: record.block.into(),
            }
        }
        MutationKind::AppendToLeaf => {
            let record: AppendRecord = body(value)?;
            Mutation::AppendToLeaf {
                path: DeltaPath::from_vec(record.path),
                increment: record.delta,
            }
        }
    };
    Ok(mutation)
}

/// Decode a JSONL stream, skipping blank lines.
///
/// Stops at the first bad line; the error carries its 1-based number.
pub fn decode_stream(input: &str) -> Result<Vec<SessionMessage<Element>>, DecodeError> {
    let mut messages = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let message = decode_message(line).map_err(|err| err.at_line(index + 1))?;
        messages.push(message);
    }
    Ok(messages)
}
