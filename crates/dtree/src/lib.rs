#![forbid(unsafe_code)]

//! dtree public facade crate.
//!
//! Re-exports the tree engine and, with the default `session` feature, the
//! message-stream session with its element content and wire decoding.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use dtree_core::{
    BlockConfig, BlockFlags, BlockLayout, Content, DeltaPath, Generation, Leaf, LeafMetadata,
    Mutation, MutationKind, Node, RootContainer, Tree, TreeError, apply_mutation,
};

// --- Session re-exports ----------------------------------------------------

#[cfg(feature = "session")]
pub use dtree_session::{
    ConfigError, DecodeError, Element, ElementDelta, PrunePolicy, RunOutcome, RunState, Session,
    SessionConfig, SessionError, SessionMessage, TableData, decode_message, decode_stream,
    outline,
};

// --- Errors ---------------------------------------------------------------

/// Any failure surfaced by dtree.
#[derive(Debug)]
pub enum Error {
    Tree(TreeError),
    #[cfg(feature = "session")]
    Decode(DecodeError),
    #[cfg(feature = "session")]
    Session(SessionError),
    #[cfg(feature = "session")]
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "{err}"),
            #[cfg(feature = "session")]
            Self::Decode(err) => write!(f, "{err}"),
            #[cfg(feature = "session")]
            Self::Session(err) => write!(f, "{err}"),
            #[cfg(feature = "session")]
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            #[cfg(feature = "session")]
            Self::Decode(err) => Some(err),
            #[cfg(feature = "session")]
            Self::Session(err) => Some(err),
            #[cfg(feature = "session")]
            Self::Config(err) => Some(err),
        }
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

#[cfg(feature = "session")]
impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

#[cfg(feature = "session")]
impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

#[cfg(feature = "session")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for dtree APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Decode a JSONL recording and replay it through a fresh session.
#[cfg(feature = "session")]
pub fn replay(jsonl: &str, config: SessionConfig) -> Result<Session<Element>> {
    let mut session = Session::new(config);
    for message in decode_stream(jsonl)? {
        session.handle(message)?;
    }
    Ok(session)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BlockConfig, BlockLayout, DeltaPath, Error, Generation, LeafMetadata, Mutation, Node,
        Result, Tree, apply_mutation,
    };

    #[cfg(feature = "session")]
    pub use crate::{Element, ElementDelta, RunOutcome, Session, SessionConfig};

    pub use crate::core;
    #[cfg(feature = "session")]
    pub use crate::session;
}

pub use dtree_core as core;
#[cfg(feature = "session")]
pub use dtree_session as session;
