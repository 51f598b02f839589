//! The run state machine.
//!
//! ```text
//!            begin_run               finish_run
//!   Idle ───────────────▶ Running ───────────────▶ Idle
//!     ▲                      │ request_rerun
//!     │     begin_run        ▼
//!     └─────────────── RerunRequested
//! ```
//!
//! A session owns the published [`Tree`]. Every successful delta replaces it
//! wholesale; a failed delta leaves it as it was.

use std::fmt;

use dtree_core::{Content, DeltaPath, Generation, Mutation, Node, Tree, TreeError, apply_mutation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{PrunePolicy, SessionConfig};
use crate::element::Element;
use crate::wire::SessionMessage;

/// Where the session is in a run's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    RerunRequested,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    CompileError,
    Interrupted,
}

/// Error applying a message to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The delta's path is longer than the configured bound.
    PathTooDeep { path: DeltaPath, max: usize },
    /// The tree rejected the mutation.
    Tree(TreeError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathTooDeep { path, max } => write!(
                f,
                "path {} has depth {}, limit is {max}",
                dtree_core::path::display(path),
                path.len()
            ),
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::PathTooDeep { .. } => None,
        }
    }
}

impl From<TreeError> for SessionError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

/// A tree driven by one backend's message stream.
#[derive(Debug, Clone)]
pub struct Session<C: Content> {
    config: SessionConfig,
    tree: Tree<C>,
    generation: Generation,
    state: RunState,
}

impl<C: Content> Default for Session<C> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<C: Content> Session<C> {
    /// Idle session over an empty tree.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_tree(config, Tree::empty())
    }

    /// Idle session starting from `tree`.
    #[must_use]
    pub fn with_tree(config: SessionConfig, tree: Tree<C>) -> Self {
        Self {
            config,
            tree,
            generation: Generation::unset(),
            state: RunState::Idle,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The published tree.
    pub fn tree(&self) -> &Tree<C> {
        &self.tree
    }

    /// An owned handle to the published tree. Shares every node.
    #[must_use]
    pub fn snapshot(&self) -> Tree<C> {
        self.tree.clone()
    }

    /// Generation of the current (or last) run.
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Start a run; subsequent deltas are stamped with `generation`.
    pub fn begin_run(&mut self, generation: Generation) {
        info!(
            generation = %generation,
            previous = %self.generation,
            "run started"
        );
        self.generation = generation;
        self.state = RunState::Running;
    }

    /// Apply one delta of the current run and publish the result.
    pub fn apply(&mut self, mutation: &Mutation<C>) -> Result<(), SessionError> {
        let path = mutation.path();
        if path.len() > self.config.max_path_depth {
            warn!(
                kind = mutation.kind().name(),
                depth = path.len(),
                max = self.config.max_path_depth,
                "delta rejected: path too deep"
            );
            return Err(SessionError::PathTooDeep {
                path: DeltaPath::from_slice(path),
                max: self.config.max_path_depth,
            });
        }
        if self.state != RunState::Running {
            debug!(state = ?self.state, "delta outside a running run");
        }

        match apply_mutation(&self.tree, mutation, &self.generation) {
            Ok(tree) => {
                self.tree = tree;
                Ok(())
            }
            Err(err) => {
                warn!(
                    kind = mutation.kind().name(),
                    path = %dtree_core::path::display(path),
                    error = %err,
                    "delta rejected"
                );
                Err(err.into())
            }
        }
    }

    /// End the current run. Returns whether stale nodes were pruned.
    pub fn finish_run(&mut self, outcome: RunOutcome) -> bool {
        self.state = RunState::Idle;
        let prune = match self.config.prune_policy {
            PrunePolicy::OnCompletion => outcome == RunOutcome::Completed,
            PrunePolicy::OnAnyFinish => true,
            PrunePolicy::Never => false,
        };
        if prune {
            let before = self.tree.leaf_count();
            self.tree = self.tree.prune_stale(&self.generation);
            info!(
                generation = %self.generation,
                outcome = ?outcome,
                leaves_before = before,
                leaves_after = self.tree.leaf_count(),
                "run finished; stale nodes pruned"
            );
        } else {
            info!(
                generation = %self.generation,
                outcome = ?outcome,
                policy = %self.config.prune_policy,
                "run finished; tree kept as is"
            );
        }
        prune
    }

    /// Mark everything on screen as stale until the next run starts.
    pub fn request_rerun(&mut self) {
        debug!(generation = %self.generation, "rerun requested");
        self.state = RunState::RerunRequested;
    }

    /// Dispatch one decoded message.
    pub fn handle(&mut self, message: SessionMessage<C>) -> Result<(), SessionError> {
        match message {
            SessionMessage::NewRun { generation } => self.begin_run(generation),
            SessionMessage::Delta(mutation) => self.apply(&mutation)?,
            SessionMessage::RunFinished(outcome) => {
                self.finish_run(outcome);
            }
            SessionMessage::RerunRequested => self.request_rerun(),
        }
        Ok(())
    }

    /// Whether `node` should render as stale right now.
    ///
    /// Everything is stale once a rerun is requested. While a run is in
    /// flight, nodes it has not yet touched are stale. Idle sessions show
    /// nothing as stale.
    pub fn is_stale(&self, node: &Node<C>) -> bool {
        match self.state {
            RunState::RerunRequested => true,
            RunState::Running => node.generation() != &self.generation,
            RunState::Idle => false,
        }
    }
}

impl Session<Element> {
    /// Ids of every interactive element in the published tree, in
    /// rendering order.
    pub fn widget_ids(&self) -> Vec<&str> {
        self.tree
            .collect_leaves()
            .into_iter()
            .filter_map(Element::widget_id)
            .collect()
    }
}
