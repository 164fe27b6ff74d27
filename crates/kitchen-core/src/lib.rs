//! Resolution engine and player state for Kitchen Alchemy.
//!
//! This crate turns a selection of ingredients (plus an optional cooking
//! method) into a discovery or a miss, keeps the player's collection,
//! achievements, and custom-recipe ledger, and persists them.
//!
//! # Modules
//!
//! - [`achievements`] -- Statistics over the collection and threshold
//!   evaluation.
//! - [`autosave`] -- Periodic safeguard save schedule.
//! - [`config`] -- Game configuration from an optional YAML file.
//! - [`engine`] -- [`Kitchen`], the resolution engine and its ordered
//!   lookup chain.
//! - [`generation`] -- [`Generator`] seam and generated-id policy.
//! - [`ledger`] -- Custom-recipe authoring, import, and export.
//! - [`state`] -- [`PlayerState`] and its discovery rules.
//! - [`store`] -- Blob storage, game-global keys, legacy-key migration.
//! - [`workspace`] -- The mixing bowl.
//!
//! [`Kitchen`]: engine::Kitchen
//! [`Generator`]: generation::Generator
//! [`PlayerState`]: state::PlayerState

pub mod achievements;
pub mod autosave;
pub mod config;
pub mod engine;
pub mod generation;
pub mod ledger;
pub mod state;
pub mod store;
pub mod workspace;

pub use achievements::{AchievementEvaluator, DiscoveryStats, Evaluation};
pub use autosave::AutosaveTimer;
pub use config::{ConfigError, GameConfig};
pub use engine::{DEFAULT_PRECEDENCE, GenerationTicket, Kitchen, ResolutionStep, Strategy};
pub use generation::{AiIdPolicy, DisabledGenerator, Generator};
pub use ledger::{CustomRecipeLedger, ImportSummary, LedgerError, RecipeDraft};
pub use state::{PlayerState, Progress};
pub use store::{BlobStore, FileBlobStore, MemoryBlobStore, StateStore, StorageKey, StoreError};
pub use workspace::{MAX_SELECTION, RejectReason, Workspace, WorkspaceEvent};
