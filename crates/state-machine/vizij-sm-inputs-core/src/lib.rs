//! vizij-sm-inputs-core: state-machine input bridge (engine-agnostic)
//!
//! Exposes the named Number/Boolean/Trigger inputs of an animation state machine
//! as case-insensitive properties on a host object and keeps both sides in sync.
//!
//! Layers, leaf to root:
//! - [`names`]: identifier sanitizing and case-folded [`InputKey`]s
//! - [`registry`]: key -> [`InputDescriptor`] table rebuilt on every rebind
//! - [`listeners`]: lazily created [`ListenerHandle`]s per key
//! - [`sync`]: per-tick reconciliation (state machine -> host)
//! - [`router`]: host change notifications and trigger signals (host -> state machine)
//! - [`bridge`]: the [`StateMachineInputs`] facade owning all of the above
//!
//! The engine side is consumed through the [`StateMachine`] trait and the host
//! side through the [`HostObject`] registration table. [`MemoryStateMachine`]
//! and [`PropertyTable`] are in-memory implementations of both.

pub mod bridge;
pub mod coercion;
pub mod config;
pub mod error;
pub mod host;
pub mod ids;
pub mod listeners;
pub mod machine;
pub mod memory;
pub mod names;
pub mod registry;
pub mod router;
pub mod sync;
pub mod value;

// Re-exports for hosts (adapters)
pub use bridge::StateMachineInputs;
pub use config::{BridgeConfig, CollisionPolicy};
pub use error::{ConfigError, NameError};
pub use host::{HostObject, PropertyDecl, PropertyTable, SignalDecl, WriteOrigin};
pub use ids::SignalId;
pub use listeners::{DynamicPropertyHub, ListenerHandle};
pub use machine::{InputKind, SharedStateMachine, StateMachine};
pub use memory::{MemoryInput, MemoryStateMachine};
pub use names::{normalize, InputKey, NameNormalizer};
pub use registry::{InputDescriptor, InputListing, InputRegistry};
pub use router::ChangeRouter;
pub use sync::{InputSnapshot, SyncReport};
pub use value::{InputValue, Value};
