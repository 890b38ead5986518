//! Input registry: normalized key -> typed input descriptor.
//!
//! Rebuilt from scratch on every (re)bind; descriptors are never patched in place.
//! Entries keep the native input order of the state machine (first insertion wins
//! the position, see [`CollisionPolicy`]).

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::CollisionPolicy;
use crate::machine::{InputKind, StateMachine};
use crate::names::{normalize, InputKey, NameNormalizer};

/// One registered input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputDescriptor {
    pub key: InputKey,
    pub display_name: String,
    pub kind: InputKind,
    /// Index into the bound state machine's input list.
    pub index: usize,
}

/// Host-facing listing entry, serialized as `{ "text": ..., "type": ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputListing {
    #[serde(rename = "text")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
}

type ListingObserver = Box<dyn FnMut(&[InputListing])>;

#[derive(Default)]
pub struct InputRegistry {
    entries: IndexMap<InputKey, InputDescriptor>,
    revision: u64,
    observers: Vec<ListingObserver>,
}

impl fmt::Debug for InputRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputRegistry")
            .field("entries", &self.entries)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from `machine`. Pass `None` when the bridge is inactive or unbound:
    /// the registry is left empty (observers hear about it only if entries were dropped).
    /// Otherwise observers are notified twice: once cleared, once populated.
    pub fn rebuild(
        &mut self,
        machine: Option<&dyn StateMachine>,
        names: &NameNormalizer,
        policy: CollisionPolicy,
    ) {
        self.revision = self.revision.wrapping_add(1);
        let had_entries = !self.entries.is_empty();
        self.entries.clear();

        let Some(machine) = machine else {
            if had_entries {
                self.notify();
            }
            return;
        };
        self.notify();

        for index in 0..machine.input_count() {
            let Some(raw) = machine.input_name(index) else {
                continue;
            };
            let Some(display_name) = names.display_name(raw) else {
                continue;
            };
            let type_key = machine.input_type_key(index).unwrap_or_default();
            let Some(kind) = InputKind::from_type_key(type_key) else {
                warn!(
                    "input {:?} has unsupported type key {}; skipping",
                    display_name, type_key
                );
                continue;
            };
            debug!(
                "found state machine input {:?} type: {}",
                display_name, kind
            );
            self.insert(
                InputDescriptor {
                    key: normalize(&display_name),
                    display_name,
                    kind,
                    index,
                },
                policy,
            );
        }

        self.notify();
    }

    fn insert(&mut self, descriptor: InputDescriptor, policy: CollisionPolicy) {
        match self.entries.entry(descriptor.key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
            }
            Entry::Occupied(mut slot) => {
                let kept = match policy {
                    CollisionPolicy::FirstWins => slot.get().display_name.clone(),
                    CollisionPolicy::LastWins => descriptor.display_name.clone(),
                };
                warn!(
                    "inputs {:?} and {:?} both normalize to key '{}'; keeping {:?}",
                    slot.get().display_name,
                    descriptor.display_name,
                    descriptor.key,
                    kept
                );
                if policy == CollisionPolicy::LastWins {
                    slot.insert(descriptor);
                }
            }
        }
    }

    fn notify(&mut self) {
        let listing = self.list();
        for observer in self.observers.iter_mut() {
            observer(&listing);
        }
    }

    /// Observe listing changes.
    pub fn on_inputs_changed(&mut self, f: impl FnMut(&[InputListing]) + 'static) {
        self.observers.push(Box::new(f));
    }

    /// Resolve any casing of a name to its descriptor.
    pub fn lookup(&self, name: &str) -> Option<&InputDescriptor> {
        self.entries.get(normalize(name).as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn list(&self) -> Vec<InputListing> {
        self.entries
            .values()
            .map(|d| InputListing {
                name: d.display_name.clone(),
                kind: d.kind,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputDescriptor> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rebuilds performed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
