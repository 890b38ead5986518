//! Host-side contract: the property registration table the bridge consumes.
//!
//! Instead of reflecting over a host object at runtime, the host binding layer
//! declares its properties (with an optional change-notification signal) and its
//! plain signals up front. The bridge enumerates the table when wiring, reads and
//! writes through it during sync, and uses the dynamic storage to mirror values
//! of listener handles.

use std::fmt;

use hashbrown::HashMap;

use crate::ids::{SignalAllocator, SignalId};
use crate::Value;

/// A declared host property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    /// Signal raised when the property changes; `None` for non-notifying properties.
    pub notify: Option<SignalId>,
}

/// A declared host signal. Change notifications are signals too.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalDecl {
    pub id: SignalId,
    pub name: String,
}

/// Who performed a host property write.
///
/// Only [`WriteOrigin::Host`] writes are routed into the state machine. Writes the
/// sync pass performs on behalf of the state machine still notify host observers
/// but never loop back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteOrigin {
    Host,
    StateMachine,
}

/// Capability bundle supplied by the host binding layer.
pub trait HostObject {
    fn properties(&self) -> &[PropertyDecl];
    fn signals(&self) -> &[SignalDecl];

    fn read_property(&self, name: &str) -> Option<Value>;
    /// Store `value`; returns whether the stored value changed.
    fn write_property(&mut self, name: &str, value: Value, origin: WriteOrigin) -> bool;

    fn dynamic_property(&self, key: &str) -> Option<Value>;
    fn set_dynamic_property(&mut self, key: &str, value: Value);

    fn property_decl(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties().iter().find(|p| p.name == name)
    }

    fn signal_name(&self, id: SignalId) -> Option<&str> {
        self.signals()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    fn signal_id(&self, name: &str) -> Option<SignalId> {
        self.signals().iter().find(|s| s.name == name).map(|s| s.id)
    }
}

type Observer = Box<dyn FnMut(&Value, WriteOrigin)>;

/// Reference [`HostObject`]: values live in the table itself.
pub struct PropertyTable {
    ids: SignalAllocator,
    changed_suffix: String,
    properties: Vec<PropertyDecl>,
    signals: Vec<SignalDecl>,
    values: HashMap<String, Value>,
    dynamic: HashMap<String, Value>,
    observers: HashMap<String, Vec<Observer>>,
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyTable")
            .field("properties", &self.properties)
            .field("signals", &self.signals)
            .field("values", &self.values)
            .field("dynamic", &self.dynamic)
            .finish_non_exhaustive()
    }
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::with_changed_suffix("Changed")
    }

    /// Use another suffix for auto-declared notify signals. Must match
    /// [`crate::BridgeConfig::changed_suffix`] of the bridge that owns the table.
    pub fn with_changed_suffix(suffix: impl Into<String>) -> Self {
        Self {
            ids: SignalAllocator::new(),
            changed_suffix: suffix.into(),
            properties: Vec::new(),
            signals: Vec::new(),
            values: HashMap::new(),
            dynamic: HashMap::new(),
            observers: HashMap::new(),
        }
    }

    /// Declare a property. With `notify`, a `<name><suffix>` signal is declared
    /// alongside and its id returned.
    pub fn declare_property(
        &mut self,
        name: impl Into<String>,
        initial: Value,
        notify: bool,
    ) -> Option<SignalId> {
        let name = name.into();
        let notify = notify.then(|| {
            let signal = format!("{}{}", name, self.changed_suffix);
            self.declare_signal(signal)
        });
        self.values.insert(name.clone(), initial);
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.notify = notify,
            None => self.properties.push(PropertyDecl { name, notify }),
        }
        notify
    }

    /// Declare a plain signal (e.g. one named after a trigger input).
    pub fn declare_signal(&mut self, name: impl Into<String>) -> SignalId {
        let name = name.into();
        if let Some(id) = self.signal_id(&name) {
            return id;
        }
        let id = self.ids.alloc();
        self.signals.push(SignalDecl { id, name });
        id
    }

    /// Observe writes to a declared property.
    pub fn observe(&mut self, name: &str, f: impl FnMut(&Value, WriteOrigin) + 'static) {
        self.observers
            .entry(name.to_string())
            .or_default()
            .push(Box::new(f));
    }
}

impl HostObject for PropertyTable {
    fn properties(&self) -> &[PropertyDecl] {
        &self.properties
    }

    fn signals(&self) -> &[SignalDecl] {
        &self.signals
    }

    fn read_property(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn write_property(&mut self, name: &str, value: Value, origin: WriteOrigin) -> bool {
        let Some(slot) = self.values.get_mut(name) else {
            return false;
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        if let Some(observers) = self.observers.get_mut(name) {
            for observer in observers.iter_mut() {
                observer(slot, origin);
            }
        }
        true
    }

    fn dynamic_property(&self, key: &str) -> Option<Value> {
        self.dynamic.get(key).cloned()
    }

    fn set_dynamic_property(&mut self, key: &str, value: Value) {
        self.dynamic.insert(key.to_string(), value);
    }
}
