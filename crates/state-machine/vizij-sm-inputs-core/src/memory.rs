//! In-memory [`StateMachine`] for hosts without an engine binding and for tests.
//!
//! Inputs are plain records, deserializable from JSON:
//! `{ "name": "Speed", "type_key": 56, "number": 1.0 }`.
//! Trigger fires are counted instead of being consumed by an animation graph.

use serde::{Deserialize, Serialize};

use crate::machine::{InputKind, StateMachine, BOOLEAN_TYPE_KEY, NUMBER_TYPE_KEY, TRIGGER_TYPE_KEY};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryInput {
    pub name: String,
    pub type_key: u16,
    #[serde(default)]
    pub number: f32,
    #[serde(default)]
    pub boolean: bool,
    #[serde(skip)]
    pub fired: u32,
}

impl MemoryInput {
    pub fn new(name: impl Into<String>, type_key: u16) -> Self {
        Self {
            name: name.into(),
            type_key,
            number: 0.0,
            boolean: false,
            fired: 0,
        }
    }

    fn kind(&self) -> Option<InputKind> {
        InputKind::from_type_key(self.type_key)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStateMachine {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<MemoryInput>,
}

impl MemoryStateMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
        }
    }

    pub fn with_number(mut self, name: &str, value: f32) -> Self {
        let mut input = MemoryInput::new(name, NUMBER_TYPE_KEY);
        input.number = value;
        self.inputs.push(input);
        self
    }

    pub fn with_boolean(mut self, name: &str, value: bool) -> Self {
        let mut input = MemoryInput::new(name, BOOLEAN_TYPE_KEY);
        input.boolean = value;
        self.inputs.push(input);
        self
    }

    pub fn with_trigger(mut self, name: &str) -> Self {
        self.inputs.push(MemoryInput::new(name, TRIGGER_TYPE_KEY));
        self
    }

    /// Add an input with an arbitrary native type key (e.g. one the bridge does not support).
    pub fn with_input(mut self, name: &str, type_key: u16) -> Self {
        self.inputs.push(MemoryInput::new(name, type_key));
        self
    }

    /// Index of the first input with exactly this (raw) name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i.name == name)
    }

    /// How many times the trigger with this raw name has been fired.
    pub fn fire_count(&self, name: &str) -> u32 {
        self.inputs
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.fired)
            .unwrap_or(0)
    }

    fn typed(&self, index: usize, kind: InputKind) -> Option<&MemoryInput> {
        self.inputs.get(index).filter(|i| i.kind() == Some(kind))
    }

    fn typed_mut(&mut self, index: usize, kind: InputKind) -> Option<&mut MemoryInput> {
        self.inputs.get_mut(index).filter(|i| i.kind() == Some(kind))
    }
}

impl StateMachine for MemoryStateMachine {
    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn input_name(&self, index: usize) -> Option<&str> {
        self.inputs.get(index).map(|i| i.name.as_str())
    }

    fn input_type_key(&self, index: usize) -> Option<u16> {
        self.inputs.get(index).map(|i| i.type_key)
    }

    fn number(&self, index: usize) -> Option<f32> {
        self.typed(index, InputKind::Number).map(|i| i.number)
    }

    fn set_number(&mut self, index: usize, value: f32) {
        if let Some(input) = self.typed_mut(index, InputKind::Number) {
            input.number = value;
        }
    }

    fn boolean(&self, index: usize) -> Option<bool> {
        self.typed(index, InputKind::Boolean).map(|i| i.boolean)
    }

    fn set_boolean(&mut self, index: usize, value: bool) {
        if let Some(input) = self.typed_mut(index, InputKind::Boolean) {
            input.boolean = value;
        }
    }

    fn fire(&mut self, index: usize) {
        if let Some(input) = self.typed_mut(index, InputKind::Trigger) {
            input.fired = input.fired.wrapping_add(1);
        }
    }
}
