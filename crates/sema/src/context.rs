//! Per-node attribute store
//!
//! Every node owns a [`Context`] holding facts computed out of band (source
//! spans, the node a clone was derived from, caller-defined annotations).
//! Entries are keyed by their Rust type, optionally paired with a name so
//! that several values of the same type can coexist.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::common::{NodeId, SemaError, SemaResult};

/// Name half of a named context entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextKey(String);

impl ContextKey {
    pub fn new(name: impl Into<String>) -> SemaResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SemaError::InvalidContextKey);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of the node a cloned node was first derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin(pub NodeId);

#[derive(Clone, PartialEq, Eq, Hash)]
struct Slot {
    name: Option<ContextKey>,
    type_id: TypeId,
}

impl Slot {
    fn of<T: Any>(name: Option<&ContextKey>) -> Self {
        Self {
            name: name.cloned(),
            type_id: TypeId::of::<T>(),
        }
    }
}

#[derive(Clone)]
struct Entry {
    type_name: &'static str,
    value: Rc<dyn Any>,
}

impl Entry {
    fn new<T: Any>(value: T) -> Self {
        Self {
            type_name: short_type_name::<T>(),
            value: Rc::new(value),
        }
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Heterogeneous attribute store attached to a single node
#[derive(Clone)]
pub struct Context {
    node: NodeId,
    entries: HashMap<Slot, Entry>,
}

impl Context {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            entries: HashMap::new(),
        }
    }

    /// A context for `node` carrying every entry of `self`, plus an
    /// [`Origin`] pointing at the first node in the derivation chain.
    pub fn derive(&self, node: NodeId) -> Self {
        let mut context = Self::new(node);
        context.put_all(self);
        context.put_if_absent(Origin(self.node));
        context
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn put<T: Any>(&mut self, value: T) -> &mut Self {
        self.entries.insert(Slot::of::<T>(None), Entry::new(value));
        self
    }

    pub fn put_named<T: Any>(&mut self, key: &ContextKey, value: T) -> &mut Self {
        self.entries.insert(Slot::of::<T>(Some(key)), Entry::new(value));
        self
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.lookup(&Slot::of::<T>(None))
    }

    pub fn get_named<T: Any>(&self, key: &ContextKey) -> Option<&T> {
        self.lookup(&Slot::of::<T>(Some(key)))
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&Slot::of::<T>(None))
    }

    pub fn contains_named<T: Any>(&self, key: &ContextKey) -> bool {
        self.entries.contains_key(&Slot::of::<T>(Some(key)))
    }

    /// Stores `value` unless an entry of type `T` exists; returns whether it
    /// was stored.
    pub fn put_if_absent<T: Any>(&mut self, value: T) -> bool {
        let slot = Slot::of::<T>(None);
        if self.entries.contains_key(&slot) {
            return false;
        }
        self.entries.insert(slot, Entry::new(value));
        true
    }

    pub fn put_if_absent_and_get<T: Any>(&mut self, value: T) -> SemaResult<&T> {
        self.put_if_absent(value);
        self.require::<T>()
    }

    /// Fails with a structural error when the entry is absent, which means
    /// the pass producing it has not run.
    pub fn require<T: Any>(&self) -> SemaResult<&T> {
        self.get::<T>()
            .ok_or_else(|| SemaError::missing_context(self.node, short_type_name::<T>()))
    }

    pub fn require_named<T: Any>(&self, key: &ContextKey) -> SemaResult<&T> {
        self.get_named::<T>(key).ok_or_else(|| {
            SemaError::missing_context(
                self.node,
                format!("{}:{}", key, short_type_name::<T>()),
            )
        })
    }

    /// Copies the unnamed `T` entry of `other`, if any
    pub fn copy_from<T: Any>(&mut self, other: &Context) -> &mut Self {
        let slot = Slot::of::<T>(None);
        if let Some(entry) = other.entries.get(&slot) {
            self.entries.insert(slot, entry.clone());
        }
        self
    }

    pub fn put_all(&mut self, other: &Context) -> &mut Self {
        for (slot, entry) in &other.entries {
            self.entries.insert(slot.clone(), entry.clone());
        }
        self
    }

    fn lookup<T: Any>(&self, slot: &Slot) -> Option<&T> {
        self.entries
            .get(slot)
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .map(|(slot, entry)| match &slot.name {
                Some(name) => format!("{}:{}", name, entry.type_name),
                None => entry.type_name.to_string(),
            })
            .collect();
        keys.sort();
        f.debug_struct("Context")
            .field("node", &self.node)
            .field("keys", &keys)
            .finish()
    }
}
