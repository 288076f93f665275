//! Variable scopes
//!
//! Globals, the current namespace, the data-model root, macro-local
//! frames, and the local-context stack for nested-content loop variables.
//! The *active* frame is the one name lookup and `#local` target; it is
//! not always the top frame, because `#nested` re-activates the caller's
//! frame while the callee's frame stays on the stack.

use indexmap::IndexMap;

use crate::value::Value;

/// One macro invocation's local variables.
#[derive(Debug, Default)]
pub struct Frame {
    vars: IndexMap<String, Value>,
}

/// One local context: name/value pairs visible below macro locals, used
/// for loop variables bound by `#nested` arguments.
#[derive(Debug)]
pub struct LocalContext {
    vars: Vec<(String, Value)>,
}

/// The variable scopes of one invocation.
#[derive(Debug)]
pub struct ScopeStack {
    globals: IndexMap<String, Value>,
    namespace: IndexMap<String, Value>,
    data_model: Value,
    frames: Vec<Frame>,
    active_frame: Option<usize>,
    local_contexts: Vec<LocalContext>,
    /// Local contexts below this index are hidden from lookup
    local_floor: usize,
}

impl ScopeStack {
    /// Scopes over the given data-model root.
    pub fn new(data_model: Value) -> Self {
        ScopeStack {
            globals: IndexMap::new(),
            namespace: IndexMap::new(),
            data_model,
            frames: Vec::new(),
            active_frame: None,
            local_contexts: Vec::new(),
            local_floor: 0,
        }
    }

    /// Resolve a bare identifier: visible local contexts innermost first,
    /// then the active frame, the namespace, the globals, and finally the
    /// data-model root.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        for lc in self.local_contexts[self.local_floor..].iter().rev() {
            if let Some((_, value)) = lc.vars.iter().rev().find(|(n, _)| n == name) {
                return Some(value.clone());
            }
        }
        if let Some(frame) = self.active_frame() {
            if let Some(value) = frame.vars.get(name) {
                return Some(value.clone());
            }
        }
        if let Some(value) = self.namespace.get(name) {
            return Some(value.clone());
        }
        if let Some(value) = self.globals.get(name) {
            return Some(value.clone());
        }
        self.data_model.get_key(name)
    }

    /// The data-model root.
    pub fn data_model(&self) -> &Value {
        &self.data_model
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment targets
    // ═══════════════════════════════════════════════════════════════════

    /// `#global`.
    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    /// `#assign`.
    pub fn set_namespace(&mut self, name: impl Into<String>, value: Value) {
        self.namespace.insert(name.into(), value);
    }

    /// `#local`; returns false when no frame is active.
    #[must_use]
    pub fn set_local(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self.active_frame {
            Some(idx) => {
                self.frames[idx].vars.insert(name.into(), value);
                true
            }
            None => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Macro frames
    // ═══════════════════════════════════════════════════════════════════

    /// Push a fresh frame and make it active. Returns the previously
    /// active frame index for the caller to restore.
    pub fn push_frame(&mut self) -> Option<usize> {
        self.frames.push(Frame::default());
        self.active_frame.replace(self.frames.len() - 1)
    }

    /// Pop the top frame and restore the given active-frame index.
    pub fn pop_frame(&mut self, previous_active: Option<usize>) {
        self.frames.pop();
        self.active_frame = previous_active;
    }

    /// Re-activate an existing frame (nested-content execution). Returns
    /// the index to restore afterwards.
    pub fn activate_frame(&mut self, frame: Option<usize>) -> Option<usize> {
        std::mem::replace(&mut self.active_frame, frame)
    }

    /// The currently active frame index.
    pub fn active_frame_index(&self) -> Option<usize> {
        self.active_frame
    }

    fn active_frame(&self) -> Option<&Frame> {
        self.active_frame.map(|i| &self.frames[i])
    }

    // ═══════════════════════════════════════════════════════════════════
    // Local contexts
    // ═══════════════════════════════════════════════════════════════════

    /// Push a local context.
    pub fn push_local_context(&mut self, vars: Vec<(String, Value)>) {
        self.local_contexts.push(LocalContext { vars });
    }

    /// Pop the top local context.
    pub fn pop_local_context(&mut self) {
        self.local_contexts.pop();
    }

    /// Hide all current local contexts (entering a macro body). Returns
    /// the old floor to restore.
    pub fn hide_local_contexts(&mut self) -> usize {
        std::mem::replace(&mut self.local_floor, self.local_contexts.len())
    }

    /// Restore a local-context visibility floor.
    pub fn restore_local_floor(&mut self, floor: usize) {
        self.local_floor = floor;
    }

    /// The current local-context visibility floor.
    pub fn local_floor(&self) -> usize {
        self.local_floor
    }

    /// Set the visibility floor directly (re-entering the caller's view
    /// for nested content).
    pub fn set_local_floor(&mut self, floor: usize) {
        self.local_floor = floor;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope snapshots for the special variables
    // ═══════════════════════════════════════════════════════════════════

    /// The globals as a hash.
    pub fn globals_hash(&self) -> Value {
        Value::hash(self.globals.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// The current namespace as a hash.
    pub fn namespace_hash(&self) -> Value {
        Value::hash(self.namespace.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// The active frame's locals as a hash; empty outside macro bodies.
    pub fn locals_hash(&self) -> Value {
        match self.active_frame() {
            Some(frame) => Value::hash(frame.vars.iter().map(|(k, v)| (k.clone(), v.clone()))),
            None => Value::empty_hash(),
        }
    }

    /// Every name visible from the current position, innermost binding
    /// winning, as a hash snapshot.
    pub fn vars_hash(&self) -> Value {
        let mut merged: IndexMap<String, Value> = IndexMap::new();
        if let Value::Hash(map) = &self.data_model {
            merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged.extend(self.globals.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged.extend(self.namespace.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(frame) = self.active_frame() {
            merged.extend(frame.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        for lc in &self.local_contexts[self.local_floor..] {
            merged.extend(lc.vars.iter().cloned());
        }
        Value::Hash(std::sync::Arc::new(merged))
    }
}
