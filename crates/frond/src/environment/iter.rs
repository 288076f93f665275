//! Iteration contexts
//!
//! One context per running `#list`, innermost last. The context carries
//! the loop variable binding and the position facts the loop builtins
//! (`?index`, `?counter`, `?has_next`, `?is_first`, `?is_last`) and
//! `#sep` report. A visibility floor hides outer contexts while a macro
//! body runs, mirroring the local-context floor.

use crate::value::Value;

/// The state of one running loop.
#[derive(Debug)]
pub struct IterationContext {
    /// The loop variable name; `None` until a nested `#items` binds one
    pub var_name: Option<String>,
    /// The current item
    pub value: Value,
    /// Zero-based position
    pub index: usize,
    /// Whether another item follows
    pub has_next: bool,
    /// The iterated source, kept when the variable binding is deferred to
    /// a nested `#items`
    pub source: Option<Value>,
}

/// The stack of running loops.
#[derive(Debug, Default)]
pub struct IterationContextStack {
    stack: Vec<IterationContext>,
    /// Contexts below this index are invisible
    floor: usize,
}

impl IterationContextStack {
    /// Start a loop; the variable may be bound later by `#items`, which
    /// then iterates `source`.
    pub fn push(&mut self, var_name: Option<String>, source: Option<Value>) {
        self.stack.push(IterationContext {
            var_name,
            value: Value::Nothing,
            index: 0,
            has_next: false,
            source,
        });
    }

    /// End a loop.
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// The innermost context, for the owning loop to advance.
    pub fn top_mut(&mut self) -> Option<&mut IterationContext> {
        self.stack.last_mut()
    }

    /// The innermost *visible* context.
    pub fn innermost_visible(&self) -> Option<&IterationContext> {
        self.stack[self.floor..].last()
    }

    /// The innermost visible context whose loop variable is `name`.
    pub fn find_visible(&self, name: &str) -> Option<&IterationContext> {
        self.stack[self.floor..]
            .iter()
            .rev()
            .find(|c| c.var_name.as_deref() == Some(name))
    }

    /// Hide all current contexts (entering a macro body). Returns the old
    /// floor to restore.
    pub fn hide(&mut self) -> usize {
        std::mem::replace(&mut self.floor, self.stack.len())
    }

    /// Restore a visibility floor.
    pub fn restore_floor(&mut self, floor: usize) {
        self.floor = floor;
    }

    /// The current visibility floor.
    pub fn floor(&self) -> usize {
        self.floor
    }

    /// Set the visibility floor directly (re-entering the caller's view
    /// for nested content).
    pub fn set_floor(&mut self, floor: usize) {
        self.floor = floor;
    }
}
