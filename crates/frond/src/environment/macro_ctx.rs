//! Macro invocation records
//!
//! One record per macro or function call in progress. `#nested` needs the
//! caller's nested-content block plus enough of the caller's view (active
//! frame, visibility floors) to run that content as if the call had never
//! happened.

use std::sync::Arc;

use crate::ast::Block;
use crate::value::MacroValue;

/// One call in progress.
#[derive(Debug)]
pub struct MacroInvocation {
    /// The called definition
    pub definition: Arc<MacroValue>,
    /// The caller's nested content, if the call had a body
    pub nested_body: Option<Arc<Block>>,
    /// Loop-variable names the call declared for `#nested` arguments
    pub loop_var_names: Vec<String>,
    /// The frame that was active at the call site
    pub caller_frame: Option<usize>,
    /// The caller's local-context visibility floor
    pub caller_local_floor: usize,
    /// The caller's iteration-context visibility floor
    pub caller_iter_floor: usize,
}

/// The stack of calls in progress.
#[derive(Debug, Default)]
pub struct MacroCallStack {
    stack: Vec<MacroInvocation>,
}

impl MacroCallStack {
    /// Record a call.
    pub fn push(&mut self, invocation: MacroInvocation) {
        self.stack.push(invocation);
    }

    /// The call is done.
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// The innermost call in progress.
    pub fn current(&self) -> Option<&MacroInvocation> {
        self.stack.last()
    }

    /// How many calls are in progress, for the depth limit.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
