//! Output sinks
//!
//! A stack of in-memory sinks. The bottom sink accumulates the final
//! rendered output; capturing constructs (`#assign x>...`, `#compress`,
//! function calls) push a sink, run their body, and pop the captured
//! text. Poppers must restore the stack on error paths too, or captured
//! text would leak into the final output.

/// The output state of one invocation.
#[derive(Debug)]
pub struct OutputState {
    sinks: Vec<String>,
}

impl OutputState {
    /// A fresh state with the final-output sink.
    pub fn new() -> Self {
        OutputState {
            sinks: vec![String::new()],
        }
    }

    /// Append text to the innermost sink.
    pub fn write(&mut self, text: &str) {
        if let Some(sink) = self.sinks.last_mut() {
            sink.push_str(text);
        }
    }

    /// Start capturing.
    pub fn push_capture(&mut self) {
        self.sinks.push(String::new());
    }

    /// Stop capturing and take the captured text. Returns `None` when only
    /// the final-output sink remains, which means push/pop got unbalanced.
    pub fn pop_capture(&mut self) -> Option<String> {
        if self.sinks.len() > 1 {
            self.sinks.pop()
        } else {
            None
        }
    }

    /// The current capture depth, for restore checks.
    pub fn depth(&self) -> usize {
        self.sinks.len()
    }

    /// Take the final output. Anything still being captured is discarded.
    pub fn into_output(mut self) -> String {
        self.sinks.truncate(1);
        self.sinks.pop().unwrap_or_default()
    }
}

impl Default for OutputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_nests() {
        let mut out = OutputState::new();
        out.write("a");
        out.push_capture();
        out.write("b");
        out.push_capture();
        out.write("c");
        assert_eq!(out.pop_capture().as_deref(), Some("c"));
        assert_eq!(out.pop_capture().as_deref(), Some("b"));
        out.write("d");
        assert_eq!(out.into_output(), "ad");
    }

    #[test]
    fn test_bottom_sink_cannot_be_popped() {
        let mut out = OutputState::new();
        out.write("kept");
        assert_eq!(out.pop_capture(), None);
        assert_eq!(out.into_output(), "kept");
    }
}
