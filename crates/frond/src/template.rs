//! A validated, fold-optimized template and its processing entry point

use std::sync::Arc;

use crate::ast::validate::validate_template;
use crate::ast::{fold_constants, Block};
use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::{EvalError, ParseError};
use crate::exec::{self, Flow};
use crate::value::Value;

/// A template ready to process: its directive tree has passed structural
/// validation and its constant subexpressions are pre-evaluated.
#[derive(Debug, Clone)]
pub struct Template {
    name: Arc<str>,
    root: Block,
}

impl Template {
    /// Validate a directive tree and prepare it for processing.
    ///
    /// Rejects structurally misplaced directives (`#break` outside a loop
    /// or case, `#return` outside a definition, a non-final `#else`, and
    /// so on) and unknown builtin names, then folds constant
    /// subexpressions so repeated processing never re-evaluates them.
    ///
    /// Folding runs under `ctx` so that a custom arithmetic engine sees
    /// folded and unfolded expressions alike; pass the same context here
    /// and to [`Template::process`].
    pub fn new(
        name: impl Into<Arc<str>>,
        mut root: Block,
        ctx: &EvalContext,
    ) -> Result<Self, ParseError> {
        validate_template(&root)?;
        fold_constants(&mut root, ctx);
        Ok(Template {
            name: name.into(),
            root,
        })
    }

    /// The template name, used in error locations.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The validated directive tree.
    pub fn root(&self) -> &Block {
        &self.root
    }

    /// Process the template against a data model, producing the rendered
    /// output.
    ///
    /// Each call gets its own [`Environment`]; a template may be processed
    /// concurrently from many threads against one shared [`EvalContext`].
    pub fn process(&self, data_model: Value, ctx: &EvalContext) -> Result<String, EvalError> {
        let _span = tracing::debug_span!("process", template = %self.name).entered();
        let mut env = Environment::new(Arc::clone(&self.name), data_model, ctx);

        // Definitions are visible to the whole template, not just to the
        // nodes after them.
        exec::register_top_level(&self.root, &mut env);

        match exec::execute_block(&self.root, &mut env, ctx)? {
            Flow::Normal => Ok(env.out.into_output()),
            Flow::Stop(message) => Err(EvalError::Stop {
                message: message.unwrap_or_else(|| "#stop was called".to_string()),
                location: None,
            }),
            Flow::Return(_) => Err(EvalError::Internal {
                message: "#return reached the template top".to_string(),
            }),
            Flow::Break | Flow::Continue => Err(EvalError::Internal {
                message: "a loop signal reached the template top".to_string(),
            }),
        }
    }
}
