//! Macro and function definition and invocation
//!
//! Entering a definition body gets a fresh local frame and hides the
//! caller's local and iteration contexts; `#nested` flips the view back
//! to the caller's while the nested content runs. Every save is restored
//! before an error is allowed to propagate, so a failing call never
//! leaves the environment leaning.

use std::sync::Arc;

use crate::ast::{Block, Expr, NodeKind};
use crate::context::EvalContext;
use crate::environment::{Environment, MacroInvocation};
use crate::error::EvalError;
use crate::eval::{eval_args, Evaluate};
use crate::value::{CallArgs, MacroKind, MacroParam, MacroValue, Value};
use crate::Result;

use super::{execute_block, Flow};

/// Bind a `#macro`/`#function` definition into the namespace.
pub(super) fn define(
    name: &str,
    params: &[MacroParam],
    kind: MacroKind,
    body: &Block,
    env: &mut Environment,
) {
    let def = MacroValue {
        name: name.to_string(),
        params: params.to_vec(),
        body: body.clone(),
        kind,
    };
    env.scopes.set_namespace(name, Value::Macro(Arc::new(def)));
}

/// Register every top-level definition before the template body runs, so
/// calls may textually precede their definitions.
pub(crate) fn register_top_level(root: &Block, env: &mut Environment) {
    for node in &root.nodes {
        if let NodeKind::MacroDef {
            name,
            params,
            kind,
            body,
        } = &node.kind
        {
            define(name, params, *kind, body, env);
        }
    }
}

pub(super) fn execute_user_call(
    target: &Expr,
    positional: &[Expr],
    named: &[(String, Expr)],
    loop_vars: &[String],
    body: &Option<Block>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let callee = target.eval(env, ctx)?;
    let args = eval_args(positional, named, env, ctx)?;
    match &callee {
        Value::Directive(directive) => {
            directive.execute(args, body.as_ref(), env, ctx)?;
            Ok(Flow::Normal)
        }
        Value::Macro(def) if def.kind == MacroKind::Macro => {
            let nested = body.clone().map(Arc::new);
            call_macro(Arc::clone(def), args, loop_vars.to_vec(), nested, env, ctx)?;
            Ok(Flow::Normal)
        }
        Value::Macro(def) => Err(EvalError::Uncallable {
            actual: format!(
                "function {} (functions are called in expressions, like ${{{}(...)}})",
                def.name, def.name
            ),
            location: None,
        }),
        other => Err(EvalError::Uncallable {
            actual: other.type_name(),
            location: None,
        }),
    }
}

fn call_macro(
    def: Arc<MacroValue>,
    args: CallArgs,
    loop_var_names: Vec<String>,
    nested_body: Option<Arc<Block>>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<()> {
    let flow = invoke(&def, args, loop_var_names, nested_body, env, ctx)?;
    match flow {
        Flow::Normal | Flow::Return(None) => Ok(()),
        Flow::Return(Some(_)) => Err(EvalError::Internal {
            message: format!("macro {} returned a value", def.name),
        }),
        Flow::Stop(message) => Err(stop_error(message)),
        Flow::Break | Flow::Continue => Err(escaped_signal(&def.name)),
    }
}

/// Call a `#function` from an expression: output is captured and
/// discarded, the `#return` value is the result.
pub(crate) fn call_function(
    def: Arc<MacroValue>,
    args: CallArgs,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value> {
    env.out.push_capture();
    let result = invoke(&def, args, Vec::new(), None, env, ctx);
    let _ = env.out.pop_capture();
    match result? {
        Flow::Return(Some(value)) => Ok(value),
        Flow::Return(None) | Flow::Normal => Err(EvalError::InvalidReference {
            blame: Some(format!("{}(...)", def.name)),
            tip: Some("the function ended without <#return value>"),
            location: None,
        }),
        Flow::Stop(message) => Err(stop_error(message)),
        Flow::Break | Flow::Continue => Err(escaped_signal(&def.name)),
    }
}

/// The shared call machinery: depth check, argument binding, the fresh
/// frame, and the visibility floors.
fn invoke(
    def: &Arc<MacroValue>,
    args: CallArgs,
    loop_var_names: Vec<String>,
    nested_body: Option<Arc<Block>>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    if env.calls.depth() >= ctx.max_call_depth {
        return Err(EvalError::CallDepthExceeded {
            limit: ctx.max_call_depth,
            location: None,
        });
    }
    let bindings = bind_params(def, args)?;

    let _span = tracing::trace_span!("call", name = %def.name).entered();
    env.calls.push(MacroInvocation {
        definition: Arc::clone(def),
        nested_body,
        loop_var_names,
        caller_frame: env.scopes.active_frame_index(),
        caller_local_floor: env.scopes.local_floor(),
        caller_iter_floor: env.iterations.floor(),
    });
    let prev_frame = env.scopes.push_frame();
    let local_floor = env.scopes.hide_local_contexts();
    let iter_floor = env.iterations.hide();

    let result = bind_and_run(def, bindings, env, ctx);

    env.iterations.restore_floor(iter_floor);
    env.scopes.restore_local_floor(local_floor);
    env.scopes.pop_frame(prev_frame);
    env.calls.pop();
    result
}

/// Match call-site arguments to the declared parameters. The value stays
/// `None` for parameters left to their defaults.
fn bind_params(def: &MacroValue, args: CallArgs) -> Result<Vec<(String, Option<Value>)>> {
    if args.positional.len() > def.params.len() {
        return Err(invalid_arguments(
            def,
            format!(
                "expected at most {} positional argument(s), got {}",
                def.params.len(),
                args.positional.len()
            ),
        ));
    }
    let mut provided: Vec<Option<Value>> = vec![None; def.params.len()];
    for (i, value) in args.positional.into_iter().enumerate() {
        provided[i] = Some(value);
    }
    for (name, value) in args.named {
        let Some(position) = def.params.iter().position(|p| p.name == name) else {
            return Err(invalid_arguments(
                def,
                format!("unknown parameter \"{name}\""),
            ));
        };
        if provided[position].is_some() {
            return Err(invalid_arguments(
                def,
                format!("parameter \"{name}\" given twice"),
            ));
        }
        provided[position] = Some(value);
    }
    Ok(def
        .params
        .iter()
        .map(|p| p.name.clone())
        .zip(provided)
        .collect())
}

/// Bind the parameters inside the fresh frame and run the body. Defaults
/// are evaluated here so they see the parameters bound before them.
fn bind_and_run(
    def: &MacroValue,
    bindings: Vec<(String, Option<Value>)>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    for (param, (name, provided)) in def.params.iter().zip(bindings) {
        let value = match provided {
            Some(value) => value,
            None => match &param.default {
                Some(default) => default.eval(env, ctx)?,
                None => {
                    return Err(invalid_arguments(
                        def,
                        format!("required parameter \"{name}\" was not given"),
                    ))
                }
            },
        };
        if !env.scopes.set_local(name, value) {
            return Err(EvalError::Internal {
                message: "call frame vanished while binding parameters".to_string(),
            });
        }
    }
    execute_block(&def.body, env, ctx)
}

pub(super) fn execute_nested(
    args: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Flow> {
    let Some(call) = env.calls.current() else {
        return Err(EvalError::Internal {
            message: "#nested outside a macro body".to_string(),
        });
    };
    let nested = call.nested_body.clone();
    let names = call.loop_var_names.clone();
    let caller_frame = call.caller_frame;
    let caller_local_floor = call.caller_local_floor;
    let caller_iter_floor = call.caller_iter_floor;

    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(arg.eval(env, ctx)?);
    }

    // A call without nested content makes #nested a no-op.
    let Some(body) = nested else {
        return Ok(Flow::Normal);
    };

    // Values beyond the declared loop variables are dropped.
    let bindings: Vec<(String, Value)> = names.into_iter().zip(values).collect();

    // Run the nested content with the caller's view: its frame active and
    // its visibility floors, plus one local context for the loop variables.
    let saved_frame = env.scopes.activate_frame(caller_frame);
    let saved_local_floor = env.scopes.local_floor();
    env.scopes.set_local_floor(caller_local_floor);
    let saved_iter_floor = env.iterations.floor();
    env.iterations.set_floor(caller_iter_floor);
    env.scopes.push_local_context(bindings);

    let result = execute_block(&body, env, ctx);

    env.scopes.pop_local_context();
    env.iterations.set_floor(saved_iter_floor);
    env.scopes.set_local_floor(saved_local_floor);
    env.scopes.activate_frame(saved_frame);
    result
}

fn invalid_arguments(def: &MacroValue, message: String) -> EvalError {
    EvalError::InvalidArguments {
        callee: def.name.clone(),
        message,
        location: None,
    }
}

fn stop_error(message: Option<String>) -> EvalError {
    EvalError::Stop {
        message: message.unwrap_or_else(|| "#stop was called".to_string()),
        location: None,
    }
}

fn escaped_signal(name: &str) -> EvalError {
    EvalError::Internal {
        message: format!("a loop signal escaped the body of {name}"),
    }
}
