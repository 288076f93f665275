//! Directive parameter introspection
//!
//! Tooling-facing: a uniform role/text description of each directive's
//! parameters, used by error reporters and debuggers that do not want to
//! match on [`NodeKind`] themselves.

use super::{Node, NodeKind};

/// The role a directive parameter plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRole {
    /// A boolean condition
    Condition,
    /// The iterated source of a loop
    ListSource,
    /// A variable name being bound
    TargetVariable,
    /// A value expression
    Value,
    /// The callee of a user-directive call
    Callee,
    /// One call argument
    Argument,
    /// A `#stop` or similar message
    Message,
    /// A `#setting` key
    SettingName,
}

impl Node {
    /// The node's parameters as role/text pairs, in declaration order.
    /// Structure-only nodes (text, `#break`, trim markers) have none.
    pub fn describe_params(&self) -> Vec<(ParamRole, String)> {
        match &self.kind {
            NodeKind::Text(_)
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Sep(_)
            | NodeKind::Compress(_)
            | NodeKind::Trim(_) => Vec::new(),
            NodeKind::Interpolation(expr) => {
                vec![(ParamRole::Value, expr.canonical_form())]
            }
            NodeKind::If(branches) => branches
                .iter()
                .filter_map(|b| b.cond.as_ref())
                .map(|c| (ParamRole::Condition, c.canonical_form()))
                .collect(),
            NodeKind::List(list) => {
                let mut params = vec![(ParamRole::ListSource, list.seq.canonical_form())];
                if let Some(item) = &list.item {
                    params.push((ParamRole::TargetVariable, item.clone()));
                }
                params
            }
            NodeKind::Items { item, .. } => {
                vec![(ParamRole::TargetVariable, item.clone())]
            }
            NodeKind::Switch { subject, cases, .. } => {
                let mut params = vec![(ParamRole::Value, subject.canonical_form())];
                params.extend(
                    cases
                        .iter()
                        .map(|c| (ParamRole::Value, c.matches.canonical_form())),
                );
                params
            }
            NodeKind::Assign { name, value, .. } => vec![
                (ParamRole::TargetVariable, name.clone()),
                (ParamRole::Value, value.canonical_form()),
            ],
            NodeKind::AssignBlock { name, .. } => {
                vec![(ParamRole::TargetVariable, name.clone())]
            }
            NodeKind::MacroDef { name, params, .. } => {
                let mut out = vec![(ParamRole::TargetVariable, name.clone())];
                out.extend(
                    params
                        .iter()
                        .map(|p| (ParamRole::Argument, p.name.clone())),
                );
                out
            }
            NodeKind::UserCall {
                target,
                positional,
                named,
                loop_vars,
                ..
            } => {
                let mut out = vec![(ParamRole::Callee, target.canonical_form())];
                out.extend(
                    positional
                        .iter()
                        .map(|a| (ParamRole::Argument, a.canonical_form())),
                );
                out.extend(
                    named
                        .iter()
                        .map(|(n, a)| (ParamRole::Argument, format!("{n}={}", a.canonical_form()))),
                );
                out.extend(
                    loop_vars
                        .iter()
                        .map(|v| (ParamRole::TargetVariable, v.clone())),
                );
                out
            }
            NodeKind::Nested { args } => args
                .iter()
                .map(|a| (ParamRole::Argument, a.canonical_form()))
                .collect(),
            NodeKind::Return { value } => value
                .iter()
                .map(|v| (ParamRole::Value, v.canonical_form()))
                .collect(),
            NodeKind::Stop { message } => message
                .iter()
                .map(|m| (ParamRole::Message, m.canonical_form()))
                .collect(),
            NodeKind::Setting { key, value } => vec![
                (ParamRole::SettingName, key.name().to_string()),
                (ParamRole::Value, value.canonical_form()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignScope, Expr};

    #[test]
    fn test_assign_params() {
        let node = Node::assign(AssignScope::Namespace, "x", Expr::int(1));
        assert_eq!(
            node.describe_params(),
            vec![
                (ParamRole::TargetVariable, "x".to_string()),
                (ParamRole::Value, "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_structure_only_nodes_have_no_params() {
        assert!(Node::text("hi").describe_params().is_empty());
        assert!(Node::synthetic(NodeKind::Break).describe_params().is_empty());
    }
}
