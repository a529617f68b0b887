// src/core/execution.rs

//! # Execution Context
//!
//! The binding table an execution controller threads through a run. It holds
//! arguments (`$1`, named) and block outputs side by side, tracks nesting for
//! Command block invocations and refuses recursive calls at runtime.

use crate::constants::DEFAULT_MAX_RECURSION_DEPTH;
use crate::core::arg_parser::ArgumentBindings;
use crate::core::substitution::{self, Bindings, SubstitutionError};
use serde_json::Value;
use thiserror::Error;

/// Runtime refusal to nest another command invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecursionError {
    /// The command is already running further up the call stack.
    #[error("{}", render_recursion(.command, .call_stack))]
    Recursive {
        /// The command that was about to start again.
        command: String,
        /// Stack at the time of the call, the repeated name last.
        call_stack: Vec<String>,
    },
    /// The nesting limit was reached.
    #[error("Maximum command nesting depth ({max_depth}) exceeded while calling '{command}'")]
    DepthExceeded { command: String, max_depth: usize },
}

impl RecursionError {
    /// The tail of the call stack that forms the cycle.
    pub fn cycle(&self) -> &[String] {
        match self {
            Self::Recursive { command, call_stack } => {
                let first = call_stack.iter().position(|c| c == command).unwrap_or(0);
                call_stack.get(first..).unwrap_or_default()
            }
            Self::DepthExceeded { .. } => &[],
        }
    }
}

fn render_recursion(command: &str, call_stack: &[String]) -> String {
    let first = call_stack.iter().position(|c| c == command).unwrap_or(0);
    let cycle = call_stack.get(first..).unwrap_or_default();

    let mut lines = vec![
        format!("Recursive command invocation detected: {command}"),
        String::new(),
        "Call stack:".to_string(),
    ];
    for (depth, name) in call_stack.iter().enumerate() {
        let marker = if name == command { "! " } else { "" };
        lines.push(format!("{}{}{}", "  ".repeat(depth), marker, name));
    }
    lines.push(String::new());
    lines.push(format!("Recursive cycle: {}", cycle.join(" → ")));
    lines.push(String::new());
    lines.push(
        "To fix this: Remove the recursive command block, or restructure your commands to avoid circular dependencies."
            .to_string(),
    );
    lines.join("\n")
}

/// Variables and call tracking for one command run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    /// Command this context runs.
    pub command_name: String,
    /// Variables set locally, arguments included.
    pub variables: Bindings,
    parent: Option<Box<ExecutionContext>>,
    /// Nesting level; the root context is 0.
    pub depth: usize,
    /// Deepest nesting allowed.
    pub max_depth: usize,
    call_stack: Vec<String>,
}

impl ExecutionContext {
    /// A root context for `command_name` seeded with its parsed arguments.
    pub fn new(command_name: impl Into<String>, arguments: ArgumentBindings) -> Self {
        Self {
            command_name: command_name.into(),
            variables: arguments.into_bindings(),
            parent: None,
            depth: 0,
            max_depth: DEFAULT_MAX_RECURSION_DEPTH,
            call_stack: Vec::new(),
        }
    }

    /// Overrides the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The inherited snapshot, when this is a child context.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// Commands currently being executed, outermost first.
    pub fn call_stack(&self) -> &[String] {
        &self.call_stack
    }

    /// Sets a variable in this context only.
    pub fn set_variable(&mut self, key: impl Into<String>, value: Value) {
        self.variables.insert(key.into(), value);
    }

    /// Looks up `key` locally, then through the parent chain.
    pub fn get_variable(&self, key: &str) -> Option<&Value> {
        self.variables
            .get(key)
            .or_else(|| self.parent.as_ref().and_then(|p| p.get_variable(key)))
    }

    /// `true` while another nested invocation stays within `max_depth`.
    pub fn can_nest_deeper(&self) -> bool {
        self.depth < self.max_depth
    }

    /// Records that `command_name` is starting. Refuses a name already on the stack.
    pub fn push_call_stack(&mut self, command_name: &str) -> Result<(), RecursionError> {
        if self.call_stack.iter().any(|c| c == command_name) {
            let mut call_stack = self.call_stack.clone();
            call_stack.push(command_name.to_string());
            return Err(RecursionError::Recursive {
                command: command_name.to_string(),
                call_stack,
            });
        }
        self.call_stack.push(command_name.to_string());
        Ok(())
    }

    /// Removes and returns the innermost command.
    pub fn pop_call_stack(&mut self) -> Option<String> {
        self.call_stack.pop()
    }

    /// Human readable chain, e.g. `deploy → run-tests`.
    pub fn call_chain(&self) -> String {
        if self.call_stack.is_empty() {
            "(no calls)".to_string()
        } else {
            self.call_stack.join(" → ")
        }
    }

    /// Builds the context for a nested Command block invocation.
    ///
    /// With `inherit` the child keeps a snapshot of this context as its parent,
    /// so unresolved lookups fall through to the caller's variables.
    pub fn child_context(
        &self,
        command_name: &str,
        arguments: ArgumentBindings,
        inherit: bool,
    ) -> Result<Self, RecursionError> {
        if !self.can_nest_deeper() {
            return Err(RecursionError::DepthExceeded {
                command: command_name.to_string(),
                max_depth: self.max_depth,
            });
        }

        let mut child = Self {
            command_name: command_name.to_string(),
            variables: arguments.into_bindings(),
            parent: inherit.then(|| Box::new(self.clone())),
            depth: self.depth + 1,
            max_depth: self.max_depth,
            call_stack: self.call_stack.clone(),
        };
        child.push_call_stack(command_name)?;
        log::debug!("Entering '{}' (depth {})", command_name, child.depth);
        Ok(child)
    }

    /// Copies the child's named outputs back into this context. Positional keys stay behind.
    pub fn merge_outputs(&mut self, child: &Self) {
        for (key, value) in &child.variables {
            if !key.starts_with('$') {
                self.variables.insert(key.clone(), value.clone());
            }
        }
    }

    /// All visible variables, parents first so that local values win.
    pub fn visible_variables(&self) -> Bindings {
        let mut merged = self
            .parent
            .as_ref()
            .map(|p| p.visible_variables())
            .unwrap_or_default();
        for (key, value) in &self.variables {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Combined substitution against this context's visible variables.
    pub fn substitute(&self, text: &str) -> Result<String, SubstitutionError> {
        let bindings = self.visible_variables();
        substitution::substitute_all(text, &bindings, &bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::arg_parser::bind_arguments;
    use crate::models::CommandArgument;
    use serde_json::json;

    fn root() -> ExecutionContext {
        let decls = vec![CommandArgument::required("file")];
        ExecutionContext::new("deploy", bind_arguments("app.py", &decls).unwrap())
    }

    #[test]
    fn test_root_context_holds_arguments() {
        let ctx = root();
        assert_eq!(ctx.get_variable("$1"), Some(&json!("app.py")));
        assert_eq!(ctx.get_variable("file"), Some(&json!("app.py")));
        assert_eq!(ctx.call_chain(), "(no calls)");
        assert_eq!(ctx.substitute("ship $1").unwrap(), "ship app.py");
    }

    #[test]
    fn test_context_without_bindings_leaves_positions_alone() {
        let ctx = ExecutionContext::new("report", ArgumentBindings::default());
        let awk = "awk '{print $1}' file.txt";
        assert_eq!(ctx.substitute(awk).unwrap(), awk);
    }

    #[test]
    fn test_push_refuses_recursion() {
        let mut ctx = root();
        ctx.push_call_stack("deploy").unwrap();
        ctx.push_call_stack("run-tests").unwrap();
        assert_eq!(ctx.call_chain(), "deploy → run-tests");

        let err = ctx.push_call_stack("deploy").unwrap_err();
        assert_eq!(err.cycle(), ["deploy", "run-tests", "deploy"]);
        let message = err.to_string();
        assert!(message.starts_with("Recursive command invocation detected: deploy"));
        assert!(message.contains("Recursive cycle: deploy → run-tests → deploy"));

        assert_eq!(ctx.pop_call_stack().as_deref(), Some("run-tests"));
        assert_eq!(ctx.call_stack(), ["deploy"]);
    }

    #[test]
    fn test_child_context_inherits_and_merges() {
        let mut ctx = root();
        ctx.push_call_stack("deploy").unwrap();
        ctx.set_variable("env", json!("prod"));

        let args = bind_arguments("fast", &[]).unwrap();
        let mut child = ctx.child_context("build", args, true).unwrap();
        assert_eq!(child.depth, 1);
        assert_eq!(child.call_chain(), "deploy → build");
        assert_eq!(child.get_variable("env"), Some(&json!("prod")));
        assert_eq!(child.get_variable("$1"), Some(&json!("fast")));
        assert_eq!(child.substitute("{{env}}-{{file}}").unwrap(), "prod-app.py");

        child.set_variable("artifact", json!({"path": "dist/app"}));
        ctx.merge_outputs(&child);
        assert_eq!(ctx.get_variable("artifact"), Some(&json!({"path": "dist/app"})));
        assert_eq!(ctx.get_variable("$1"), Some(&json!("app.py")));
    }

    #[test]
    fn test_child_without_inheritance_is_isolated() {
        let mut ctx = root();
        ctx.set_variable("env", json!("prod"));
        let child = ctx.child_context("lint", ArgumentBindings::default(), false).unwrap();
        assert!(child.parent().is_none());
        assert_eq!(child.get_variable("env"), None);
    }

    #[test]
    fn test_depth_limit() {
        let ctx = root().with_max_depth(1);
        let child = ctx.child_context("a", ArgumentBindings::default(), false).unwrap();
        assert!(!child.can_nest_deeper());
        assert!(matches!(
            child.child_context("b", ArgumentBindings::default(), false),
            Err(RecursionError::DepthExceeded { max_depth: 1, .. })
        ));
    }
}
