//! Scope-aware free-variable extraction.
//!
//! A single depth-first walk over an expression or statement body that
//! records every name and attribute path read from outside the fragment.
//! A [`ScopeStack`](scope::ScopeStack) of cumulative frames tracks what is
//! locally bound at the current depth:
//!
//! - plain reads are recorded unless bound in the current frame
//! - attribute chains (`a.b.c`) record every prefix, suppressed only when
//!   the chain's *root* is bound; a call anywhere in the chain severs it
//! - walrus targets bind into the current frame after their value is
//!   visited, matching sequential evaluation order
//! - comprehensions, lambdas, nested functions, and nested classes each
//!   push a frame with the names they bind before their interesting
//!   sub-expressions are visited; decorators, default arguments, base
//!   classes, and keyword arguments are visited in the enclosing frame
//!   because that is where Python evaluates them
//!
//! The walk never mutates shared state; each extraction builds and returns
//! a fresh ordered, deduplicated path list.

mod scope;


use std::hash::BuildHasherDefault;

use indexmap::IndexSet;
use rustc_hash::FxHasher;
use rustpython_parser::ast::{
    Arguments, Comprehension, ExceptHandler, Expr, ExprAttribute, ExprContext, Pattern, Stmt,
};
use tracing::trace;

use crate::base::DependencyPath;
use scope::ScopeStack;

type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// Depth-first dependency collector over one fragment.
///
/// Create one per extraction, feed it expressions or statement bodies, and
/// call [`finish`](Self::finish) for the ordered, deduplicated result.
pub struct DependencyExtractor {
    scopes: ScopeStack,
    found: FxIndexSet<DependencyPath>,
}

impl DependencyExtractor {
    /// Start an extraction whose bottom frame holds `initially_bound`
    /// (caller-side parameters, body locals, filtered built-in names).
    /// Nothing in that set, and no path rooted at a name in that set, is
    /// ever emitted.
    pub fn new(initially_bound: impl IntoIterator<Item = String>) -> Self {
        Self {
            scopes: ScopeStack::new(initially_bound),
            found: FxIndexSet::default(),
        }
    }

    /// Extract the dependencies of a single expression.
    pub fn extract_expr(
        expr: &Expr,
        initially_bound: impl IntoIterator<Item = String>,
    ) -> Vec<DependencyPath> {
        let mut extractor = Self::new(initially_bound);
        extractor.visit_expr(expr);
        extractor.finish()
    }

    /// The ordered, first-occurrence-deduplicated dependency list.
    pub fn finish(self) -> Vec<DependencyPath> {
        self.found.into_iter().collect()
    }

    /// Run `f` with `names` bound in a fresh frame, popping it afterwards.
    pub(crate) fn scoped(
        &mut self,
        names: impl IntoIterator<Item = String>,
        f: impl FnOnce(&mut Self),
    ) {
        self.scopes.push_with(names);
        f(self);
        self.scopes.pop();
    }

    // ============================================================
    // Statements
    // ============================================================

    pub fn visit_body(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => {
                self.visit_function(&node.args, &node.body, &node.decorator_list);
            }
            Stmt::AsyncFunctionDef(node) => {
                self.visit_function(&node.args, &node.body, &node.decorator_list);
            }
            Stmt::ClassDef(node) => {
                for decorator in &node.decorator_list {
                    self.visit_expr(decorator);
                }
                for base in &node.bases {
                    self.visit_expr(base);
                }
                for keyword in &node.keywords {
                    self.visit_expr(&keyword.value);
                }
                self.scoped(body_local_names(&node.body), |this| {
                    this.visit_body(&node.body);
                });
            }
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Delete(node) => {
                for target in &node.targets {
                    self.visit_expr(target);
                }
            }
            Stmt::Assign(node) => {
                for target in &node.targets {
                    self.visit_expr(target);
                }
                self.visit_expr(&node.value);
            }
            Stmt::AugAssign(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.value);
            }
            Stmt::AnnAssign(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.annotation);
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::For(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.iter);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::AsyncFor(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.iter);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::While(node) => {
                self.visit_expr(&node.test);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::If(node) => {
                self.visit_expr(&node.test);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.visit_expr(vars);
                    }
                }
                self.visit_body(&node.body);
            }
            Stmt::AsyncWith(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.visit_expr(vars);
                    }
                }
                self.visit_body(&node.body);
            }
            Stmt::Match(node) => {
                self.visit_expr(&node.subject);
                for case in &node.cases {
                    self.visit_pattern(&case.pattern);
                    if let Some(guard) = &case.guard {
                        self.visit_expr(guard);
                    }
                    self.visit_body(&case.body);
                }
            }
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    self.visit_expr(exc);
                }
                if let Some(cause) = &node.cause {
                    self.visit_expr(cause);
                }
            }
            Stmt::Try(node) => {
                self.visit_body(&node.body);
                self.visit_handlers(&node.handlers);
                self.visit_body(&node.orelse);
                self.visit_body(&node.finalbody);
            }
            Stmt::TryStar(node) => {
                self.visit_body(&node.body);
                self.visit_handlers(&node.handlers);
                self.visit_body(&node.orelse);
                self.visit_body(&node.finalbody);
            }
            Stmt::Assert(node) => {
                self.visit_expr(&node.test);
                if let Some(msg) = &node.msg {
                    self.visit_expr(msg);
                }
            }
            Stmt::Expr(node) => self.visit_expr(&node.value),
            // Pass/Break/Continue/Global/Nonlocal and import statements
            // read no names.
            _ => {}
        }
    }

    // ============================================================
    // Expressions
    // ============================================================

    pub fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::BoolOp(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::NamedExpr(node) => {
                // Value first: the walrus target only exists after its
                // right-hand side has been evaluated.
                self.visit_expr(&node.value);
                let mut names = Vec::new();
                binding_target_names(&node.target, &mut names);
                for name in names {
                    trace!("[extract] walrus binds '{name}' at depth {}", self.scopes.depth());
                    self.scopes.bind(name);
                }
            }
            Expr::BinOp(node) => {
                self.visit_expr(&node.left);
                self.visit_expr(&node.right);
            }
            Expr::UnaryOp(node) => self.visit_expr(&node.operand),
            Expr::Lambda(node) => {
                self.visit_defaults(&node.args);
                self.scoped(parameter_names(&node.args), |this| {
                    this.visit_expr(&node.body);
                });
            }
            Expr::IfExp(node) => {
                self.visit_expr(&node.test);
                self.visit_expr(&node.body);
                self.visit_expr(&node.orelse);
            }
            Expr::Dict(node) => {
                for key in node.keys.iter().flatten() {
                    self.visit_expr(key);
                }
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::Set(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::ListComp(node) => {
                self.visit_comprehension(&node.generators, |this| this.visit_expr(&node.elt));
            }
            Expr::SetComp(node) => {
                self.visit_comprehension(&node.generators, |this| this.visit_expr(&node.elt));
            }
            Expr::DictComp(node) => {
                self.visit_comprehension(&node.generators, |this| {
                    this.visit_expr(&node.key);
                    this.visit_expr(&node.value);
                });
            }
            Expr::GeneratorExp(node) => {
                self.visit_comprehension(&node.generators, |this| this.visit_expr(&node.elt));
            }
            Expr::Await(node) => self.visit_expr(&node.value),
            Expr::Yield(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Expr::YieldFrom(node) => self.visit_expr(&node.value),
            Expr::Compare(node) => {
                self.visit_expr(&node.left);
                for comparator in &node.comparators {
                    self.visit_expr(comparator);
                }
            }
            Expr::Call(node) => {
                self.visit_expr(&node.func);
                for arg in &node.args {
                    self.visit_expr(arg);
                }
                for keyword in &node.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
            Expr::FormattedValue(node) => {
                self.visit_expr(&node.value);
                if let Some(spec) = &node.format_spec {
                    self.visit_expr(spec);
                }
            }
            Expr::JoinedStr(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::Constant(_) => {}
            Expr::Attribute(node) => self.visit_attribute(node),
            Expr::Subscript(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.slice);
            }
            Expr::Starred(node) => self.visit_expr(&node.value),
            Expr::Name(node) => {
                if matches!(node.ctx, ExprContext::Load) {
                    self.record_name(node.id.as_str());
                }
            }
            Expr::List(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Tuple(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Slice(node) => {
                if let Some(lower) = &node.lower {
                    self.visit_expr(lower);
                }
                if let Some(upper) = &node.upper {
                    self.visit_expr(upper);
                }
                if let Some(step) = &node.step {
                    self.visit_expr(step);
                }
            }
        }
    }

    fn visit_handlers(&mut self, handlers: &[ExceptHandler]) {
        for handler in handlers {
            let ExceptHandler::ExceptHandler(handler) = handler;
            if let Some(type_) = &handler.type_ {
                self.visit_expr(type_);
            }
            self.visit_body(&handler.body);
        }
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::MatchValue(node) => self.visit_expr(&node.value),
            Pattern::MatchSingleton(_) => {}
            Pattern::MatchSequence(node) => {
                for inner in &node.patterns {
                    self.visit_pattern(inner);
                }
            }
            Pattern::MatchMapping(node) => {
                for key in &node.keys {
                    self.visit_expr(key);
                }
                for inner in &node.patterns {
                    self.visit_pattern(inner);
                }
            }
            Pattern::MatchClass(node) => {
                self.visit_expr(&node.cls);
                for inner in &node.patterns {
                    self.visit_pattern(inner);
                }
                for inner in &node.kwd_patterns {
                    self.visit_pattern(inner);
                }
            }
            Pattern::MatchStar(_) => {}
            Pattern::MatchAs(node) => {
                if let Some(inner) = &node.pattern {
                    self.visit_pattern(inner);
                }
            }
            Pattern::MatchOr(node) => {
                for inner in &node.patterns {
                    self.visit_pattern(inner);
                }
            }
        }
    }

    // ============================================================
    // Scope-introducing helpers
    // ============================================================

    /// Nested `def`: decorators and defaults evaluate in the enclosing
    /// frame; the body sees parameters plus its immediate local names.
    fn visit_function(&mut self, args: &Arguments, body: &[Stmt], decorators: &[Expr]) {
        for decorator in decorators {
            self.visit_expr(decorator);
        }
        self.visit_defaults(args);

        let mut locals = parameter_names(args);
        locals.extend(body_local_names(body));
        self.scoped(locals, |this| this.visit_body(body));
    }

    /// All generator targets are seeded into one frame before any iterated
    /// collection or condition is visited, so later clauses see earlier
    /// targets and targets shadow outer names.
    fn visit_comprehension(
        &mut self,
        generators: &[Comprehension],
        visit_element: impl FnOnce(&mut Self),
    ) {
        let mut targets = Vec::new();
        for generator in generators {
            binding_target_names(&generator.target, &mut targets);
        }
        self.scoped(targets, |this| {
            for generator in generators {
                this.visit_expr(&generator.iter);
                for condition in &generator.ifs {
                    this.visit_expr(condition);
                }
            }
            visit_element(this);
        });
    }

    pub(crate) fn visit_defaults(&mut self, args: &Arguments) {
        for arg in args
            .posonlyargs
            .iter()
            .chain(&args.args)
            .chain(&args.kwonlyargs)
        {
            if let Some(default) = &arg.default {
                self.visit_expr(default);
            }
        }
    }

    // ============================================================
    // Recording
    // ============================================================

    fn record_name(&mut self, name: &str) {
        if self.scopes.contains(name) {
            return;
        }
        self.record_path(DependencyPath::new(name));
    }

    /// Record an attribute chain and every prefix, root first. The chain
    /// is suppressed as a whole when its root identifier is bound
    /// (root-only filtering; prefixes are never filtered independently).
    fn visit_attribute(&mut self, node: &ExprAttribute) {
        if matches!(node.ctx, ExprContext::Load) {
            if let Some(segments) = attribute_chain(node) {
                if !self.scopes.contains(segments[0]) {
                    let mut path = DependencyPath::new(segments[0]);
                    self.record_path(path.clone());
                    for segment in &segments[1..] {
                        path = path.child(segment);
                        self.record_path(path.clone());
                    }
                }
                // A pure chain has no other sub-expressions to visit.
                return;
            }
        }
        // Severed or non-read chain: the attribute itself names a runtime
        // value, but its base may still read names (call arguments,
        // subscript indices).
        self.visit_expr(&node.value);
    }

    fn record_path(&mut self, path: DependencyPath) {
        if self.found.insert(path.clone()) {
            trace!("[extract] record '{}' depth={}", path, self.scopes.depth());
        }
    }
}

// ============================================================
// Binding-set helpers (shared with the record builders)
// ============================================================

/// Every parameter name of a function or lambda signature.
pub(crate) fn parameter_names(args: &Arguments) -> Vec<String> {
    let mut names = Vec::new();
    for arg in args
        .posonlyargs
        .iter()
        .chain(&args.args)
        .chain(&args.kwonlyargs)
    {
        names.push(arg.def.arg.to_string());
    }
    if let Some(vararg) = &args.vararg {
        names.push(vararg.arg.to_string());
    }
    if let Some(kwarg) = &args.kwarg {
        names.push(kwarg.arg.to_string());
    }
    names
}

/// Names bound by the *immediate* statements of a function or class body:
/// plain and annotated assignment targets, nested function names, nested
/// class names. Deliberately does not recurse into control flow and does
/// not count loop or import targets, so reads of those still surface as
/// dependencies.
pub(crate) fn body_local_names(body: &[Stmt]) -> Vec<String> {
    let mut names = Vec::new();
    for stmt in body {
        match stmt {
            Stmt::FunctionDef(node) => names.push(node.name.to_string()),
            Stmt::AsyncFunctionDef(node) => names.push(node.name.to_string()),
            Stmt::ClassDef(node) => names.push(node.name.to_string()),
            Stmt::Assign(node) => {
                for target in &node.targets {
                    if let Expr::Name(name) = target {
                        names.push(name.id.to_string());
                    }
                }
            }
            Stmt::AnnAssign(node) => {
                if let Expr::Name(name) = node.target.as_ref() {
                    names.push(name.id.to_string());
                }
            }
            _ => {}
        }
    }
    names
}

/// Collect the identifiers a binding target introduces (plain names,
/// unpacking tuples/lists, starred elements).
fn binding_target_names(target: &Expr, names: &mut Vec<String>) {
    match target {
        Expr::Name(node) => names.push(node.id.to_string()),
        Expr::Tuple(node) => {
            for elt in &node.elts {
                binding_target_names(elt, names);
            }
        }
        Expr::List(node) => {
            for elt in &node.elts {
                binding_target_names(elt, names);
            }
        }
        Expr::Starred(node) => binding_target_names(&node.value, names),
        _ => {}
    }
}

/// The segments of a pure attribute chain (`a.b.c`), or `None` when any
/// link below the attribute is something other than a name or another
/// attribute (a call, subscript, or literal severs the chain).
fn attribute_chain(node: &ExprAttribute) -> Option<Vec<&str>> {
    let mut reversed = vec![node.attr.as_str()];
    let mut current = node.value.as_ref();
    loop {
        match current {
            Expr::Attribute(attr) => {
                reversed.push(attr.attr.as_str());
                current = attr.value.as_ref();
            }
            Expr::Name(name) => {
                reversed.push(name.id.as_str());
                reversed.reverse();
                return Some(reversed);
            }
            _ => return None,
        }
    }
}
