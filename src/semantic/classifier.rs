//! Statement classification: one parsed statement to its symbol records.
//!
//! Only statements that introduce a new namespace entry are accepted;
//! everything else fails with an [`AnalysisError::UnsupportedStatement`]
//! naming the offending kind. Imports naming several modules expand into
//! one record per imported name, each carrying synthetic single-name
//! import text as its content.

use rustc_hash::FxHashSet;
use rustpython_parser::ast::{Expr, Stmt, StmtImportFrom};
use tracing::debug;

use crate::base::DependencyPath;
use crate::error::{AnalysisError, AnalysisResult};
use crate::parser::node_source;
use crate::semantic::extractor::{DependencyExtractor, body_local_names, parameter_names};
use crate::semantic::lookup::ModuleSymbolLookup;
use crate::semantic::record::{SymbolKind, SymbolRecord};

/// The closed set of statement forms that introduce a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Function,
    AsyncFunction,
    Class,
    Assign,
    AnnAssign,
    Import,
    ImportFrom,
}

impl StatementKind {
    /// Classify a parsed statement, or `None` when the statement does not
    /// introduce a symbol.
    pub fn of(stmt: &Stmt) -> Option<Self> {
        match stmt {
            Stmt::FunctionDef(_) => Some(Self::Function),
            Stmt::AsyncFunctionDef(_) => Some(Self::AsyncFunction),
            Stmt::ClassDef(_) => Some(Self::Class),
            Stmt::Assign(_) => Some(Self::Assign),
            Stmt::AnnAssign(_) => Some(Self::AnnAssign),
            Stmt::Import(_) => Some(Self::Import),
            Stmt::ImportFrom(_) => Some(Self::ImportFrom),
            _ => None,
        }
    }

    /// The record kind this statement form produces.
    pub fn symbol_kind(self) -> SymbolKind {
        match self {
            Self::Function | Self::AsyncFunction => SymbolKind::Function,
            Self::Class => SymbolKind::Class,
            Self::Assign | Self::AnnAssign => SymbolKind::Variable,
            Self::Import => SymbolKind::Import,
            Self::ImportFrom => SymbolKind::ImportFrom,
        }
    }
}

/// Everything classification needs besides the statement itself.
pub(crate) struct ClassifyContext<'a> {
    /// The statement's own source text (content slicing, error snippets).
    pub code: &'a str,
    /// Ambient bound names: the configured built-in set, folded into the
    /// extractor's bottom frame.
    pub ambient: &'a FxHashSet<String>,
    /// Wildcard-import collaborator, when configured.
    pub lookup: Option<&'a dyn ModuleSymbolLookup>,
}

/// Classify one statement into its symbol records.
pub(crate) fn classify_stmt(
    stmt: &Stmt,
    ctx: &ClassifyContext<'_>,
) -> AnalysisResult<Vec<SymbolRecord>> {
    match stmt {
        Stmt::FunctionDef(node) => Ok(vec![function_record(
            node.name.as_str(),
            StatementKind::Function.symbol_kind(),
            &node.args,
            &node.body,
            &node.decorator_list,
            ctx,
        )]),
        Stmt::AsyncFunctionDef(node) => Ok(vec![function_record(
            node.name.as_str(),
            StatementKind::AsyncFunction.symbol_kind(),
            &node.args,
            &node.body,
            &node.decorator_list,
            ctx,
        )]),
        Stmt::ClassDef(node) => {
            let mut extractor = DependencyExtractor::new(ctx.ambient.iter().cloned());
            for decorator in &node.decorator_list {
                extractor.visit_expr(decorator);
            }
            for base in &node.bases {
                extractor.visit_expr(base);
            }
            for keyword in &node.keywords {
                extractor.visit_expr(&keyword.value);
            }
            extractor.scoped(body_local_names(&node.body), |ex| ex.visit_body(&node.body));
            let dependencies = drop_own_name(extractor.finish(), node.name.as_str());

            Ok(vec![SymbolRecord::new(
                node.name.as_str(),
                StatementKind::Class.symbol_kind(),
                dependencies,
                ctx.code.trim(),
            )])
        }
        Stmt::Assign(node) => {
            if node.targets.len() != 1 {
                return Err(AnalysisError::multi_target(
                    "assignment can only have one target variable",
                ));
            }
            let Expr::Name(target) = &node.targets[0] else {
                return Err(AnalysisError::multi_target(
                    "assignment target must be a plain variable name",
                ));
            };

            Ok(vec![variable_record(
                target.id.as_str(),
                &node.value,
                ctx,
            )])
        }
        Stmt::AnnAssign(node) => {
            let Expr::Name(target) = node.target.as_ref() else {
                return Err(AnalysisError::multi_target(
                    "annotated assignment target must be a plain variable name",
                ));
            };

            match &node.value {
                Some(value) => Ok(vec![variable_record(target.id.as_str(), value, ctx)]),
                // Annotation-only declaration: no value to read from.
                None => Ok(vec![SymbolRecord::new(
                    target.id.as_str(),
                    SymbolKind::Variable,
                    Vec::new(),
                    ctx.code.trim(),
                )]),
            }
        }
        Stmt::Import(node) => Ok(node
            .names
            .iter()
            .map(|alias| {
                let bound = alias.asname.as_ref().unwrap_or(&alias.name);
                let content = match &alias.asname {
                    Some(asname) => format!("import {} as {}", alias.name.as_str(), asname.as_str()),
                    None => format!("import {}", alias.name.as_str()),
                };
                SymbolRecord::new(bound.as_str(), SymbolKind::Import, Vec::new(), content)
            })
            .collect()),
        Stmt::ImportFrom(node) => import_from_records(node, ctx),
        other => Err(AnalysisError::unsupported(kind_label(other))),
    }
}

fn function_record(
    name: &str,
    kind: SymbolKind,
    args: &rustpython_parser::ast::Arguments,
    body: &[Stmt],
    decorators: &[Expr],
    ctx: &ClassifyContext<'_>,
) -> SymbolRecord {
    // Decorators and defaults evaluate at definition time in the enclosing
    // scope, so they see the ambient frame, not the parameters.
    let mut extractor = DependencyExtractor::new(ctx.ambient.iter().cloned());
    for decorator in decorators {
        extractor.visit_expr(decorator);
    }
    extractor.visit_defaults(args);

    let mut locals = parameter_names(args);
    locals.extend(body_local_names(body));
    extractor.scoped(locals, |ex| ex.visit_body(body));

    let dependencies = drop_own_name(extractor.finish(), name);
    debug!("[classify] function '{}' with {} dependencies", name, dependencies.len());
    SymbolRecord::new(name, kind, dependencies, ctx.code.trim())
}

fn variable_record(name: &str, value: &Expr, ctx: &ClassifyContext<'_>) -> SymbolRecord {
    let dependencies = drop_own_name(
        DependencyExtractor::extract_expr(value, ctx.ambient.iter().cloned()),
        name,
    );
    // A variable's canonical content is its right-hand side, not the
    // whole assignment.
    SymbolRecord::new(
        name,
        SymbolKind::Variable,
        dependencies,
        node_source(ctx.code, value).trim(),
    )
}

fn import_from_records(
    node: &StmtImportFrom,
    ctx: &ClassifyContext<'_>,
) -> AnalysisResult<Vec<SymbolRecord>> {
    let level = node.level.as_ref().map_or(0, |l| l.to_u32()) as usize;
    let module = node.module.as_ref().map(|m| m.as_str()).unwrap_or("");
    let origin = format!("{}{}", ".".repeat(level), module);

    if node.names.iter().any(|alias| alias.name.as_str() == "*") {
        return expand_wildcard(&origin, module, level, ctx);
    }

    Ok(node
        .names
        .iter()
        .map(|alias| {
            let bound = alias.asname.as_ref().unwrap_or(&alias.name);
            let content = match &alias.asname {
                Some(asname) => format!(
                    "from {} import {} as {}",
                    origin,
                    alias.name.as_str(),
                    asname.as_str()
                ),
                None => format!("from {} import {}", origin, alias.name.as_str()),
            };
            SymbolRecord::new(bound.as_str(), SymbolKind::ImportFrom, Vec::new(), content)
        })
        .collect())
}

/// Expand `from m import *` through the configured lookup into one record
/// per public name, each with synthetic single-name import text.
fn expand_wildcard(
    origin: &str,
    module: &str,
    level: usize,
    ctx: &ClassifyContext<'_>,
) -> AnalysisResult<Vec<SymbolRecord>> {
    let Some(lookup) = ctx.lookup else {
        return Err(AnalysisError::wildcard(
            origin,
            "no module symbol lookup is configured",
        ));
    };
    if level > 0 || module.is_empty() {
        return Err(AnalysisError::wildcard(
            origin,
            "relative wildcard imports cannot be resolved",
        ));
    }
    let Some(symbols) = lookup.public_symbols(module) else {
        return Err(AnalysisError::wildcard(
            module,
            "module is not known to the symbol lookup",
        ));
    };

    debug!("[classify] expanding `from {module} import *` into {} names", symbols.len());
    Ok(symbols
        .iter()
        .filter(|symbol| is_public_identifier(symbol))
        .map(|symbol| {
            SymbolRecord::new(
                symbol.clone(),
                SymbolKind::ImportFrom,
                Vec::new(),
                format!("from {module} import {symbol}"),
            )
        })
        .collect())
}

/// A record never lists its own name among its dependencies: a recursive
/// function or a rebinding `x = x + 1` is not an external edge. Only the
/// exact name is dropped; longer paths sharing the root are kept.
fn drop_own_name(mut dependencies: Vec<DependencyPath>, name: &str) -> Vec<DependencyPath> {
    dependencies.retain(|path| path.as_str() != name);
    dependencies
}

/// Valid public identifier: starts with an identifier-start character
/// (which excludes leading underscores) and continues with identifier
/// characters.
fn is_public_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

/// Human-readable label for an unsupported statement form, used in error
/// messages.
fn kind_label(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Expr(_) => "expression",
        Stmt::For(_) | Stmt::AsyncFor(_) => "for loop",
        Stmt::While(_) => "while loop",
        Stmt::If(_) => "if statement",
        Stmt::With(_) | Stmt::AsyncWith(_) => "with block",
        Stmt::Try(_) | Stmt::TryStar(_) => "try block",
        Stmt::Match(_) => "match statement",
        Stmt::Return(_) => "return",
        Stmt::Delete(_) => "del statement",
        Stmt::AugAssign(_) => "augmented assignment",
        Stmt::Raise(_) => "raise",
        Stmt::Assert(_) => "assert",
        Stmt::Global(_) => "global declaration",
        Stmt::Nonlocal(_) => "nonlocal declaration",
        Stmt::Pass(_) => "pass",
        Stmt::Break(_) => "break",
        Stmt::Continue(_) => "continue",
        _ => "statement",
    }
}
