//! Canonical, position-free serialization of a parsed tree.
//!
//! The output is a compact prefix notation: a node tag, then its children
//! between `(` and `)`, separated by `,`. Absent optional children are
//! written as `-` so arity stays unambiguous. Ranges, line numbers, and
//! type comments never appear, which is the whole point.

use std::fmt::Write;

use rustpython_parser::ast::{
    Alias, Arg, ArgWithDefault, Arguments, Comprehension, ExceptHandler, Expr, Keyword, MatchCase,
    Pattern, Stmt, WithItem,
};

/// Serialize a module body.
pub(crate) fn dump_module(body: &[Stmt]) -> String {
    let mut out = String::new();
    out.push_str("Module");
    stmt_list(&mut out, body);
    out
}

fn stmt_list(out: &mut String, body: &[Stmt]) {
    out.push('[');
    for (i, stmt) in body.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        dump_stmt(out, stmt);
    }
    out.push(']');
}

fn expr_list(out: &mut String, exprs: &[Expr]) {
    out.push('[');
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        dump_expr(out, expr);
    }
    out.push(']');
}

fn opt_expr(out: &mut String, expr: Option<&Expr>) {
    match expr {
        Some(expr) => dump_expr(out, expr),
        None => out.push('-'),
    }
}

fn name(out: &mut String, text: &str) {
    out.push('\'');
    out.push_str(text);
    out.push('\'');
}

fn opt_name(out: &mut String, text: Option<&str>) {
    match text {
        Some(text) => name(out, text),
        None => out.push('-'),
    }
}

fn dump_stmt(out: &mut String, stmt: &Stmt) {
    match stmt {
        Stmt::FunctionDef(node) => {
            out.push_str("FunctionDef(");
            name(out, node.name.as_str());
            out.push(',');
            dump_arguments(out, &node.args);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(',');
            expr_list(out, &node.decorator_list);
            out.push(',');
            opt_expr(out, node.returns.as_deref());
            out.push(')');
        }
        Stmt::AsyncFunctionDef(node) => {
            out.push_str("AsyncFunctionDef(");
            name(out, node.name.as_str());
            out.push(',');
            dump_arguments(out, &node.args);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(',');
            expr_list(out, &node.decorator_list);
            out.push(',');
            opt_expr(out, node.returns.as_deref());
            out.push(')');
        }
        Stmt::ClassDef(node) => {
            out.push_str("ClassDef(");
            name(out, node.name.as_str());
            out.push(',');
            expr_list(out, &node.bases);
            out.push(',');
            keyword_list(out, &node.keywords);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(',');
            expr_list(out, &node.decorator_list);
            out.push(')');
        }
        Stmt::Return(node) => {
            out.push_str("Return(");
            opt_expr(out, node.value.as_deref());
            out.push(')');
        }
        Stmt::Delete(node) => {
            out.push_str("Delete(");
            expr_list(out, &node.targets);
            out.push(')');
        }
        Stmt::Assign(node) => {
            out.push_str("Assign(");
            expr_list(out, &node.targets);
            out.push(',');
            dump_expr(out, &node.value);
            out.push(')');
        }
        Stmt::AugAssign(node) => {
            let _ = write!(out, "AugAssign({:?},", node.op);
            dump_expr(out, &node.target);
            out.push(',');
            dump_expr(out, &node.value);
            out.push(')');
        }
        Stmt::AnnAssign(node) => {
            out.push_str("AnnAssign(");
            dump_expr(out, &node.target);
            out.push(',');
            dump_expr(out, &node.annotation);
            out.push(',');
            opt_expr(out, node.value.as_deref());
            out.push(',');
            out.push(if node.simple { '1' } else { '0' });
            out.push(')');
        }
        Stmt::For(node) => {
            out.push_str("For(");
            dump_expr(out, &node.target);
            out.push(',');
            dump_expr(out, &node.iter);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(',');
            stmt_list(out, &node.orelse);
            out.push(')');
        }
        Stmt::AsyncFor(node) => {
            out.push_str("AsyncFor(");
            dump_expr(out, &node.target);
            out.push(',');
            dump_expr(out, &node.iter);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(',');
            stmt_list(out, &node.orelse);
            out.push(')');
        }
        Stmt::While(node) => {
            out.push_str("While(");
            dump_expr(out, &node.test);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(',');
            stmt_list(out, &node.orelse);
            out.push(')');
        }
        Stmt::If(node) => {
            out.push_str("If(");
            dump_expr(out, &node.test);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(',');
            stmt_list(out, &node.orelse);
            out.push(')');
        }
        Stmt::With(node) => {
            out.push_str("With(");
            with_items(out, &node.items);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(')');
        }
        Stmt::AsyncWith(node) => {
            out.push_str("AsyncWith(");
            with_items(out, &node.items);
            out.push(',');
            stmt_list(out, &node.body);
            out.push(')');
        }
        Stmt::Match(node) => {
            out.push_str("Match(");
            dump_expr(out, &node.subject);
            out.push(',');
            out.push('[');
            for (i, case) in node.cases.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                dump_match_case(out, case);
            }
            out.push(']');
            out.push(')');
        }
        Stmt::Raise(node) => {
            out.push_str("Raise(");
            opt_expr(out, node.exc.as_deref());
            out.push(',');
            opt_expr(out, node.cause.as_deref());
            out.push(')');
        }
        Stmt::Try(node) => {
            out.push_str("Try(");
            stmt_list(out, &node.body);
            out.push(',');
            handler_list(out, &node.handlers);
            out.push(',');
            stmt_list(out, &node.orelse);
            out.push(',');
            stmt_list(out, &node.finalbody);
            out.push(')');
        }
        Stmt::TryStar(node) => {
            out.push_str("TryStar(");
            stmt_list(out, &node.body);
            out.push(',');
            handler_list(out, &node.handlers);
            out.push(',');
            stmt_list(out, &node.orelse);
            out.push(',');
            stmt_list(out, &node.finalbody);
            out.push(')');
        }
        Stmt::Assert(node) => {
            out.push_str("Assert(");
            dump_expr(out, &node.test);
            out.push(',');
            opt_expr(out, node.msg.as_deref());
            out.push(')');
        }
        Stmt::Import(node) => {
            out.push_str("Import(");
            alias_list(out, &node.names);
            out.push(')');
        }
        Stmt::ImportFrom(node) => {
            out.push_str("ImportFrom(");
            opt_name(out, node.module.as_ref().map(|m| m.as_str()));
            out.push(',');
            alias_list(out, &node.names);
            let level = node.level.as_ref().map_or(0, |l| l.to_u32());
            let _ = write!(out, ",{level})");
        }
        Stmt::Global(node) => {
            out.push_str("Global(");
            for (i, ident) in node.names.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                name(out, ident.as_str());
            }
            out.push(')');
        }
        Stmt::Nonlocal(node) => {
            out.push_str("Nonlocal(");
            for (i, ident) in node.names.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                name(out, ident.as_str());
            }
            out.push(')');
        }
        Stmt::Expr(node) => {
            out.push_str("Expr(");
            dump_expr(out, &node.value);
            out.push(')');
        }
        Stmt::Pass(_) => out.push_str("Pass"),
        Stmt::Break(_) => out.push_str("Break"),
        Stmt::Continue(_) => out.push_str("Continue"),
        _ => out.push_str("OtherStmt"),
    }
}

fn dump_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::BoolOp(node) => {
            let _ = write!(out, "BoolOp({:?},", node.op);
            expr_list(out, &node.values);
            out.push(')');
        }
        Expr::NamedExpr(node) => {
            out.push_str("NamedExpr(");
            dump_expr(out, &node.target);
            out.push(',');
            dump_expr(out, &node.value);
            out.push(')');
        }
        Expr::BinOp(node) => {
            let _ = write!(out, "BinOp({:?},", node.op);
            dump_expr(out, &node.left);
            out.push(',');
            dump_expr(out, &node.right);
            out.push(')');
        }
        Expr::UnaryOp(node) => {
            let _ = write!(out, "UnaryOp({:?},", node.op);
            dump_expr(out, &node.operand);
            out.push(')');
        }
        Expr::Lambda(node) => {
            out.push_str("Lambda(");
            dump_arguments(out, &node.args);
            out.push(',');
            dump_expr(out, &node.body);
            out.push(')');
        }
        Expr::IfExp(node) => {
            out.push_str("IfExp(");
            dump_expr(out, &node.test);
            out.push(',');
            dump_expr(out, &node.body);
            out.push(',');
            dump_expr(out, &node.orelse);
            out.push(')');
        }
        Expr::Dict(node) => {
            out.push_str("Dict([");
            for (i, key) in node.keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                opt_expr(out, key.as_ref());
            }
            out.push_str("],");
            expr_list(out, &node.values);
            out.push(')');
        }
        Expr::Set(node) => {
            out.push_str("Set(");
            expr_list(out, &node.elts);
            out.push(')');
        }
        Expr::ListComp(node) => {
            out.push_str("ListComp(");
            dump_expr(out, &node.elt);
            out.push(',');
            generator_list(out, &node.generators);
            out.push(')');
        }
        Expr::SetComp(node) => {
            out.push_str("SetComp(");
            dump_expr(out, &node.elt);
            out.push(',');
            generator_list(out, &node.generators);
            out.push(')');
        }
        Expr::DictComp(node) => {
            out.push_str("DictComp(");
            dump_expr(out, &node.key);
            out.push(',');
            dump_expr(out, &node.value);
            out.push(',');
            generator_list(out, &node.generators);
            out.push(')');
        }
        Expr::GeneratorExp(node) => {
            out.push_str("GeneratorExp(");
            dump_expr(out, &node.elt);
            out.push(',');
            generator_list(out, &node.generators);
            out.push(')');
        }
        Expr::Await(node) => {
            out.push_str("Await(");
            dump_expr(out, &node.value);
            out.push(')');
        }
        Expr::Yield(node) => {
            out.push_str("Yield(");
            opt_expr(out, node.value.as_deref());
            out.push(')');
        }
        Expr::YieldFrom(node) => {
            out.push_str("YieldFrom(");
            dump_expr(out, &node.value);
            out.push(')');
        }
        Expr::Compare(node) => {
            out.push_str("Compare(");
            dump_expr(out, &node.left);
            let _ = write!(out, ",{:?},", node.ops);
            expr_list(out, &node.comparators);
            out.push(')');
        }
        Expr::Call(node) => {
            out.push_str("Call(");
            dump_expr(out, &node.func);
            out.push(',');
            expr_list(out, &node.args);
            out.push(',');
            keyword_list(out, &node.keywords);
            out.push(')');
        }
        Expr::FormattedValue(node) => {
            out.push_str("FormattedValue(");
            dump_expr(out, &node.value);
            let _ = write!(out, ",{:?},", node.conversion);
            opt_expr(out, node.format_spec.as_deref());
            out.push(')');
        }
        Expr::JoinedStr(node) => {
            out.push_str("JoinedStr(");
            expr_list(out, &node.values);
            out.push(')');
        }
        Expr::Constant(node) => {
            let _ = write!(out, "Constant({:?})", node.value);
        }
        Expr::Attribute(node) => {
            out.push_str("Attribute(");
            dump_expr(out, &node.value);
            out.push(',');
            name(out, node.attr.as_str());
            let _ = write!(out, ",{:?})", node.ctx);
        }
        Expr::Subscript(node) => {
            out.push_str("Subscript(");
            dump_expr(out, &node.value);
            out.push(',');
            dump_expr(out, &node.slice);
            let _ = write!(out, ",{:?})", node.ctx);
        }
        Expr::Starred(node) => {
            out.push_str("Starred(");
            dump_expr(out, &node.value);
            let _ = write!(out, ",{:?})", node.ctx);
        }
        Expr::Name(node) => {
            out.push_str("Name(");
            name(out, node.id.as_str());
            let _ = write!(out, ",{:?})", node.ctx);
        }
        Expr::List(node) => {
            out.push_str("List(");
            expr_list(out, &node.elts);
            let _ = write!(out, ",{:?})", node.ctx);
        }
        Expr::Tuple(node) => {
            out.push_str("Tuple(");
            expr_list(out, &node.elts);
            let _ = write!(out, ",{:?})", node.ctx);
        }
        Expr::Slice(node) => {
            out.push_str("Slice(");
            opt_expr(out, node.lower.as_deref());
            out.push(',');
            opt_expr(out, node.upper.as_deref());
            out.push(',');
            opt_expr(out, node.step.as_deref());
            out.push(')');
        }
    }
}

fn dump_arguments(out: &mut String, args: &Arguments) {
    out.push_str("arguments(");
    arg_with_default_list(out, &args.posonlyargs);
    out.push(',');
    arg_with_default_list(out, &args.args);
    out.push(',');
    opt_arg(out, args.vararg.as_deref());
    out.push(',');
    arg_with_default_list(out, &args.kwonlyargs);
    out.push(',');
    opt_arg(out, args.kwarg.as_deref());
    out.push(')');
}

fn arg_with_default_list(out: &mut String, args: &[ArgWithDefault]) {
    out.push('[');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        dump_arg(out, &arg.def);
        out.push('=');
        opt_expr(out, arg.default.as_deref());
    }
    out.push(']');
}

fn dump_arg(out: &mut String, arg: &Arg) {
    out.push_str("arg(");
    name(out, arg.arg.as_str());
    out.push(',');
    opt_expr(out, arg.annotation.as_deref());
    out.push(')');
}

fn opt_arg(out: &mut String, arg: Option<&Arg>) {
    match arg {
        Some(arg) => dump_arg(out, arg),
        None => out.push('-'),
    }
}

fn keyword_list(out: &mut String, keywords: &[Keyword]) {
    out.push('[');
    for (i, keyword) in keywords.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("keyword(");
        opt_name(out, keyword.arg.as_ref().map(|a| a.as_str()));
        out.push(',');
        dump_expr(out, &keyword.value);
        out.push(')');
    }
    out.push(']');
}

fn generator_list(out: &mut String, generators: &[Comprehension]) {
    out.push('[');
    for (i, generator) in generators.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("comprehension(");
        dump_expr(out, &generator.target);
        out.push(',');
        dump_expr(out, &generator.iter);
        out.push(',');
        expr_list(out, &generator.ifs);
        out.push(',');
        out.push(if generator.is_async { '1' } else { '0' });
        out.push(')');
    }
    out.push(']');
}

fn alias_list(out: &mut String, aliases: &[Alias]) {
    out.push('[');
    for (i, alias) in aliases.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("alias(");
        name(out, alias.name.as_str());
        out.push(',');
        opt_name(out, alias.asname.as_ref().map(|a| a.as_str()));
        out.push(')');
    }
    out.push(']');
}

fn with_items(out: &mut String, items: &[WithItem]) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("withitem(");
        dump_expr(out, &item.context_expr);
        out.push(',');
        opt_expr(out, item.optional_vars.as_deref());
        out.push(')');
    }
    out.push(']');
}

fn handler_list(out: &mut String, handlers: &[ExceptHandler]) {
    out.push('[');
    for (i, handler) in handlers.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let ExceptHandler::ExceptHandler(handler) = handler;
        out.push_str("excepthandler(");
        opt_expr(out, handler.type_.as_deref());
        out.push(',');
        opt_name(out, handler.name.as_ref().map(|n| n.as_str()));
        out.push(',');
        stmt_list(out, &handler.body);
        out.push(')');
    }
    out.push(']');
}

fn dump_match_case(out: &mut String, case: &MatchCase) {
    out.push_str("match_case(");
    dump_pattern(out, &case.pattern);
    out.push(',');
    opt_expr(out, case.guard.as_deref());
    out.push(',');
    stmt_list(out, &case.body);
    out.push(')');
}

fn dump_pattern(out: &mut String, pattern: &Pattern) {
    match pattern {
        Pattern::MatchValue(node) => {
            out.push_str("MatchValue(");
            dump_expr(out, &node.value);
            out.push(')');
        }
        Pattern::MatchSingleton(node) => {
            let _ = write!(out, "MatchSingleton({:?})", node.value);
        }
        Pattern::MatchSequence(node) => {
            out.push_str("MatchSequence(");
            pattern_list(out, &node.patterns);
            out.push(')');
        }
        Pattern::MatchMapping(node) => {
            out.push_str("MatchMapping(");
            expr_list(out, &node.keys);
            out.push(',');
            pattern_list(out, &node.patterns);
            out.push(',');
            opt_name(out, node.rest.as_ref().map(|r| r.as_str()));
            out.push(')');
        }
        Pattern::MatchClass(node) => {
            out.push_str("MatchClass(");
            dump_expr(out, &node.cls);
            out.push(',');
            pattern_list(out, &node.patterns);
            out.push(',');
            out.push('[');
            for (i, attr) in node.kwd_attrs.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                name(out, attr.as_str());
            }
            out.push_str("],");
            pattern_list(out, &node.kwd_patterns);
            out.push(')');
        }
        Pattern::MatchStar(node) => {
            out.push_str("MatchStar(");
            opt_name(out, node.name.as_ref().map(|n| n.as_str()));
            out.push(')');
        }
        Pattern::MatchAs(node) => {
            out.push_str("MatchAs(");
            match &node.pattern {
                Some(inner) => dump_pattern(out, inner),
                None => out.push('-'),
            }
            out.push(',');
            opt_name(out, node.name.as_ref().map(|n| n.as_str()));
            out.push(')');
        }
        Pattern::MatchOr(node) => {
            out.push_str("MatchOr(");
            pattern_list(out, &node.patterns);
            out.push(')');
        }
    }
}

fn pattern_list(out: &mut String, patterns: &[Pattern]) {
    out.push('[');
    for (i, pattern) in patterns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        dump_pattern(out, pattern);
    }
    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_block;

    #[test]
    fn dump_is_position_free() {
        let a = dump_module(&parse_block("x = 1").unwrap());
        let b = dump_module(&parse_block("\n\nx   =   1").unwrap());
        assert_eq!(a, b);
        assert!(a.starts_with("Module["));
    }

    #[test]
    fn dump_distinguishes_targets() {
        let a = dump_module(&parse_block("x = 1").unwrap());
        let b = dump_module(&parse_block("y = 1").unwrap());
        assert_ne!(a, b);
    }
}
