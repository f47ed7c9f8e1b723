//! file: core/src/ast/stmt.rs
//! description: parsing helpers for functions and statements.
//!
//! Converts `function` and `statement` pairs produced by `RulesParser` into
//! `Function`/`Stmt` nodes. Every node carries the `Location`/`Span` of the
//! pair it came from so later passes can point diagnostics at source text.
//!
use crate::ast::rules::{self, Pair, Rule};
use crate::ast::{Expr, Function, Stmt, StmtKind};
use crate::error::FlatlineErrorExt;
use crate::script::Script;

use super::expr::parse_expression_rule;

/// Parse a `function` rule: `fn name(params) { ... }`.
pub(crate) fn parse_function_rule(pair: Pair<'_>, script: &Script) -> Result<Function, Box<dyn FlatlineErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    rules::skip_keyword(&mut inner_pairs, Rule::kw_fn, &location, &span)?;

    let name = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?.as_str().to_string();

    let mut params = Vec::new();
    let mut next = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    if next.as_rule() == Rule::params {
        params = next.into_inner().map(|p| p.as_str().to_string()).collect();
        next = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    }

    if next.as_rule() != Rule::block {
        return Err(rules::unexpected_rule(&next, "flatline.stmt.parse_function_rule", &location, &span));
    }
    let body = parse_block_rule(next, script)?;

    Ok(Function { name, params, body, location, span })
}

pub(crate) fn parse_statement_rule(pair: Pair<'_>, script: &Script) -> Result<Stmt, Box<dyn FlatlineErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let next_rule = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match next_rule.as_rule() {
        Rule::block => parse_block_rule(next_rule, script),
        Rule::if_stmt => parse_if_rule(next_rule, script),
        Rule::while_stmt => parse_while_rule(next_rule, script),
        Rule::return_stmt => parse_return_rule(next_rule, script),
        Rule::break_stmt => {
            Ok(Stmt::new(StmtKind::Break { enclosing_loop: None }, location, span))
        }
        Rule::expr_stmt => {
            let (mut expr_pairs, location, span) = rules::get_data_from_rule(&next_rule, script);
            let expr = parse_expression_rule(rules::fetch_next_pair(&mut expr_pairs, &location, &span)?, script)?;
            Ok(Stmt::new(StmtKind::Expr { expr }, location, span))
        }
        _ => Err(rules::unexpected_rule(&next_rule, "flatline.stmt.parse_statement_rule", &location, &span)),
    }
}

fn parse_block_rule(pair: Pair<'_>, script: &Script) -> Result<Stmt, Box<dyn FlatlineErrorExt>> {
    let (inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let statements = inner_pairs
        .map(|p| parse_statement_rule(p, script))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Stmt::new(StmtKind::Block { statements }, location, span))
}

fn parse_if_rule(pair: Pair<'_>, script: &Script) -> Result<Stmt, Box<dyn FlatlineErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    rules::skip_keyword(&mut inner_pairs, Rule::kw_if, &location, &span)?;

    let condition = parse_expression_rule(rules::fetch_next_pair(&mut inner_pairs, &location, &span)?, script)?;
    let then_branch = parse_statement_rule(rules::fetch_next_pair(&mut inner_pairs, &location, &span)?, script)?;

    let else_branch = match inner_pairs.next() {
        Some(else_pair) => {
            let (mut else_pairs, else_location, else_span) = rules::get_data_from_rule(&else_pair, script);
            rules::skip_keyword(&mut else_pairs, Rule::kw_else, &else_location, &else_span)?;
            let stmt_pair = rules::fetch_next_pair(&mut else_pairs, &else_location, &else_span)?;
            Some(Box::new(parse_statement_rule(stmt_pair, script)?))
        }
        None => None,
    };

    Ok(Stmt::new(
        StmtKind::If { condition, then_branch: Box::new(then_branch), else_branch },
        location,
        span,
    ))
}

fn parse_while_rule(pair: Pair<'_>, script: &Script) -> Result<Stmt, Box<dyn FlatlineErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    rules::skip_keyword(&mut inner_pairs, Rule::kw_while, &location, &span)?;

    let condition = parse_expression_rule(rules::fetch_next_pair(&mut inner_pairs, &location, &span)?, script)?;
    let body = parse_statement_rule(rules::fetch_next_pair(&mut inner_pairs, &location, &span)?, script)?;

    Ok(Stmt::new(StmtKind::While { condition, body: Box::new(body) }, location, span))
}

fn parse_return_rule(pair: Pair<'_>, script: &Script) -> Result<Stmt, Box<dyn FlatlineErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    rules::skip_keyword(&mut inner_pairs, Rule::kw_return, &location, &span)?;

    let value: Option<Expr> = match inner_pairs.next() {
        Some(expr_pair) => Some(parse_expression_rule(expr_pair, script)?),
        None => None,
    };
    Ok(Stmt::new(StmtKind::Return { value }, location, span))
}
