use crate::ast::rules::{self, Pair, Rule};
use crate::ast::{BinaryOperator, Expr, ExprKind, UnaryOperator};
use crate::error::FlatlineErrorExt;
use crate::script::Script;

type ParseResult = Result<Expr, Box<dyn FlatlineErrorExt>>;

pub(crate) fn parse_expression_rule(pair: Pair<'_>, script: &Script) -> ParseResult {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let next = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match next.as_rule() {
        Rule::expression => parse_expression_rule(next, script),
        Rule::assignment => parse_assignment_rule(next, script),
        Rule::equality => parse_binary_chain(next, script),
        _ => Err(rules::unexpected_rule(&next, "flatline.expr.parse_expression_rule", &location, &span)),
    }
}

fn parse_assignment_rule(pair: Pair<'_>, script: &Script) -> ParseResult {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let name = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?.as_str().to_string();
    let value = parse_expression_rule(rules::fetch_next_pair(&mut inner_pairs, &location, &span)?, script)?;
    Ok(Expr::new(ExprKind::Assign { name, value: Box::new(value) }, location, span))
}

/// Parses any left-associative `operand (op operand)*` level of the grammar.
fn parse_binary_chain(pair: Pair<'_>, script: &Script) -> ParseResult {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);

    let first = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    let mut node = parse_operand(first, script)?;

    while let Some(op_pair) = inner_pairs.next() {
        let op = binary_operator(op_pair.as_str()).ok_or_else(|| {
            rules::unexpected_rule(&op_pair, "flatline.expr.parse_binary_chain", &location, &span)
        })?;
        let right_pair = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
        let right = parse_operand(right_pair, script)?;

        node = Expr::new(
            ExprKind::Binary { left: Box::new(node), op, right: Box::new(right) },
            rules::get_location_from_pair(&op_pair, script),
            rules::get_span_from_pair(&op_pair, script),
        );
    }
    Ok(node)
}

fn parse_operand(pair: Pair<'_>, script: &Script) -> ParseResult {
    match pair.as_rule() {
        Rule::relational | Rule::additive | Rule::multiplicative => parse_binary_chain(pair, script),
        Rule::unary => parse_unary_rule(pair, script),
        _ => {
            let location = rules::get_location_from_pair(&pair, script);
            let span = rules::get_span_from_pair(&pair, script);
            Err(rules::unexpected_rule(&pair, "flatline.expr.parse_operand", &location, &span))
        }
    }
}

fn binary_operator(text: &str) -> Option<BinaryOperator> {
    let op = match text {
        "==" => BinaryOperator::Eq,
        "!=" => BinaryOperator::Ne,
        "<" => BinaryOperator::Lt,
        "<=" => BinaryOperator::Le,
        ">" => BinaryOperator::Gt,
        ">=" => BinaryOperator::Ge,
        "+" => BinaryOperator::Add,
        "-" => BinaryOperator::Sub,
        "*" => BinaryOperator::Mul,
        "/" => BinaryOperator::Div,
        "%" => BinaryOperator::Mod,
        _ => return None,
    };
    Some(op)
}

fn parse_unary_rule(pair: Pair<'_>, script: &Script) -> ParseResult {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let next = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match next.as_rule() {
        Rule::unary_op => {
            let op = match next.as_str() {
                "-" => UnaryOperator::Minus,
                _ => UnaryOperator::Not,
            };
            let operand = parse_unary_rule(rules::fetch_next_pair(&mut inner_pairs, &location, &span)?, script)?;
            Ok(Expr::new(ExprKind::Unary { op, expr: Box::new(operand) }, location, span))
        }
        Rule::primary => parse_primary_rule(next, script),
        _ => Err(rules::unexpected_rule(&next, "flatline.expr.parse_unary_rule", &location, &span)),
    }
}

fn parse_primary_rule(pair: Pair<'_>, script: &Script) -> ParseResult {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let next = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match next.as_rule() {
        Rule::integer => {
            let value = next.as_str().parse::<i64>().map_err(|_| {
                Box::<dyn FlatlineErrorExt>::from(Box::new(crate::ast::err::SyntaxError::with(
                    format!("Integer literal '{}' does not fit in 64 bits.", next.as_str()),
                    "flatline.expr.parse_primary_rule",
                    location.clone(),
                    span.clone(),
                )))
            })?;
            Ok(Expr::new(ExprKind::Integer { value }, location, span))
        }
        Rule::boolean => Ok(Expr::new(ExprKind::Bool { value: next.as_str() == "true" }, location, span)),
        Rule::identifier => Ok(Expr::new(ExprKind::Identifier { name: next.as_str().to_string() }, location, span)),
        Rule::call => parse_call_rule(next, script),
        Rule::expression => parse_expression_rule(next, script),
        _ => Err(rules::unexpected_rule(&next, "flatline.expr.parse_primary_rule", &location, &span)),
    }
}

fn parse_call_rule(pair: Pair<'_>, script: &Script) -> ParseResult {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let callee = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?.as_str().to_string();
    let args = match inner_pairs.next() {
        Some(args_pair) => args_pair
            .into_inner()
            .map(|arg| parse_expression_rule(arg, script))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(Expr::new(ExprKind::Call { callee, args }, location, span))
}
