use pest_derive::Parser;

use crate::error::FlatlineErrorExt;
use crate::location;
use crate::script::Script;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct RulesParser;

pub(crate) type Pair<'a> = pest::iterators::Pair<'a, Rule>;
pub(crate) type Pairs<'a> = pest::iterators::Pairs<'a, Rule>;

pub(crate) fn fetch_next_pair<'a>(
    pairs: &mut Pairs<'a>,
    location: &Option<location::Location>,
    span: &Option<location::Span>,
) -> Result<Pair<'a>, Box<dyn FlatlineErrorExt>> {
    match pairs.next() {
        Some(pair) => Ok(pair),
        None => Err(Box::<dyn FlatlineErrorExt>::from(Box::new(
            super::err::SyntaxError::with(
                "Expected more inner pairs but found none.".into(),
                "flatline.ast.rules.fetch_next_pair",
                location.clone(),
                span.clone(),
            ),
        ))),
    }
}

/// Consumes the leading keyword token of a statement rule.
pub(crate) fn skip_keyword(
    pairs: &mut Pairs<'_>,
    expected: Rule,
    location: &Option<location::Location>,
    span: &Option<location::Span>,
) -> Result<(), Box<dyn FlatlineErrorExt>> {
    let pair = fetch_next_pair(pairs, location, span)?;
    if pair.as_rule() == expected {
        Ok(())
    } else {
        Err(unexpected_rule(&pair, "flatline.ast.rules.skip_keyword", location, span))
    }
}

pub(crate) fn unexpected_rule(
    pair: &Pair<'_>,
    issuer: &str,
    location: &Option<location::Location>,
    span: &Option<location::Span>,
) -> Box<dyn FlatlineErrorExt> {
    Box::<dyn FlatlineErrorExt>::from(Box::new(super::err::SyntaxError::with(
        format!("Unexpected rule {:?} ('{}').", pair.as_rule(), pair.as_str()),
        issuer,
        location.clone(),
        span.clone(),
    )))
}

pub(crate) fn get_data_from_rule<'a>(
    rule: &Pair<'a>,
    script: &Script,
) -> (Pairs<'a>, Option<location::Location>, Option<location::Span>) {
    let inner_rules = rule.clone().into_inner();
    let span = get_span_from_pair(rule, script);
    let location = get_location_from_pair(rule, script);
    (inner_rules, location, span)
}

pub fn get_location_from_pair(rule: &Pair<'_>, script: &Script) -> Option<location::Location> {
    let (line, column) = rule.as_span().start_pos().line_col();
    Some(location::Location::new(script.name.clone(), line, column))
}

pub fn get_span_from_pair(rule: &Pair<'_>, script: &Script) -> Option<location::Span> {
    let span = rule.as_span();
    let (start_line, start_col) = span.start_pos().line_col();
    let (end_line, end_col) = span.end_pos().line_col();
    Some(location::Span::new(
        location::Location::new(script.name.clone(), start_line, start_col),
        location::Location::new(script.name.clone(), end_line, end_col),
    ))
}
