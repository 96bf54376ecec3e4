//! Update expression parsing and evaluation.
//!
//! Supports the subset of the table store's update grammar that in-process
//! backends need:
//!
//! ```text
//! SET path = operand [+|- operand], ...
//! REMOVE path, ...
//! operand := :placeholder | path | if_not_exists(path, operand) | list_append(operand, operand)
//! path    := name ( .name | [index] )*
//! ```
//!
//! Keywords are case-insensitive. Every failure is a `Condition` error, which
//! is how the store reports rejected expressions.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::error::{RepositoryError, Result};
use super::types::{AttributeValue, Item};
use super::update::is_name_byte;

/// Largest number of significant digits a stored number may carry.
pub const MAX_SIGNIFICANT_DIGITS: usize = 38;

/// One step of an attribute path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    Attribute(String),
    Index(usize),
}

/// A document path such as `info.actors[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    segments: Vec<PathSegment>,
}

impl AttributePath {
    /// Top-level attribute name.
    pub fn root(&self) -> &str {
        match self.segments.first() {
            Some(PathSegment::Attribute(name)) => name,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(String),
    Path(AttributePath),
    IfNotExists(AttributePath, Box<Operand>),
    ListAppend(Box<Operand>, Box<Operand>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Operand(Operand),
    Plus(Operand, Operand),
    Minus(Operand, Operand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    Set(AttributePath, SetValue),
    Remove(AttributePath),
}

/// A parsed update expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    actions: Vec<UpdateAction>,
}

impl UpdateExpression {
    pub fn parse(expression: &str) -> Result<Self> {
        let tokens = tokenize(expression)?;
        Parser { tokens, pos: 0 }.parse_expression()
    }

    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    /// Top-level attributes written or removed by this expression.
    pub fn target_roots(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|action| match action {
            UpdateAction::Set(path, _) | UpdateAction::Remove(path) => path.root(),
        })
    }

    /// Apply the expression to `item` in place.
    ///
    /// Operands and REMOVE paths are resolved against the item as it was
    /// before the update, so actions do not observe each other's writes.
    /// On error the item is left untouched.
    pub fn apply(&self, item: &mut Item, values: &HashMap<String, AttributeValue>) -> Result<()> {
        let original = item.clone();
        let mut updated = item.clone();
        let mut removals = Vec::new();

        for action in &self.actions {
            match action {
                UpdateAction::Set(path, value) => {
                    let resolved = eval_set_value(value, &original, values)?;
                    write_path(&mut updated, path, resolved)?;
                }
                UpdateAction::Remove(path) => removals.push(path),
            }
        }

        // Highest list index first, so lower indexes still name the
        // element they named in the original item.
        removals.sort_unstable_by(|a, b| b.segments.cmp(&a.segments));
        for path in removals {
            remove_path(&mut updated, path);
        }

        *item = updated;
        Ok(())
    }
}

fn condition(msg: impl Into<String>) -> RepositoryError {
    RepositoryError::Condition(msg.into())
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Placeholder(String),
    Index(usize),
    Comma,
    Equals,
    Plus,
    Minus,
    Dot,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b'=' => {
                tokens.push(Token::Equals);
                i += 1;
            }
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'[' => {
                let start = i + 1;
                let end = input[start..]
                    .find(']')
                    .map(|off| start + off)
                    .ok_or_else(|| condition("Unterminated list index in update expression"))?;
                let index = input[start..end].trim().parse::<usize>().map_err(|_| {
                    condition(format!(
                        "Invalid list index [{}] in update expression",
                        &input[start..end]
                    ))
                })?;
                tokens.push(Token::Index(index));
                i = end + 1;
            }
            b':' => {
                let start = i;
                i += 1;
                while i < bytes.len() && is_name_byte(bytes[i]) {
                    i += 1;
                }
                if i == start + 1 {
                    return Err(condition("Empty placeholder name in update expression"));
                }
                tokens.push(Token::Placeholder(input[start..i].to_string()));
            }
            b'#' => {
                return Err(condition(
                    "Expression attribute names (#name) are not supported",
                ))
            }
            b if is_name_byte(b) => {
                let start = i;
                while i < bytes.len() && is_name_byte(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::Name(input[start..i].to_string()));
            }
            _ => {
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(condition(format!(
                    "Unexpected character {ch:?} in update expression"
                )));
            }
        }
    }

    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Set,
    Remove,
}

fn clause_keyword(token: &Token) -> Option<Clause> {
    match token {
        Token::Name(name) if name.eq_ignore_ascii_case("SET") => Some(Clause::Set),
        Token::Name(name) if name.eq_ignore_ascii_case("REMOVE") => Some(Clause::Remove),
        _ => None,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(condition(format!(
                "Expected {expected:?} but found {token:?} in update expression"
            ))),
            None => Err(condition(format!(
                "Expected {expected:?} but the update expression ended"
            ))),
        }
    }

    fn parse_expression(mut self) -> Result<UpdateExpression> {
        let mut actions = Vec::new();
        let mut seen: Vec<Clause> = Vec::new();

        while let Some(token) = self.next() {
            let clause = match clause_keyword(&token) {
                Some(clause) => clause,
                None => match &token {
                    Token::Name(name)
                        if name.eq_ignore_ascii_case("ADD")
                            || name.eq_ignore_ascii_case("DELETE") =>
                    {
                        return Err(condition(format!(
                            "{} clauses are not supported",
                            name.to_uppercase()
                        )))
                    }
                    _ => {
                        return Err(condition(format!(
                            "Expected SET or REMOVE but found {token:?}"
                        )))
                    }
                },
            };

            if seen.contains(&clause) {
                return Err(condition(format!(
                    "The {clause:?} section can only be used once in an update expression"
                )));
            }
            seen.push(clause);

            loop {
                let action = match clause {
                    Clause::Set => {
                        let path = self.parse_path()?;
                        self.expect(Token::Equals)?;
                        UpdateAction::Set(path, self.parse_set_value()?)
                    }
                    Clause::Remove => UpdateAction::Remove(self.parse_path()?),
                };
                actions.push(action);

                if self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                    continue;
                }
                match self.peek() {
                    None => break,
                    Some(t) if clause_keyword(t).is_some() => break,
                    Some(t) => {
                        return Err(condition(format!(
                            "Unexpected token {t:?} in update expression"
                        )))
                    }
                }
            }
        }

        if actions.is_empty() {
            return Err(condition("Update expression has no actions"));
        }

        Ok(UpdateExpression { actions })
    }

    fn parse_path(&mut self) -> Result<AttributePath> {
        let first = match self.next() {
            Some(Token::Name(name)) => name,
            other => {
                return Err(condition(format!(
                    "Expected an attribute name but found {other:?}"
                )))
            }
        };

        let mut segments = vec![PathSegment::Attribute(first)];
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.pos += 1;
                    match self.next() {
                        Some(Token::Name(name)) => segments.push(PathSegment::Attribute(name)),
                        other => {
                            return Err(condition(format!(
                                "Expected an attribute name after '.' but found {other:?}"
                            )))
                        }
                    }
                }
                Some(Token::Index(index)) => {
                    segments.push(PathSegment::Index(*index));
                    self.pos += 1;
                }
                _ => break,
            }
        }

        Ok(AttributePath { segments })
    }

    fn parse_set_value(&mut self) -> Result<SetValue> {
        let left = self.parse_operand()?;
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                Ok(SetValue::Plus(left, self.parse_operand()?))
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(SetValue::Minus(left, self.parse_operand()?))
            }
            _ => Ok(SetValue::Operand(left)),
        }
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        match (self.peek(), self.peek_at(1)) {
            (Some(Token::Placeholder(name)), _) => {
                let name = name.clone();
                self.pos += 1;
                Ok(Operand::Value(name))
            }
            (Some(Token::Name(function)), Some(Token::LParen)) => {
                let function = function.to_ascii_lowercase();
                self.pos += 2;
                let operand = match function.as_str() {
                    "if_not_exists" => {
                        let path = self.parse_path()?;
                        self.expect(Token::Comma)?;
                        Operand::IfNotExists(path, Box::new(self.parse_operand()?))
                    }
                    "list_append" => {
                        let first = self.parse_operand()?;
                        self.expect(Token::Comma)?;
                        Operand::ListAppend(Box::new(first), Box::new(self.parse_operand()?))
                    }
                    other => {
                        return Err(condition(format!(
                            "Unsupported function in update expression: {other}"
                        )))
                    }
                };
                self.expect(Token::RParen)?;
                Ok(operand)
            }
            (Some(Token::Name(_)), _) => Ok(Operand::Path(self.parse_path()?)),
            (other, _) => Err(condition(format!(
                "Expected an operand but found {other:?}"
            ))),
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

fn eval_set_value(
    value: &SetValue,
    item: &Item,
    values: &HashMap<String, AttributeValue>,
) -> Result<AttributeValue> {
    match value {
        SetValue::Operand(op) => eval_operand(op, item, values),
        SetValue::Plus(a, b) => arithmetic(
            eval_operand(a, item, values)?,
            eval_operand(b, item, values)?,
            false,
        ),
        SetValue::Minus(a, b) => arithmetic(
            eval_operand(a, item, values)?,
            eval_operand(b, item, values)?,
            true,
        ),
    }
}

fn eval_operand(
    operand: &Operand,
    item: &Item,
    values: &HashMap<String, AttributeValue>,
) -> Result<AttributeValue> {
    match operand {
        Operand::Value(name) => values
            .get(name)
            .cloned()
            .ok_or_else(|| condition(format!("Unresolved placeholder: {name}"))),
        Operand::Path(path) => read_path(item, path).cloned().ok_or_else(|| {
            condition("The provided expression refers to an attribute that does not exist in the item")
        }),
        Operand::IfNotExists(path, fallback) => match read_path(item, path) {
            Some(existing) => Ok(existing.clone()),
            None => eval_operand(fallback, item, values),
        },
        Operand::ListAppend(a, b) => {
            match (eval_operand(a, item, values)?, eval_operand(b, item, values)?) {
                (AttributeValue::L(mut first), AttributeValue::L(second)) => {
                    first.extend(second);
                    Ok(AttributeValue::L(first))
                }
                (x, y) => Err(condition(format!(
                    "list_append expects two lists, found {} and {}",
                    x.type_name(),
                    y.type_name()
                ))),
            }
        }
    }
}

fn arithmetic(a: AttributeValue, b: AttributeValue, subtract: bool) -> Result<AttributeValue> {
    let (a, b) = match (&a, &b) {
        (AttributeValue::N(a), AttributeValue::N(b)) => (a, b),
        _ => {
            return Err(condition(format!(
                "Incorrect operand type for operator: {} and {}",
                a.type_name(),
                b.type_name()
            )))
        }
    };

    let result = match (a.parse::<i128>(), b.parse::<i128>()) {
        (Ok(x), Ok(y)) => {
            let result = if subtract { x.checked_sub(y) } else { x.checked_add(y) };
            result.ok_or_else(|| number_overflow(a, b))?.to_string()
        }
        _ => {
            let (x, y) = (parse_decimal(a)?, parse_decimal(b)?);
            let result = if subtract { x.checked_sub(y) } else { x.checked_add(y) };
            result
                .ok_or_else(|| number_overflow(a, b))?
                .normalize()
                .to_string()
        }
    };

    if significant_digits(&result) > MAX_SIGNIFICANT_DIGITS {
        return Err(number_overflow(a, b));
    }
    Ok(AttributeValue::N(result))
}

fn number_overflow(a: &str, b: &str) -> RepositoryError {
    condition(format!(
        "Number overflow. Attempting to store a number with magnitude larger than supported range: {a} and {b}"
    ))
}

/// Exact decimal parse. Operands beyond decimal precision are rejected
/// rather than rounded.
fn parse_decimal(s: &str) -> Result<Decimal> {
    let parsed = if s.contains(['e', 'E']) {
        Decimal::from_scientific(s)
    } else {
        Decimal::from_str_exact(s)
    };
    parsed.map_err(|_| condition(format!("Number {s} is out of range for arithmetic")))
}

fn significant_digits(number: &str) -> usize {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

fn read_path<'a>(item: &'a Item, path: &AttributePath) -> Option<&'a AttributeValue> {
    let mut segments = path.segments.iter();
    let mut current = match segments.next()? {
        PathSegment::Attribute(name) => item.get(name)?,
        PathSegment::Index(_) => return None,
    };

    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Attribute(name), AttributeValue::M(map)) => map.get(name)?,
            (PathSegment::Index(i), AttributeValue::L(list)) => list.get(*i)?,
            _ => return None,
        };
    }

    Some(current)
}

fn invalid_path() -> RepositoryError {
    condition("The document path provided in the update expression is invalid for update")
}

fn write_path(item: &mut Item, path: &AttributePath, value: AttributeValue) -> Result<()> {
    let (last, parents) = path.segments.split_last().ok_or_else(invalid_path)?;

    if parents.is_empty() {
        return match last {
            PathSegment::Attribute(name) => {
                item.insert(name.clone(), value);
                Ok(())
            }
            PathSegment::Index(_) => Err(invalid_path()),
        };
    }

    let mut parent_segments = parents.iter();
    let mut current = match parent_segments.next() {
        Some(PathSegment::Attribute(name)) => item.get_mut(name).ok_or_else(invalid_path)?,
        _ => return Err(invalid_path()),
    };
    for segment in parent_segments {
        current = match segment {
            PathSegment::Attribute(name) => match current {
                AttributeValue::M(map) => map.get_mut(name).ok_or_else(invalid_path)?,
                _ => return Err(invalid_path()),
            },
            PathSegment::Index(i) => match current {
                AttributeValue::L(list) => list.get_mut(*i).ok_or_else(invalid_path)?,
                _ => return Err(invalid_path()),
            },
        };
    }

    match (last, current) {
        (PathSegment::Attribute(name), AttributeValue::M(map)) => {
            map.insert(name.clone(), value);
        }
        (PathSegment::Index(i), AttributeValue::L(list)) => {
            // Writing past the end appends, as the store does.
            if *i < list.len() {
                list[*i] = value;
            } else {
                list.push(value);
            }
        }
        _ => return Err(invalid_path()),
    }
    Ok(())
}

fn remove_path(item: &mut Item, path: &AttributePath) {
    let Some((last, parents)) = path.segments.split_last() else {
        return;
    };

    if parents.is_empty() {
        if let PathSegment::Attribute(name) = last {
            item.remove(name);
        }
        return;
    }

    let mut parent_segments = parents.iter();
    let mut current = match parent_segments.next() {
        Some(PathSegment::Attribute(name)) => match item.get_mut(name) {
            Some(value) => value,
            None => return,
        },
        _ => return,
    };
    for segment in parent_segments {
        let next = match segment {
            PathSegment::Attribute(name) => match current {
                AttributeValue::M(map) => map.get_mut(name),
                _ => None,
            },
            PathSegment::Index(i) => match current {
                AttributeValue::L(list) => list.get_mut(*i),
                _ => None,
            },
        };
        current = match next {
            Some(value) => value,
            None => return,
        };
    }

    match (last, current) {
        (PathSegment::Attribute(name), AttributeValue::M(map)) => {
            map.remove(name);
        }
        (PathSegment::Index(i), AttributeValue::L(list)) if *i < list.len() => {
            list.remove(*i);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> AttributeValue {
        AttributeValue::S(v.to_string())
    }

    fn n(v: &str) -> AttributeValue {
        AttributeValue::N(v.to_string())
    }

    fn sample_item() -> Item {
        let mut info = HashMap::new();
        info.insert("rating".to_string(), n("7"));
        info.insert("plot".to_string(), s("A thief steals secrets"));
        info.insert("actors".to_string(), AttributeValue::L(vec![s("Leo")]));

        let mut item = HashMap::new();
        item.insert("title".to_string(), s("Inception"));
        item.insert("year".to_string(), n("2010"));
        item.insert("info".to_string(), AttributeValue::M(info));
        item
    }

    fn values(pairs: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn info<'a>(item: &'a Item, key: &str) -> Option<&'a AttributeValue> {
        item.get("info").unwrap().as_m().unwrap().get(key)
    }

    #[test]
    fn test_parse_set_and_remove() {
        let expr = UpdateExpression::parse("set info.rating = :r, info.plot = :p remove info.old")
            .unwrap();
        assert_eq!(expr.actions().len(), 3);
        assert_eq!(expr.target_roots().collect::<Vec<_>>(), vec!["info"; 3]);
    }

    #[test]
    fn test_set_nested_value() {
        let mut item = sample_item();
        let expr = UpdateExpression::parse("SET info.rating = :r, info.genre = :g").unwrap();
        expr.apply(&mut item, &values(&[(":r", n("9")), (":g", s("scifi"))]))
            .unwrap();

        assert_eq!(info(&item, "rating"), Some(&n("9")));
        assert_eq!(info(&item, "genre"), Some(&s("scifi")));
    }

    #[test]
    fn test_arithmetic() {
        let mut item = sample_item();
        let expr =
            UpdateExpression::parse("SET info.rating = info.rating + :inc, votes = :zero - :one")
                .unwrap();
        expr.apply(
            &mut item,
            &values(&[(":inc", n("2")), (":zero", n("0")), (":one", n("1"))]),
        )
        .unwrap();

        assert_eq!(info(&item, "rating"), Some(&n("9")));
        assert_eq!(item.get("votes"), Some(&n("-1")));
    }

    #[test]
    fn test_fractional_arithmetic() {
        let mut item = sample_item();
        let expr = UpdateExpression::parse("SET info.rating = info.rating + :d").unwrap();
        expr.apply(&mut item, &values(&[(":d", n("0.5"))])).unwrap();

        assert_eq!(info(&item, "rating"), Some(&n("7.5")));
    }

    #[test]
    fn test_decimal_arithmetic_is_exact() {
        let mut item = sample_item();
        UpdateExpression::parse("SET a = :x + :y, b = :x - :y, c = :big + :tiny")
            .unwrap()
            .apply(
                &mut item,
                &values(&[
                    (":x", n("0.1")),
                    (":y", n("0.2")),
                    (":big", n("1e3")),
                    (":tiny", n("0.25")),
                ]),
            )
            .unwrap();

        assert_eq!(item.get("a"), Some(&n("0.3")));
        assert_eq!(item.get("b"), Some(&n("-0.1")));
        assert_eq!(item.get("c"), Some(&n("1000.25")));
    }

    #[test]
    fn test_integer_overflow_is_rejected() {
        let mut item = sample_item();
        item.insert("counter".to_string(), n(&i128::MAX.to_string()));
        let before = item.clone();

        let result = UpdateExpression::parse("SET counter = counter + :one")
            .unwrap()
            .apply(&mut item, &values(&[(":one", n("1"))]));

        assert!(matches!(result, Err(RepositoryError::Condition(_))));
        assert_eq!(item, before);
    }

    #[test]
    fn test_result_beyond_precision_is_rejected() {
        let nines = "9".repeat(MAX_SIGNIFICANT_DIGITS);
        let mut item = sample_item();
        let expr = UpdateExpression::parse("SET total = :a + :b").unwrap();

        let result = expr.apply(&mut item, &values(&[(":a", n(&nines)), (":b", n(&nines))]));
        assert!(matches!(result, Err(RepositoryError::Condition(_))));

        // A carry into a round power of ten keeps one significant digit.
        expr.apply(&mut item, &values(&[(":a", n(&nines)), (":b", n("1"))]))
            .unwrap();
        assert_eq!(
            item.get("total"),
            Some(&n(&format!("1{}", "0".repeat(MAX_SIGNIFICANT_DIGITS))))
        );
    }

    #[test]
    fn test_huge_float_operands_are_rejected() {
        let mut item = sample_item();
        let before = item.clone();

        let result = UpdateExpression::parse("SET x = :a + :b")
            .unwrap()
            .apply(&mut item, &values(&[(":a", n("1e308")), (":b", n("1e308"))]));

        assert!(matches!(result, Err(RepositoryError::Condition(_))));
        assert_eq!(item, before);
    }

    #[test]
    fn test_if_not_exists_and_list_append() {
        let mut item = sample_item();
        let expr = UpdateExpression::parse(
            "SET info.actors = list_append(info.actors, :more), info.views = if_not_exists(info.views, :zero), info.rating = if_not_exists(info.rating, :zero)",
        )
        .unwrap();
        expr.apply(
            &mut item,
            &values(&[
                (":more", AttributeValue::L(vec![s("Ellen")])),
                (":zero", n("0")),
            ]),
        )
        .unwrap();

        assert_eq!(
            info(&item, "actors"),
            Some(&AttributeValue::L(vec![s("Leo"), s("Ellen")]))
        );
        assert_eq!(info(&item, "views"), Some(&n("0")));
        assert_eq!(info(&item, "rating"), Some(&n("7")));
    }

    #[test]
    fn test_list_index_write_and_remove() {
        let mut item = sample_item();
        UpdateExpression::parse("SET info.actors[0] = :a, info.actors[5] = :b")
            .unwrap()
            .apply(&mut item, &values(&[(":a", s("Tom")), (":b", s("Cillian"))]))
            .unwrap();
        assert_eq!(
            info(&item, "actors"),
            Some(&AttributeValue::L(vec![s("Tom"), s("Cillian")]))
        );

        UpdateExpression::parse("REMOVE info.actors[0]")
            .unwrap()
            .apply(&mut item, &HashMap::new())
            .unwrap();
        assert_eq!(
            info(&item, "actors"),
            Some(&AttributeValue::L(vec![s("Cillian")]))
        );
    }

    #[test]
    fn test_remove_several_list_indexes() {
        let mut item = sample_item();
        item.insert(
            "l".to_string(),
            AttributeValue::L(vec![s("a"), s("b"), s("c"), s("d")]),
        );

        UpdateExpression::parse("REMOVE l[0], l[1], l[3]")
            .unwrap()
            .apply(&mut item, &HashMap::new())
            .unwrap();
        assert_eq!(item.get("l"), Some(&AttributeValue::L(vec![s("c")])));
    }

    #[test]
    fn test_remove_index_order_does_not_matter() {
        let mut item = sample_item();
        item.insert(
            "l".to_string(),
            AttributeValue::L((0..12).map(|i| n(&i.to_string())).collect()),
        );

        UpdateExpression::parse("REMOVE l[2], l[10], l[0]")
            .unwrap()
            .apply(&mut item, &HashMap::new())
            .unwrap();

        let expected: Vec<_> = [1, 3, 4, 5, 6, 7, 8, 9, 11]
            .iter()
            .map(|i| n(&i.to_string()))
            .collect();
        assert_eq!(item.get("l"), Some(&AttributeValue::L(expected)));
    }

    #[test]
    fn test_remove_missing_path_is_noop() {
        let mut item = sample_item();
        let before = item.clone();
        UpdateExpression::parse("REMOVE info.nothing, missing.deeper")
            .unwrap()
            .apply(&mut item, &HashMap::new())
            .unwrap();
        assert_eq!(item, before);
    }

    #[test]
    fn test_operands_read_original_item() {
        let mut item = sample_item();
        UpdateExpression::parse("SET info.rating = :r, copy = info.rating")
            .unwrap()
            .apply(&mut item, &values(&[(":r", n("1"))]))
            .unwrap();
        assert_eq!(item.get("copy"), Some(&n("7")));
    }

    #[test]
    fn test_missing_parent_path_fails_without_mutation() {
        let mut item = sample_item();
        let before = item.clone();
        let result = UpdateExpression::parse("SET info.rating = :r, nope.deeper = :r")
            .unwrap()
            .apply(&mut item, &values(&[(":r", n("1"))]));

        assert!(matches!(result, Err(RepositoryError::Condition(_))));
        assert_eq!(item, before);
    }

    #[test]
    fn test_missing_operand_path_fails() {
        let mut item = sample_item();
        let result = UpdateExpression::parse("SET info.rating = info.votes + :one")
            .unwrap()
            .apply(&mut item, &values(&[(":one", n("1"))]));
        assert!(matches!(result, Err(RepositoryError::Condition(_))));
    }

    #[test]
    fn test_arithmetic_on_strings_fails() {
        let mut item = sample_item();
        let result = UpdateExpression::parse("SET info.plot = info.plot + :one")
            .unwrap()
            .apply(&mut item, &values(&[(":one", n("1"))]));
        assert!(matches!(result, Err(RepositoryError::Condition(_))));
    }

    #[test]
    fn test_syntax_errors() {
        for bad in [
            "",
            "info.rating = :r",
            "SET info.rating :r",
            "SET info.rating = :r,",
            "SET a = :r SET b = :r",
            "ADD counter :one",
            "SET #n = :r",
            "SET a = unknown_fn(:r)",
            "SET a = :r extra",
            "SET a[x] = :r",
        ] {
            assert!(
                matches!(UpdateExpression::parse(bad), Err(RepositoryError::Condition(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
