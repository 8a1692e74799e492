use crate::{
    environment::prelude::{Payload, Value},
    lexer::prelude::{Token, TokenKind}
};

use super::error::{RuntimeError, RuntimeErrorType};

fn int_operands(op: &Token, left: &Value, right: &Value) -> Result<(i64, i64), RuntimeError> {
    let found = match (left.as_int(), right.as_int()) {
        (Some(left), Some(right)) => return Ok((left, right)),
        (None, _) => left.value_type(),
        (_, None) => right.value_type()
    };

    Err(RuntimeError::new(RuntimeErrorType::OperandNotNumber { found }, op))
}

fn checked(op: &Token, value: Option<i64>) -> Result<Value, RuntimeError> {
    value
        .map(Value::int)
        .ok_or_else(|| RuntimeError::new(RuntimeErrorType::IntegerOverflow, op))
}

/// Every binary operator except indexing.
pub fn binary(op: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op.kind {
        TokenKind::EqualEqual => Ok(Value::bool(left == right)),
        TokenKind::BangEqual => Ok(Value::bool(left != right)),
        TokenKind::Plus => plus(op, &left, &right),
        TokenKind::Or => Ok(or(&left, &right)),
        TokenKind::And => Ok(and(&left, &right)),
        TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Lesser
        | TokenKind::LesserEqual => arithmetic(op, &left, &right),
        _ => Err(RuntimeError::new(
            RuntimeErrorType::UnsupportedOperator { op: op.lexeme.clone() },
            op
        ))
    }
}

fn arithmetic(op: &Token, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (a, b) = int_operands(op, left, right)?;

    if matches!(op.kind, TokenKind::Slash | TokenKind::Percent) && b == 0 {
        return Err(RuntimeError::new(RuntimeErrorType::DivisionByZero, op));
    }

    match op.kind {
        TokenKind::Minus => checked(op, a.checked_sub(b)),
        TokenKind::Star => checked(op, a.checked_mul(b)),
        TokenKind::Slash => checked(op, a.checked_div(b)),
        TokenKind::Percent => checked(op, a.checked_rem(b)),
        TokenKind::Greater => Ok(Value::bool(a > b)),
        TokenKind::GreaterEqual => Ok(Value::bool(a >= b)),
        TokenKind::Lesser => Ok(Value::bool(a < b)),
        TokenKind::LesserEqual => Ok(Value::bool(a <= b)),
        _ => Err(RuntimeError::new(
            RuntimeErrorType::UnsupportedOperator { op: op.lexeme.clone() },
            op
        ))
    }
}

fn plus(op: &Token, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (&left.payload, &right.payload) {
        (Payload::Int(a), Payload::Int(b)) => checked(op, a.checked_add(*b)),
        (Payload::String(_), _) | (_, Payload::String(_)) => {
            Ok(Value::string(format!("{left}{right}")))
        },
        (Payload::List(a), Payload::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());

            Ok(Value::list(items))
        },
        (Payload::List(a), _) => {
            let mut items = a.borrow().clone();
            items.push(right.clone());

            Ok(Value::list(items))
        },
        (_, Payload::List(b)) => {
            let mut items = vec![left.clone()];
            items.extend(b.borrow().iter().cloned());

            Ok(Value::list(items))
        },
        _ => Err(RuntimeError::new(RuntimeErrorType::InvalidPlusOperands, op))
    }
}

fn distinct(items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut merged: Vec<Value> = vec![];

    for item in items {
        if !merged.contains(&item) {
            merged.push(item);
        }
    }

    merged
}

/// Set union when a list is involved, boolean `or` otherwise.
pub fn or(left: &Value, right: &Value) -> Value {
    match (left.as_list(), right.as_list()) {
        (Some(a), Some(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());

            Value::list(distinct(items))
        },
        (Some(list), None) | (None, Some(list)) => {
            let scalar = if left.as_list().is_some() { right } else { left };

            let mut items = list.borrow().clone();
            items.push(scalar.clone());

            Value::list(distinct(items))
        },
        (None, None) => Value::bool(left.is_truthy() || right.is_truthy())
    }
}

/// Set difference when a list is involved, boolean `and` otherwise.
pub fn and(left: &Value, right: &Value) -> Value {
    match (left.as_list(), right.as_list()) {
        (Some(a), Some(b)) => {
            let exclude = b.borrow();

            let items = a.borrow().iter()
                .filter(|item| !exclude.contains(item))
                .cloned()
                .collect();

            Value::list(items)
        },
        (Some(list), None) | (None, Some(list)) => {
            let scalar = if left.as_list().is_some() { right } else { left };

            let items = list.borrow().iter()
                .filter(|item| *item != scalar)
                .cloned()
                .collect();

            Value::list(items)
        },
        (None, None) => Value::bool(left.is_truthy() && right.is_truthy())
    }
}

pub fn unary(op: &Token, operand: Value) -> Result<Value, RuntimeError> {
    match op.kind {
        TokenKind::Bang => Ok(Value::bool(!operand.is_truthy())),
        TokenKind::Minus => match operand.as_int() {
            Some(value) => checked(op, value.checked_neg()),
            None => Err(RuntimeError::new(
                RuntimeErrorType::OperandNotNumber { found: operand.value_type() },
                op
            ))
        },
        _ => Err(RuntimeError::new(
            RuntimeErrorType::UnsupportedOperator { op: op.lexeme.clone() },
            op
        ))
    }
}
