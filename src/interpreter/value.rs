use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::LiteralValue;
use crate::interpreter::callable::Callable;

#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
    Function(Rc<dyn Callable>),
}

impl Value {
    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Number(value) => Value::Number(*value),
            LiteralValue::String(value) => Value::String(value.clone()),
            LiteralValue::Boolean(value) => Value::Boolean(*value),
            LiteralValue::Nil => Value::Nil,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        format!("{}", value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Number(value) => f.write_str(&format_number(*value)),
            Value::String(value) => f.write_str(value),
            Value::Function(function) => write!(f, "<fn {}>", function.name()),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(value) => write!(f, "\"{}\"", value),
            _ => write!(f, "{}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
    }

    #[test]
    fn equality_never_crosses_types() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Nil, Value::Boolean(false));
        assert_ne!(Value::Number(1.0), Value::String(String::from("1")));
        assert_eq!(Value::String(String::from("a")), Value::String(String::from("a")));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn number_formatting() {
        assert_eq!("7", Value::Number(7.0).to_string());
        assert_eq!("2.5", Value::Number(2.5).to_string());
        assert_eq!("-3", Value::Number(-3.0).to_string());
        assert_eq!("Infinity", Value::Number(1.0 / 0.0).to_string());
        assert_eq!("-Infinity", Value::Number(-1.0 / 0.0).to_string());
        assert_eq!("NaN", Value::Number(f64::NAN).to_string());
    }
}
