use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use crate::interpreter::ast::{Expr, Stmt};
use crate::interpreter::callable::Function;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::lexer::{Token, TokenType};
use crate::interpreter::value::Value;
use crate::util::ensure_sufficient_stack;


/// Deepest chain of nested calls before a call fails with "Stack overflow.".
pub const MAX_CALL_DEPTH: usize = 4096;

/// How a statement finished. `Return` unwinds to the nearest enclosing call.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

type ExecResult = Result<Flow, RuntimeError>;
type EvalResult = Result<Value, RuntimeError>;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,

    output: Box<dyn Write>,
    call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::with_output(Box::new(std::io::stdout()))
    }

    /// An interpreter whose `print` statements write to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Interpreter {
        let globals = Environment::new_global();

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            output,
            call_depth: 0,
        }
    }

    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.globals)
    }

    /// Runs `statements` in the global scope, stopping at the first runtime
    /// error. Definitions persist across calls.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        tracing::debug!(count = statements.len(), "interpreting program");

        for stmt in statements {
            if let Flow::Return(_) = self.execute(stmt)? {
                break;
            }
        }

        Ok(())
    }

    /// Executes `statements` with `environment` as the current frame and
    /// restores the previous frame afterwards, whether or not they succeed.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> ExecResult {
        for stmt in statements {
            match self.execute(stmt)? {
                Flow::Normal => {},
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        ensure_sufficient_stack(|| self.execute_impl(stmt))
    }

    fn execute_impl(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            },
            Stmt::Print { keyword, expr } => {
                let value = self.evaluate(expr)?;

                writeln!(self.output, "{}", value).map_err(|source| RuntimeError::Output {
                    token: keyword.clone(),
                    source,
                })?;

                Ok(Flow::Normal)
            },
            Stmt::Variable { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(name.source(), value);
                Ok(Flow::Normal)
            },
            Stmt::Block(statements) => {
                let environment = Environment::new_with_parent(Rc::clone(&self.environment));
                self.execute_block(statements, environment)
            },
            Stmt::If { condition, then, otherwise } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then)
                } else if let Some(otherwise) = otherwise {
                    self.execute(otherwise)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let flow @ Flow::Return(_) = self.execute(body)? {
                        return Ok(flow);
                    }
                }

                Ok(Flow::Normal)
            },
            Stmt::Function(declaration) => {
                let function = Function::new(Rc::clone(declaration), Rc::clone(&self.environment));

                self.environment.borrow_mut().define(declaration.name.source(), Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };

                Ok(Flow::Return(value))
            },
        }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.evaluate_impl(expr))
    }

    fn evaluate_impl(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(value) => Ok(Value::from(value)),
            Expr::Grouping(expr) => self.evaluate(expr),
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;

                match operator.token_type() {
                    TokenType::Minus => match right {
                        Value::Number(value) => Ok(Value::Number(-value)),
                        _ => Err(RuntimeError::type_mismatch(operator, "Operand must be a number.")),
                    },
                    TokenType::Not => Ok(Value::Boolean(!right.is_truthy())),
                    _ => Err(RuntimeError::type_mismatch(operator, "Unknown unary operator.")),
                }
            },
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                Self::evaluate_binary(operator, left, right)
            },
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                let short_circuit = match operator.token_type() {
                    TokenType::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            },
            Expr::Variable(name) => self.environment.borrow().get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;

                self.environment.borrow_mut().assign(name, value.clone())?;
                Ok(value)
            },
            Expr::Call { callee, paren, args } => {
                let function = match self.evaluate(callee)? {
                    Value::Function(function) => function,
                    _ => return Err(RuntimeError::NotCallable { token: paren.clone() }),
                };

                let mut arguments = Vec::with_capacity(args.len());

                for arg in args {
                    arguments.push(self.evaluate(arg)?);
                }

                if arguments.len() != function.arity() {
                    return Err(RuntimeError::ArityMismatch {
                        token: paren.clone(),
                        expected: function.arity(),
                        got: arguments.len(),
                    });
                }

                if self.call_depth >= MAX_CALL_DEPTH {
                    return Err(RuntimeError::StackOverflow { token: paren.clone() });
                }

                tracing::trace!(function = function.name(), depth = self.call_depth, "call");

                self.call_depth += 1;
                let result = function.call(self, arguments);
                self.call_depth -= 1;

                result
            },
        }
    }

    fn evaluate_binary(operator: &Token, left: Value, right: Value) -> EvalResult {
        match operator.token_type() {
            TokenType::Equal => return Ok(Value::Boolean(left == right)),
            TokenType::NotEqual => return Ok(Value::Boolean(left != right)),
            TokenType::Plus => return match (left, right) {
                (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
                (Value::String(mut left), Value::String(right)) => {
                    left.push_str(&right);
                    Ok(Value::String(left))
                },
                _ => Err(RuntimeError::type_mismatch(operator, "Operands must be two numbers or two strings.")),
            },
            _ => {},
        }

        let (left, right) = match (left, right) {
            (Value::Number(left), Value::Number(right)) => (left, right),
            _ => return Err(RuntimeError::type_mismatch(operator, "Operands must be numbers.")),
        };

        Ok(match operator.token_type() {
            TokenType::Minus => Value::Number(left - right),
            TokenType::Slash => Value::Number(left / right),
            TokenType::Star => Value::Number(left * right),
            TokenType::Greater => Value::Boolean(left > right),
            TokenType::GreaterEqual => Value::Boolean(left >= right),
            TokenType::Less => Value::Boolean(left < right),
            TokenType::LessEqual => Value::Boolean(left <= right),
            _ => return Err(RuntimeError::type_mismatch(operator, "Unknown binary operator.")),
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
