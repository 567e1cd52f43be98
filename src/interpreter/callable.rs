use std::cell::RefCell;
use std::rc::Rc;
use crate::interpreter::ast::FunctionDecl;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::interpreter::{Flow, Interpreter};
use crate::interpreter::value::Value;

pub trait Callable {
    fn name(&self) -> &str;

    fn arity(&self) -> usize;

    /// `args.len()` has already been checked against `arity()`.
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError>;
}

/// A user-defined function together with the frame it was declared in.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> Function {
        Function { declaration, closure }
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        self.declaration.name.source()
    }

    fn arity(&self) -> usize {
        self.declaration.arity()
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let environment = Environment::new_with_parent(Rc::clone(&self.closure));

        {
            let mut frame = environment.borrow_mut();

            for (param, arg) in self.declaration.params.iter().zip(args) {
                frame.define(param.source(), arg);
            }
        }

        match interpreter.execute_block(&self.declaration.body, environment)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}
