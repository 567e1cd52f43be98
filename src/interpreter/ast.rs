use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::Token;

#[derive(Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Nil,
}

impl Debug for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Number(value) => write!(f, "{}", value),
            LiteralValue::String(value) => write!(f, "\"{}\"", value),
            LiteralValue::Boolean(value) => write!(f, "{}", value),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralValue),
    Grouping(Box<Expr>),
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// Short-circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Variable(Token),
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        paren: Token,
        args: Vec<Expr>,
    },
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{:?}", value),
            Expr::Grouping(expr) => write!(f, "({:?})", expr),
            Expr::Unary { operator, right } => write!(f, "({}{:?})", operator.source(), right),
            Expr::Binary { left, operator, right }
            | Expr::Logical { left, operator, right } => write!(f, "({:?} {} {:?})", left, operator.source(), right),
            Expr::Variable(name) => write!(f, "{}", name.source()),
            Expr::Assign { name, value } => write!(f, "({} = {:?})", name.source(), value),
            Expr::Call { callee, args, .. } => {
                write!(f, "({:?}({}))", callee, args.iter()
                    .map(|expr| format!("{:?}", expr))
                    .collect::<Vec<String>>().join(", "))
            },
        }
    }
}

/// A named function with its parameter list and body.
///
/// Shared between the statement tree and every function value created from it.
#[derive(Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

impl FunctionDecl {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Debug for FunctionDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "fun {}({}) {{ {} }}", self.name.source(),
               self.params.iter().map(|param| param.source()).collect::<Vec<&str>>().join(", "),
               self.body.iter().map(|stmt| format!("{:?}", stmt)).collect::<Vec<String>>().join(" "))
    }
}

#[derive(Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Print {
        keyword: Token,
        expr: Expr,
    },
    Variable {
        name: Token,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Function(Rc<FunctionDecl>),
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
}

impl Debug for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "{:?};", expr),
            Stmt::Print { expr, .. } => write!(f, "print {:?};", expr),
            Stmt::Variable { name, initializer: Some(initializer) } => write!(f, "var {} = {:?};", name.source(), initializer),
            Stmt::Variable { name, initializer: None } => write!(f, "var {};", name.source()),
            Stmt::Block(statements) => write!(f, "{{ {} }}", statements.iter()
                .map(|stmt| format!("{:?}", stmt))
                .collect::<Vec<String>>().join(" ")),
            Stmt::If { condition, then, otherwise: Some(otherwise) } =>
                write!(f, "if ({:?}) {:?} else {:?}", condition, then, otherwise),
            Stmt::If { condition, then, otherwise: None } => write!(f, "if ({:?}) {:?}", condition, then),
            Stmt::While { condition, body } => write!(f, "while ({:?}) {:?}", condition, body),
            Stmt::Function(declaration) => write!(f, "{:?}", declaration),
            Stmt::Return { value: Some(value), .. } => write!(f, "return {:?};", value),
            Stmt::Return { value: None, .. } => write!(f, "return;"),
        }
    }
}
