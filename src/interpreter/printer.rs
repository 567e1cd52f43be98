use std::io::Write;
use crate::interpreter::ast::{Expr, LiteralValue, Stmt};
use crate::interpreter::value::format_number;
use crate::util::ensure_sufficient_stack;

/// Renders a parsed program as parenthesized prefix notation, one statement
/// per line, with the contents of blocks and bodies indented.
pub struct AstPrinter {
    indentation: String,

    indent_level: usize,
}

impl AstPrinter {
    pub fn new(indentation: String) -> AstPrinter {
        AstPrinter {
            indentation,
            indent_level: 0,
        }
    }

    pub fn write_program(&mut self, statements: &[Stmt], out: &mut impl Write) -> Result<(), std::io::Error> {
        for stmt in statements {
            self.write_statement(stmt, out)?;
        }

        Ok(())
    }

    pub fn write_statement(&mut self, stmt: &Stmt, out: &mut impl Write) -> Result<(), std::io::Error> {
        ensure_sufficient_stack(|| self.write_statement_impl(stmt, out))
    }

    fn write_statement_impl(&mut self, stmt: &Stmt, out: &mut impl Write) -> Result<(), std::io::Error> {
        let indentation = self.indentation.repeat(self.indent_level);

        match stmt {
            Stmt::Expression(expr) => writeln!(out, "{}(; {})", indentation, Self::expr_to_string(expr)),
            Stmt::Print { expr, .. } => writeln!(out, "{}(print {})", indentation, Self::expr_to_string(expr)),
            Stmt::Variable { name, initializer: Some(initializer) } =>
                writeln!(out, "{}(var {} {})", indentation, name.source(), Self::expr_to_string(initializer)),
            Stmt::Variable { name, initializer: None } => writeln!(out, "{}(var {})", indentation, name.source()),
            Stmt::Return { value: Some(value), .. } => writeln!(out, "{}(return {})", indentation, Self::expr_to_string(value)),
            Stmt::Return { value: None, .. } => writeln!(out, "{}(return)", indentation),

            Stmt::Block(statements) => {
                writeln!(out, "{}(block", indentation)?;
                self.write_nested(statements.iter(), out)?;
                writeln!(out, "{})", indentation)
            },
            Stmt::If { condition, then, otherwise } => {
                let keyword = if otherwise.is_some() { "if-else" } else { "if" };
                writeln!(out, "{}({} {}", indentation, keyword, Self::expr_to_string(condition))?;
                self.write_nested(std::iter::once(&**then).chain(otherwise.as_deref()), out)?;
                writeln!(out, "{})", indentation)
            },
            Stmt::While { condition, body } => {
                writeln!(out, "{}(while {}", indentation, Self::expr_to_string(condition))?;
                self.write_nested(std::iter::once(&**body), out)?;
                writeln!(out, "{})", indentation)
            },
            Stmt::Function(declaration) => {
                writeln!(out, "{}(fun {} ({})", indentation, declaration.name.source(),
                         declaration.params.iter().map(|param| param.source()).collect::<Vec<&str>>().join(" "))?;
                self.write_nested(declaration.body.iter(), out)?;
                writeln!(out, "{})", indentation)
            },
        }
    }

    fn write_nested<'a>(&mut self, statements: impl Iterator<Item = &'a Stmt>, out: &mut impl Write) -> Result<(), std::io::Error> {
        self.indent_level += 1;

        let mut result = Ok(());

        for stmt in statements {
            result = self.write_statement(stmt, out);

            if result.is_err() {
                break;
            }
        }

        self.indent_level -= 1;
        result
    }

    pub fn expr_to_string(expr: &Expr) -> String {
        ensure_sufficient_stack(|| Self::expr_to_string_impl(expr))
    }

    fn expr_to_string_impl(expr: &Expr) -> String {
        match expr {
            Expr::Literal(LiteralValue::Number(value)) => format_number(*value),
            Expr::Literal(LiteralValue::String(value)) => format!("\"{}\"", value),
            Expr::Literal(LiteralValue::Boolean(value)) => value.to_string(),
            Expr::Literal(LiteralValue::Nil) => String::from("nil"),
            Expr::Grouping(expr) => Self::parenthesize("group", [&**expr]),
            Expr::Unary { operator, right } => Self::parenthesize(operator.source(), [&**right]),
            Expr::Binary { left, operator, right }
            | Expr::Logical { left, operator, right } => Self::parenthesize(operator.source(), [&**left, &**right]),
            Expr::Variable(name) => name.source().to_owned(),
            Expr::Assign { name, value } => format!("(= {} {})", name.source(), Self::expr_to_string(value)),
            Expr::Call { callee, args, .. } => Self::parenthesize("call", std::iter::once(&**callee).chain(args.iter())),
        }
    }

    fn parenthesize<'a>(name: &str, exprs: impl IntoIterator<Item = &'a Expr>) -> String {
        let mut builder = format!("({}", name);

        for expr in exprs {
            builder.push(' ');
            builder.push_str(&Self::expr_to_string(expr));
        }

        builder.push(')');
        builder
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::diagnostic::Diagnostics;
    use crate::interpreter::lexer::Lexer;
    use crate::interpreter::parser::Parser;
    use super::*;

    fn parse(source: &str) -> Vec<Stmt> {
        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::new(source).tokenize(&mut diagnostics);
        let statements = Parser::new(tokens, &mut diagnostics).parse();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics.entries);

        statements
    }

    fn print(source: &str) -> String {
        let statements = parse(source);

        let mut out = Vec::new();
        AstPrinter::new(String::from("  ")).write_program(&statements, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn expressions_use_prefix_form() {
        assert_eq!("(; (+ 1 (* 2 3)))\n", print("1 + 2 * 3;"));
        assert_eq!("(; (* (group (+ 1 2)) 3))\n", print("(1 + 2) * 3;"));
        assert_eq!("(; (or (and a b) (! c)))\n", print("a and b or !c;"));
        assert_eq!("(; (= x (- 2.5)))\n", print("x = -2.5;"));
        assert_eq!("(print (call (call f 1) \"s\" nil))\n", print("print f(1)(\"s\", nil);"));
    }

    #[test]
    fn nested_statements_are_indented() {
        let expected = "\
(fun add (a b)
  (return (+ a b))
)
(if-else (< x 1)
  (block
    (var y true)
  )
  (print y)
)
";

        assert_eq!(expected, print("fun add(a, b) { return a + b; } if (x < 1) { var y = true; } else print y;"));
    }

    #[test]
    fn for_loops_print_as_their_while_form() {
        let expected = "\
(block
  (var i 0)
  (while (< i 3)
    (block
      (print i)
      (; (= i (+ i 1)))
    )
  )
)
";

        assert_eq!(expected, print("for (var i = 0; i < 3; i = i + 1) print i;"));
    }

    /// Accepts `limit` bytes, then fails every write.
    struct LimitedWriter {
        limit: usize,
    }

    impl Write for LimitedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.len() > self.limit {
                return Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "limit reached"));
            }

            self.limit -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_inside_a_block_keeps_indentation_balanced() {
        let mut printer = AstPrinter::new(String::from("  "));

        let mut failing = LimitedWriter { limit: "(block\n".len() };
        assert!(printer.write_program(&parse("{ print 1; }"), &mut failing).is_err());

        let mut out = Vec::new();
        printer.write_program(&parse("print 2;"), &mut out).unwrap();
        assert_eq!("(print 2)\n", String::from_utf8(out).unwrap());
    }
}
