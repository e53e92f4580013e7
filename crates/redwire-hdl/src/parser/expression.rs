//! Binding and call-expression parsing.

use super::Parser;
use crate::ast::{Arg, Binding, Expr};
use crate::error::HdlResult;
use crate::lexer::Token;

impl Parser {
    /// Parse `name = circuit arg*` up to the end of line.
    pub(super) fn parse_binding(&mut self) -> HdlResult<Binding> {
        let line = self.line;
        let name = self.parse_identifier()?;
        self.expect(&Token::Eq)?;
        let expr = self.parse_expr()?;
        if !self.at_line_end() {
            return Err(self.unexpected("end of line", self.peek().cloned()));
        }
        Ok(Binding { name, expr, line })
    }

    /// Parse `circuit arg*`, stopping at a closing paren or the end of line.
    fn parse_expr(&mut self) -> HdlResult<Expr> {
        let circuit = self.parse_identifier()?;
        let mut args = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Identifier(_)) => args.push(Arg::Name(self.parse_identifier()?)),
                Some(Token::LParen) => {
                    self.advance();
                    let inner = self.parse_expr()?;
                    self.expect(&Token::RParen)?;
                    args.push(Arg::Nested(inner));
                }
                _ => break,
            }
        }
        Ok(Expr { circuit, args })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Arg;
    use crate::parser::parse;

    #[test]
    fn test_deep_nesting() {
        let program = parse("a\nb = not (not (not a))\nb").unwrap();
        let mut expr = &program.bindings[0].expr;
        let mut depth = 1;
        while let [Arg::Nested(inner)] = expr.args.as_slice() {
            expr = inner;
            depth += 1;
        }
        assert_eq!(depth, 3);
        assert_eq!(expr.args, vec![Arg::Name("a".into())]);
    }

    #[test]
    fn test_call_without_arguments() {
        let program = parse("a\nz = zero\nz").unwrap();
        assert!(program.bindings[0].expr.args.is_empty());
    }

    #[test]
    fn test_empty_parens_rejected() {
        assert!(parse("a\nb = not ()\nb").is_err());
    }
}
