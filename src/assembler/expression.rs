/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The expression evaluator (§4.2): a recursive-descent parser over a token
//! slice that builds an [`Expr`] tree, and a pure evaluator that walks that
//! tree against a symbol lookup callback.

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::parser::tokenizer::Token;

#[derive(Debug, PartialEq)]
pub enum EvalError {
    DivByZero,
    Unresolved(String),
}

/// Parses an expression starting at `start`, returning the tree and the
/// index of the first token not consumed (the "terminating index").
pub fn parse_expr(tokens: &[Token], start: usize) -> Result<(Expr, usize), String> {
    parse_additive(tokens, start)
}

fn parse_additive(tokens: &[Token], start: usize) -> Result<(Expr, usize), String> {
    let (mut lhs, mut pos) = parse_term(tokens, start)?;
    loop {
        match tokens.get(pos) {
            Some(Token::Op('+')) => {
                let (rhs, next) = parse_term(tokens, pos + 1)?;
                lhs = Expr::Binary(BinOp::Add, Box::new(lhs), Box::new(rhs));
                pos = next;
            }
            Some(Token::Op('-')) => {
                let (rhs, next) = parse_term(tokens, pos + 1)?;
                lhs = Expr::Binary(BinOp::Sub, Box::new(lhs), Box::new(rhs));
                pos = next;
            }
            _ => break,
        }
    }
    Ok((lhs, pos))
}

fn parse_term(tokens: &[Token], start: usize) -> Result<(Expr, usize), String> {
    let (mut lhs, mut pos) = parse_unary(tokens, start)?;
    loop {
        match tokens.get(pos) {
            Some(Token::Op('*')) => {
                let (rhs, next) = parse_unary(tokens, pos + 1)?;
                lhs = Expr::Binary(BinOp::Mul, Box::new(lhs), Box::new(rhs));
                pos = next;
            }
            Some(Token::Op('/')) => {
                let (rhs, next) = parse_unary(tokens, pos + 1)?;
                lhs = Expr::Binary(BinOp::Div, Box::new(lhs), Box::new(rhs));
                pos = next;
            }
            Some(Token::Op('%')) => {
                let (rhs, next) = parse_unary(tokens, pos + 1)?;
                lhs = Expr::Binary(BinOp::Mod, Box::new(lhs), Box::new(rhs));
                pos = next;
            }
            _ => break,
        }
    }
    Ok((lhs, pos))
}

fn parse_unary(tokens: &[Token], start: usize) -> Result<(Expr, usize), String> {
    if let Some(Token::Op('-')) = tokens.get(start) {
        let (operand, next) = parse_unary(tokens, start + 1)?;
        return Ok((Expr::Unary(UnaryOp::Neg, Box::new(operand)), next));
    }
    parse_primary(tokens, start)
}

fn parse_primary(tokens: &[Token], start: usize) -> Result<(Expr, usize), String> {
    match tokens.get(start) {
        Some(Token::Number(n)) => Ok((Expr::Int(*n), start + 1)),
        Some(Token::Ident(name)) => Ok((Expr::Symbol(name.clone()), start + 1)),
        Some(Token::Op('(')) => {
            let (inner, next) = parse_additive(tokens, start + 1)?;
            match tokens.get(next) {
                Some(Token::Op(')')) => Ok((inner, next + 1)),
                _ => Err("expected closing ')'".to_string()),
            }
        }
        Some(other) => Err(format!("unexpected token in expression: {other:?}")),
        None => Err("expected an expression".to_string()),
    }
}

/// Evaluates an expression tree. Every arithmetic operation is performed in
/// signed 32-bit range; the encoder narrows and range-checks at operand
/// binding. Pure: the same tree and symbol table always yield the same
/// value.
pub fn eval(expr: &Expr, lookup: &dyn Fn(&str) -> Option<i64>) -> Result<i64, EvalError> {
    match expr {
        Expr::Int(n) => Ok(*n),
        Expr::Symbol(name) => lookup(name).ok_or_else(|| EvalError::Unresolved(name.clone())),
        Expr::Unary(UnaryOp::Neg, inner) => Ok(-(eval(inner, lookup)? as i32) as i64),
        Expr::Binary(op, lhs, rhs) => {
            let l = eval(lhs, lookup)? as i32;
            let r = eval(rhs, lookup)? as i32;
            let result = match op {
                BinOp::Add => l.wrapping_add(r),
                BinOp::Sub => l.wrapping_sub(r),
                BinOp::Mul => l.wrapping_mul(r),
                BinOp::Div => {
                    if r == 0 {
                        return Err(EvalError::DivByZero);
                    }
                    l / r
                }
                BinOp::Mod => {
                    if r == 0 {
                        return Err(EvalError::DivByZero);
                    }
                    l % r
                }
            };
            Ok(result as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenizer::tokenize;

    fn parse_and_eval(text: &str, lookup: &dyn Fn(&str) -> Option<i64>) -> Result<i64, EvalError> {
        let tokens = tokenize(text).unwrap();
        let (expr, next) = parse_expr(&tokens, 0).unwrap();
        assert_eq!(next, tokens.len());
        eval(&expr, lookup)
    }

    #[test]
    fn precedence_and_associativity() {
        let none = |_: &str| None;
        assert_eq!(parse_and_eval("1 + 2 * 3", &none), Ok(7));
        assert_eq!(parse_and_eval("(1 + 2) * 3", &none), Ok(9));
        assert_eq!(parse_and_eval("10 - 2 - 3", &none), Ok(5));
        assert_eq!(parse_and_eval("-3 + 5", &none), Ok(2));
    }

    #[test]
    fn division_by_zero_is_fatal() {
        let none = |_: &str| None;
        assert_eq!(parse_and_eval("1 / 0", &none), Err(EvalError::DivByZero));
    }

    #[test]
    fn unresolved_symbol_is_reported() {
        let none = |_: &str| None;
        assert_eq!(
            parse_and_eval("label + 1", &none),
            Err(EvalError::Unresolved("label".to_string()))
        );
    }

    #[test]
    fn resolved_symbol_feeds_arithmetic() {
        let lookup = |name: &str| if name == "BIG" { Some(65500) } else { None };
        assert_eq!(parse_and_eval("BIG", &lookup), Ok(65500));
    }

    #[test]
    fn purity() {
        let lookup = |name: &str| if name == "x" { Some(4) } else { None };
        let a = parse_and_eval("x * 2 + 1", &lookup);
        let b = parse_and_eval("x * 2 + 1", &lookup);
        assert_eq!(a, b);
    }
}
