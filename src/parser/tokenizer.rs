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

//! The tokenizer (§4.4). The line grammar in `grammar.pest` carves a source
//! line into label / directive / instruction / operand-text spans; this
//! module turns an operand-text span into the typed token stream the
//! expression evaluator and operand classifier consume.

use crate::assembler::numeric;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(i64),
    Ident(String),
    Op(char),
}

/// Lexes a single operand/expression text span. Whitespace separates tokens
/// except inside string or character literals, both of which are folded
/// into `Number`/consumed before this function is ever called on bare
/// arithmetic text (strings are recognized at the grammar layer).
pub fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if matches!(c, '+' | '-' | '*' | '/' | '%' | '(' | ')') {
            // A leading sigil consumed below, or a bare '%'-binary literal:
            // only treat '%' as an operator when it is not immediately
            // followed by a binary digit run that a numeric literal owns.
            if c == '%' && chars.get(i + 1).is_some_and(|n| *n == '0' || *n == '1') {
                let (num, next) = lex_number(&chars, i)?;
                tokens.push(Token::Number(num));
                i = next;
                continue;
            }
            tokens.push(Token::Op(c));
            i += 1;
            continue;
        }

        if c == '\'' {
            let (num, next) = lex_char_literal(&chars, i)?;
            tokens.push(Token::Number(num));
            i = next;
            continue;
        }

        if c == '$' || c == '&' || c.is_ascii_digit() {
            let (num, next) = lex_number(&chars, i)?;
            tokens.push(Token::Number(num));
            i = next;
            continue;
        }

        if c == '.' || c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            tokens.push(Token::Ident(word));
            continue;
        }

        return Err(format!("unexpected character '{c}' in expression \"{text}\""));
    }

    Ok(tokens)
}

fn lex_number(chars: &[char], start: usize) -> Result<(i64, usize), String> {
    let mut end = start + 1;
    if chars[start] == '0' && chars.get(start + 1).is_some_and(|c| *c == 'o' || *c == 'O') {
        end = start + 2;
    }
    while end < chars.len() && (chars[end].is_ascii_alphanumeric()) {
        end += 1;
    }
    let text: String = chars[start..end].iter().collect();
    let value = numeric::parse(&text)?;
    Ok((value, end))
}

fn lex_char_literal(chars: &[char], start: usize) -> Result<(i64, usize), String> {
    let end = chars[start + 1..]
        .iter()
        .position(|c| *c == '\'')
        .map(|p| start + 1 + p + 1)
        .ok_or_else(|| "unterminated character literal".to_string())?;
    let text: String = chars[start..end].iter().collect();
    let value = numeric::parse_char_literal(&text)?;
    Ok((value, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_arithmetic() {
        let toks = tokenize("1 + 2 * (label - 3)").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Number(1),
                Token::Op('+'),
                Token::Number(2),
                Token::Op('*'),
                Token::Op('('),
                Token::Ident("label".to_string()),
                Token::Op('-'),
                Token::Number(3),
                Token::Op(')'),
            ]
        );
    }

    #[test]
    fn tokenizes_all_bases_and_char_literal() {
        let toks = tokenize("$FF + %1010 + &17 + 'A'").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Number(0xFF),
                Token::Op('+'),
                Token::Number(0b1010),
                Token::Op('+'),
                Token::Number(0o17),
                Token::Op('+'),
                Token::Number(65),
            ]
        );
    }

    #[test]
    fn tokenizes_local_label() {
        let toks = tokenize(".loop").unwrap();
        assert_eq!(toks, vec![Token::Ident(".loop".to_string())]);
    }
}
