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

//! The numeric converter (§4.1). Sole authority on literal bases and on the
//! width classification that feeds operand-size inference in the encoder.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Base {
    Decimal,
    Hex,
    Octal,
    Binary,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Width {
    Bit8,
    Bit16,
}

/// Parses exactly the four documented sigils plus unprefixed decimal:
/// `$` hex, `&` or `0o` octal, `%` binary, no prefix decimal. Any other
/// leading character is a parse error.
pub fn parse(text: &str) -> Result<i64, String> {
    if let Some(rest) = text.strip_prefix('$') {
        return parse_radix(rest, 16, text);
    }
    if let Some(rest) = text.strip_prefix('%') {
        return parse_radix(rest, 2, text);
    }
    if let Some(rest) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        return parse_radix(rest, 8, text);
    }
    if let Some(rest) = text.strip_prefix('&') {
        return parse_radix(rest, 8, text);
    }
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        return parse_radix(text, 10, text);
    }
    Err(format!("invalid numeric literal: \"{text}\""))
}

fn parse_radix(digits: &str, radix: u32, original: &str) -> Result<i64, String> {
    if digits.is_empty() {
        return Err(format!("invalid numeric literal: \"{original}\""));
    }
    i64::from_str_radix(digits, radix).map_err(|_| format!("invalid numeric literal: \"{original}\""))
}

/// A single-quoted character literal, e.g. `'A'`, evaluates to its ASCII code.
pub fn parse_char_literal(text: &str) -> Result<i64, String> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(|| format!("invalid character literal: \"{text}\""))?;
    let mut chars = inner.chars();
    let c = chars
        .next()
        .ok_or_else(|| format!("empty character literal: \"{text}\""))?;
    if chars.next().is_some() {
        return Err(format!("character literal must be a single byte: \"{text}\""));
    }
    if !c.is_ascii() {
        return Err(format!("character literal must be ASCII: \"{text}\""));
    }
    Ok(c as i64)
}

/// Classifies a value by the narrowest unsigned width that represents it.
/// `$FFFF` is 16-bit-representable, `$FF` is 8-bit-representable.
pub fn classify(value: i64) -> Width {
    if (0..=0xFF).contains(&value) {
        Width::Bit8
    } else {
        Width::Bit16
    }
}

pub fn fits_u8(value: i64) -> bool {
    (0..=0xFF).contains(&value)
}

pub fn fits_i8(value: i64) -> bool {
    (-128..=127).contains(&value)
}

pub fn fits_u16(value: i64) -> bool {
    (0..=0xFFFF).contains(&value)
}

/// Formats an integer in the given base, zero-padded to the digit width
/// implied by `width`. Inverse of [`parse`].
pub fn format(value: i64, base: Base, width: Width) -> String {
    let digits = match width {
        Width::Bit8 => 2,
        Width::Bit16 => 4,
    };
    match base {
        Base::Decimal => format!("{value}"),
        Base::Hex => format!("${:0width$X}", value, width = digits),
        Base::Binary => {
            let bits = match width {
                Width::Bit8 => 8,
                Width::Bit16 => 16,
            };
            format!("%{:0width$b}", value, width = bits)
        }
        Base::Octal => format!("&{:0width$o}", value, width = digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_four_bases() {
        assert_eq!(parse("$FFDC").unwrap(), 0xFFDC);
        assert_eq!(parse("&17").unwrap(), 0o17);
        assert_eq!(parse("0o17").unwrap(), 0o17);
        assert_eq!(parse("%1010").unwrap(), 0b1010);
        assert_eq!(parse("65500").unwrap(), 65500);
    }

    #[test]
    fn rejects_unknown_sigil() {
        assert!(parse("#FF").is_err());
    }

    #[test]
    fn classifies_width_by_magnitude() {
        assert_eq!(classify(parse("$FFFF").unwrap()), Width::Bit16);
        assert_eq!(classify(parse("$FF").unwrap()), Width::Bit8);
    }

    #[test]
    fn round_trips_hex() {
        for n in [0i64, 1, 0x7F, 0xFF] {
            let text = format(n, Base::Hex, Width::Bit8);
            assert_eq!(parse(&text).unwrap(), n);
        }
        for n in [0i64, 0x1234, 0xFFFF] {
            let text = format(n, Base::Hex, Width::Bit16);
            assert_eq!(parse(&text).unwrap(), n);
        }
    }

    #[test]
    fn round_trips_binary_and_octal() {
        assert_eq!(parse(&format(0b101, Base::Binary, Width::Bit8)).unwrap(), 0b101);
        assert_eq!(parse(&format(0o17, Base::Octal, Width::Bit8)).unwrap(), 0o17);
    }

    #[test]
    fn char_literal_is_ascii_code() {
        assert_eq!(parse_char_literal("'A'").unwrap(), 65);
    }
}
