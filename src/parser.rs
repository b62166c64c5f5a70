//! Parsing of polynomials written with `+`, `-`, `*`, `^` and parentheses,
//! such as `(x+2*y)^2-3*x*y`. The expression is expanded while it is read.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use crate::domains::{integer::Integer, Ring};
use crate::poly::{polynomial::MultivariatePolynomial, Variable};

/// An error in the input of [parse_polynomial]. Positions are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnexpectedCharacter(char, usize),
    UnexpectedEnd,
    MissingParenthesis(usize),
    MissingExponent(usize),
    ExponentTooLarge(String),
    InvalidNumber(String),
    UndefinedVariable(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Expression is empty"),
            ParseError::UnexpectedCharacter(c, pos) => {
                write!(f, "Unexpected character '{}' at position {}", c, pos)
            }
            ParseError::UnexpectedEnd => write!(f, "Unexpected end of input"),
            ParseError::MissingParenthesis(pos) => {
                write!(f, "Missing closing parenthesis at position {}", pos)
            }
            ParseError::MissingExponent(pos) => write!(f, "Expected an exponent at position {}", pos),
            ParseError::ExponentTooLarge(e) => write!(f, "Exponent {} is too large", e),
            ParseError::InvalidNumber(e) => write!(f, "Invalid number: {}", e),
            ParseError::UndefinedVariable(v) => write!(f, "Undefined variable '{}'", v),
        }
    }
}

impl std::error::Error for ParseError {}

struct Parser<'a, R: Ring> {
    input: &'a [u8],
    pos: usize,
    field: &'a R,
    var_names: &'a [&'a str],
    template: MultivariatePolynomial<R, u16>,
}

impl<'a, R: Ring> Parser<'a, R> {
    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.input.get(self.pos).copied()
    }

    fn unexpected(&self) -> ParseError {
        match self.input.get(self.pos) {
            Some(c) => ParseError::UnexpectedCharacter(*c as char, self.pos),
            None => ParseError::UnexpectedEnd,
        }
    }

    /// expr := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<MultivariatePolynomial<R, u16>, ParseError> {
        let mut res = self.term()?;

        loop {
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    res = &res + &self.term()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    res = &res - &self.term()?;
                }
                _ => return Ok(res),
            }
        }
    }

    /// term := unary ('*' unary)*
    fn term(&mut self) -> Result<MultivariatePolynomial<R, u16>, ParseError> {
        let mut res = self.unary()?;

        while self.peek() == Some(b'*') {
            self.pos += 1;
            res = &res * &self.unary()?;
        }

        Ok(res)
    }

    /// unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<MultivariatePolynomial<R, u16>, ParseError> {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(b'+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    /// power := atom ('^' digits)?
    fn power(&mut self) -> Result<MultivariatePolynomial<R, u16>, ParseError> {
        let base = self.atom()?;

        if self.peek() != Some(b'^') {
            return Ok(base);
        }
        self.pos += 1;

        self.skip_whitespace();
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(ParseError::MissingExponent(self.pos));
        }

        let e: usize = digits
            .parse()
            .map_err(|_| ParseError::ExponentTooLarge(digits.to_string()))?;
        Ok(base.pow(e))
    }

    /// atom := number | variable | '(' expr ')'
    fn atom(&mut self) -> Result<MultivariatePolynomial<R, u16>, ParseError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let res = self.expression()?;
                if self.peek() != Some(b')') {
                    return Err(ParseError::MissingParenthesis(self.pos));
                }
                self.pos += 1;
                Ok(res)
            }
            Some(c) if c.is_ascii_digit() => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                let n = Integer::from_str(digits).map_err(ParseError::InvalidNumber)?;
                Ok(self.template.constant(self.field.nth(n)))
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_');
                match self.var_names.iter().position(|v| *v == name) {
                    Some(i) => Ok(self.template.variable(i)),
                    None => Err(ParseError::UndefinedVariable(name.to_string())),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    fn take_while(&mut self, f: impl Fn(u8) -> bool) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.pos < input.len() && f(input[self.pos]) {
            self.pos += 1;
        }

        // the accepted characters are ASCII
        std::str::from_utf8(&input[start..self.pos]).unwrap_or_default()
    }
}

/// Parse a polynomial in the variables `vars` with coefficients in `field`.
pub fn parse_polynomial<R: Ring>(
    input: &str,
    field: &R,
    vars: &[&str],
) -> Result<MultivariatePolynomial<R, u16>, ParseError> {
    let variables: Vec<Variable> = vars.iter().map(|v| Variable::from(*v)).collect();

    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
        field,
        var_names: vars,
        template: MultivariatePolynomial::new(field, None, Arc::new(variables)),
    };

    if parser.peek().is_none() {
        return Err(ParseError::Empty);
    }

    let res = parser.expression()?;
    if parser.peek().is_some() {
        return Err(parser.unexpected());
    }

    Ok(res)
}

#[cfg(test)]
mod test {
    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::integer::Z;

    use super::{parse_polynomial, ParseError};

    #[test]
    fn expand() {
        let vars = ["x", "y"];
        let p = parse_polynomial("(x+2*y)^2 - 3*x*y", &Z, &vars).unwrap();
        assert_eq!(p.to_string(), "x^2+x*y+4*y^2");

        let q = parse_polynomial("-x^2*(-y) + -(1)", &Z, &vars).unwrap();
        assert_eq!(q.to_string(), "x^2*y-1");
    }

    #[test]
    fn coefficients_in_field() {
        let field = Zp::new(7);
        let p = parse_polynomial("10*x+123456789012345678901234567894", &field, &["x"]).unwrap();
        // 123456789012345678901234567894 = 4 mod 7
        assert_eq!(p.to_string(), "3*x+4");
    }

    #[test]
    fn errors() {
        let vars = ["x"];
        assert!(parse_polynomial("", &Z, &vars).is_err());
        assert!(parse_polynomial("x+", &Z, &vars).is_err());
        assert!(parse_polynomial("(x+1", &Z, &vars).is_err());
        assert!(parse_polynomial("x^", &Z, &vars).is_err());
        assert_eq!(
            parse_polynomial("x+z", &Z, &vars),
            Err(ParseError::UndefinedVariable("z".to_string()))
        );
        assert_eq!(
            parse_polynomial("x y", &Z, &vars),
            Err(ParseError::UnexpectedCharacter('y', 2))
        );
        assert_eq!(parse_polynomial("  ", &Z, &vars), Err(ParseError::Empty));
    }
}
