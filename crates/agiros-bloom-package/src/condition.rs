//! Evaluation of dependency `condition` attributes
//!
//! Grammar (REP 149):
//!
//! ```text
//! expr       := and_expr ("or" and_expr)*
//! and_expr   := term ("and" term)*
//! term       := "(" expr ")" | comparison
//! comparison := operand op operand
//! op         := "==" | "!=" | "<" | "<=" | ">" | ">="
//! operand    := $IDENT | identifier | quoted string
//! ```
//!
//! Unset variables evaluate to the empty string. Comparisons are string
//! comparisons.

use std::collections::BTreeMap;

use agiros_bloom_core::{Dependency, Error, Result};

/// Variables visible to condition expressions
#[derive(Debug, Clone, Default)]
pub struct ConditionContext {
    vars: BTreeMap<String, String>,
}

impl ConditionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a distribution: `ROS_DISTRO`, `ROS_VERSION` and
    /// `ROS_PYTHON_VERSION`
    ///
    /// `ROS_VERSION` stays unset when the distribution type is unknown.
    pub fn for_distro(distro: &str, ros_version: Option<u32>, python_version: u32) -> Self {
        let context = Self::new()
            .with_var("ROS_DISTRO", distro)
            .with_var("ROS_PYTHON_VERSION", python_version.to_string());
        match ros_version {
            Some(version) => context.with_var("ROS_VERSION", version.to_string()),
            None => context,
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> &str {
        self.vars.get(name).map(String::as_str).unwrap_or("")
    }

    /// Evaluate a dependency's condition; dependencies without one always hold
    pub fn holds(&self, dependency: &Dependency) -> Result<bool> {
        match &dependency.condition {
            Some(condition) => evaluate(condition, self),
            None => Ok(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Var(String),
    Literal(String),
    Op(&'static str),
    And,
    Or,
    Open,
    Close,
}

/// Evaluate a condition expression
pub fn evaluate(condition: &str, context: &ConditionContext) -> Result<bool> {
    let tokens = tokenize(condition)?;
    if tokens.is_empty() {
        return Ok(true);
    }

    let mut parser = Parser { tokens: &tokens, pos: 0, condition, context };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(Error::invalid_condition(condition, "unexpected trailing tokens"));
    }
    Ok(value)
}

fn tokenize(condition: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = condition.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            '=' | '!' | '<' | '>' => {
                let next = chars.get(i + 1).copied();
                let op = match (c, next) {
                    ('=', Some('=')) => "==",
                    ('!', Some('=')) => "!=",
                    ('<', Some('=')) => "<=",
                    ('>', Some('=')) => ">=",
                    ('<', _) => "<",
                    ('>', _) => ">",
                    _ => return Err(Error::invalid_condition(condition, format!("bad operator at {i}"))),
                };
                i += op.len();
                tokens.push(Token::Op(op));
            }
            '"' | '\'' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == c)
                    .ok_or_else(|| Error::invalid_condition(condition, "unterminated string"))?;
                tokens.push(Token::Literal(chars[i + 1..i + 1 + end].iter().collect()));
                i += end + 2;
            }
            _ => {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                if start == i {
                    return Err(Error::invalid_condition(
                        condition,
                        format!("unexpected character '{c}'"),
                    ));
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    _ => match word.strip_prefix('$') {
                        Some(var) => Token::Var(var.to_string()),
                        None => Token::Literal(word),
                    },
                });
            }
        }
    }

    Ok(tokens)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '-')
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    condition: &'a str,
    context: &'a ConditionContext,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, reason: &str) -> Error {
        Error::invalid_condition(self.condition, reason)
    }

    fn expr(&mut self) -> Result<bool> {
        let mut value = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and_expr()?;
            value = value || rhs;
        }
        Ok(value)
    }

    fn and_expr(&mut self) -> Result<bool> {
        let mut value = self.term()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.term()?;
            value = value && rhs;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<bool> {
        if self.peek() == Some(&Token::Open) {
            self.pos += 1;
            let value = self.expr()?;
            return match self.next() {
                Some(Token::Close) => Ok(value),
                _ => Err(self.error("missing closing parenthesis")),
            };
        }

        let lhs = self.operand()?;
        let op = match self.next() {
            Some(Token::Op(op)) => op,
            _ => return Err(self.error("expected comparison operator")),
        };
        let rhs = self.operand()?;

        Ok(match op {
            "==" => lhs == rhs,
            "!=" => lhs != rhs,
            "<" => lhs < rhs,
            "<=" => lhs <= rhs,
            ">" => lhs > rhs,
            ">=" => lhs >= rhs,
            _ => unreachable!("tokenizer only emits known operators"),
        })
    }

    fn operand(&mut self) -> Result<String> {
        match self.next() {
            Some(Token::Var(name)) => Ok(self.context.get(&name).to_string()),
            Some(Token::Literal(value)) => Ok(value),
            _ => Err(self.error("expected operand")),
        }
    }
}
