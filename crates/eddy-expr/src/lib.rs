//! Expression language for formula-driven fields.
//!
//! A small expression parser that compiles user-entered strings into
//! evaluable ASTs. All functions are registered via the [`ExprFn`] trait -
//! no hardcoded function set. Variables are resolved at evaluation time
//! against a [`Scope`] of named bindings, so the same expression language
//! serves spatial scopes (`x, y, z, t`) and parametric scopes (`u, v, t`).
//!
//! # Syntax
//!
//! ```text
//! // Variables (any bare identifier; resolved against the scope)
//! x, y, z, t, u, v
//!
//! // Operators (precedence low to high)
//! a + b, a - b     // Addition, subtraction
//! a * b, a / b     // Multiplication, division
//! a ^ b            // Exponentiation (right associative)
//! -a               // Negation
//!
//! // Functions (registered via ExprFn trait)
//! sin(x), cos(x), sqrt(x), abs(x)
//! min(a, b), clamp(x, lo, hi), lerp(a, b, t)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use eddy_expr::{Expr, FunctionRegistry, Scope};
//!
//! let registry = FunctionRegistry::new();
//! let expr = Expr::parse("x * (28 - z) - y").unwrap();
//! let vars = [("x", 1.0), ("y", 1.0), ("z", 1.0), ("t", 0.0)];
//! let value = expr.eval(Scope::new(&vars), &registry).unwrap();
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use thiserror::Error;

// ============================================================================
// ExprFn trait and registry
// ============================================================================

/// A function that can be called from expressions.
///
/// All functions (including sin, cos, etc.) implement this trait.
/// There are no hardcoded functions - everything is registered.
pub trait ExprFn: Send + Sync {
    /// Function name (e.g., "sin", "clamp").
    fn name(&self) -> &str;

    /// Number of arguments this function expects.
    fn arg_count(&self) -> usize;

    /// Evaluates the function on already-evaluated arguments.
    fn call(&self, args: &[f32]) -> f32;
}

/// Registry of expression functions.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    funcs: HashMap<String, Arc<dyn ExprFn>>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function.
    pub fn register<F: ExprFn + 'static>(&mut self, func: F) {
        self.funcs.insert(func.name().to_string(), Arc::new(func));
    }

    /// Gets a function by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ExprFn>> {
        self.funcs.get(name)
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Named variable bindings an expression is evaluated against.
///
/// Backed by a borrowed slice; lookup is a linear scan. Scopes hold at most
/// a handful of entries and are rebuilt per particle per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    vars: &'a [(&'a str, f32)],
}

impl<'a> Scope<'a> {
    /// Creates a scope over the given bindings.
    pub fn new(vars: &'a [(&'a str, f32)]) -> Self {
        Self { vars }
    }

    /// Looks up a variable by name.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.vars
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Expression parse error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A character outside the expression grammar.
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),

    /// Input ended mid-expression.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A token that cannot appear at this position.
    #[error("unexpected token: '{0}'")]
    UnexpectedToken(String),

    /// A numeric literal that failed to parse.
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
}

/// Expression evaluation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable not bound in the evaluation scope.
    #[error("unknown variable: '{0}'")]
    UnknownVariable(String),

    /// A function not present in the registry.
    #[error("unknown function: '{0}'")]
    UnknownFunction(String),

    /// A call with the wrong number of arguments.
    #[error("function '{func}' expects {expected} args, got {got}")]
    WrongArgCount {
        /// Function name.
        func: String,
        /// Declared arity.
        expected: usize,
        /// Arguments supplied.
        got: usize,
    },
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f32),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
    Eof,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<f32, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || c == '.' {
                self.next_char();
            } else {
                break;
            }
        }
        let s = &self.input[start..self.pos];
        s.parse()
            .map_err(|_| ParseError::InvalidNumber(s.to_string()))
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        match c {
            '+' => {
                self.next_char();
                Ok(Token::Plus)
            }
            '-' => {
                self.next_char();
                Ok(Token::Minus)
            }
            '*' => {
                self.next_char();
                Ok(Token::Star)
            }
            '/' => {
                self.next_char();
                Ok(Token::Slash)
            }
            '^' => {
                self.next_char();
                Ok(Token::Caret)
            }
            '(' => {
                self.next_char();
                Ok(Token::LParen)
            }
            ')' => {
                self.next_char();
                Ok(Token::RParen)
            }
            ',' => {
                self.next_char();
                Ok(Token::Comma)
            }
            '0'..='9' | '.' => Ok(Token::Number(self.read_number()?)),
            'a'..='z' | 'A'..='Z' | '_' => Ok(Token::Ident(self.read_ident())),
            _ => Err(ParseError::UnexpectedChar(c)),
        }
    }
}

// ============================================================================
// AST
// ============================================================================

/// AST node for expressions.
#[derive(Debug, Clone)]
pub enum Ast {
    /// Numeric literal.
    Num(f32),
    /// Variable reference, resolved against the scope at evaluation.
    Var(String),
    /// Binary operation.
    BinOp(BinOp, Box<Ast>, Box<Ast>),
    /// Unary operation.
    UnaryOp(UnaryOp, Box<Ast>),
    /// Function call.
    Call(String, Vec<Ast>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.current == expected {
            self.advance()
        } else {
            Err(ParseError::UnexpectedToken(format!("{:?}", self.current)))
        }
    }

    fn parse_expr(&mut self) -> Result<Ast, ParseError> {
        self.parse_add_sub()
    }

    fn parse_add_sub(&mut self) -> Result<Ast, ParseError> {
        let mut left = self.parse_mul_div()?;

        loop {
            match &self.current {
                Token::Plus => {
                    self.advance()?;
                    let right = self.parse_mul_div()?;
                    left = Ast::BinOp(BinOp::Add, Box::new(left), Box::new(right));
                }
                Token::Minus => {
                    self.advance()?;
                    let right = self.parse_mul_div()?;
                    left = Ast::BinOp(BinOp::Sub, Box::new(left), Box::new(right));
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_mul_div(&mut self) -> Result<Ast, ParseError> {
        let mut left = self.parse_power()?;

        loop {
            match &self.current {
                Token::Star => {
                    self.advance()?;
                    let right = self.parse_power()?;
                    left = Ast::BinOp(BinOp::Mul, Box::new(left), Box::new(right));
                }
                Token::Slash => {
                    self.advance()?;
                    let right = self.parse_power()?;
                    left = Ast::BinOp(BinOp::Div, Box::new(left), Box::new(right));
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Ast, ParseError> {
        let base = self.parse_unary()?;

        if self.current == Token::Caret {
            self.advance()?;
            let exp = self.parse_power()?; // Right associative
            Ok(Ast::BinOp(BinOp::Pow, Box::new(base), Box::new(exp)))
        } else {
            Ok(base)
        }
    }

    fn parse_unary(&mut self) -> Result<Ast, ParseError> {
        if self.current == Token::Minus {
            self.advance()?;
            let inner = self.parse_unary()?;
            Ok(Ast::UnaryOp(UnaryOp::Neg, Box::new(inner)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<Ast, ParseError> {
        match &self.current {
            Token::Number(n) => {
                let n = *n;
                self.advance()?;
                Ok(Ast::Num(n))
            }
            Token::Ident(name) => {
                let name = name.clone();
                self.advance()?;

                // Function call if followed by '(', variable otherwise
                if self.current == Token::LParen {
                    self.advance()?;
                    let mut args = Vec::new();
                    if self.current != Token::RParen {
                        args.push(self.parse_expr()?);
                        while self.current == Token::Comma {
                            self.advance()?;
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.expect(Token::RParen)?;
                    Ok(Ast::Call(name, args))
                } else {
                    Ok(Ast::Var(name))
                }
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Eof => Err(ParseError::UnexpectedEnd),
            _ => Err(ParseError::UnexpectedToken(format!("{:?}", self.current))),
        }
    }
}

// ============================================================================
// Expression
// ============================================================================

/// A compiled expression that can be evaluated against a scope.
#[derive(Debug, Clone)]
pub struct Expr {
    ast: Ast,
}

impl Expr {
    /// Parses an expression from a string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new(input)?;
        let ast = parser.parse_expr()?;
        if parser.current != Token::Eof {
            return Err(ParseError::UnexpectedToken(format!("{:?}", parser.current)));
        }
        Ok(Self { ast })
    }

    /// Evaluates the expression against the given scope.
    ///
    /// Arithmetic follows IEEE f32 semantics: division by zero yields
    /// infinity, not an error. Errors only arise from unbound variables,
    /// unknown functions, or arity mismatches.
    pub fn eval(&self, scope: Scope<'_>, registry: &FunctionRegistry) -> Result<f32, EvalError> {
        Self::eval_ast(&self.ast, scope, registry)
    }

    /// Returns the set of variable names the expression references.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        Self::collect_vars(&self.ast, &mut out);
        out
    }

    fn collect_vars<'e>(ast: &'e Ast, out: &mut BTreeSet<&'e str>) {
        match ast {
            Ast::Num(_) => {}
            Ast::Var(name) => {
                out.insert(name.as_str());
            }
            Ast::BinOp(_, l, r) => {
                Self::collect_vars(l, out);
                Self::collect_vars(r, out);
            }
            Ast::UnaryOp(_, inner) => Self::collect_vars(inner, out),
            Ast::Call(_, args) => {
                for arg in args {
                    Self::collect_vars(arg, out);
                }
            }
        }
    }

    fn eval_ast(
        ast: &Ast,
        scope: Scope<'_>,
        registry: &FunctionRegistry,
    ) -> Result<f32, EvalError> {
        match ast {
            Ast::Num(n) => Ok(*n),
            Ast::Var(name) => scope
                .get(name)
                .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
            Ast::BinOp(op, l, r) => {
                let l = Self::eval_ast(l, scope, registry)?;
                let r = Self::eval_ast(r, scope, registry)?;
                Ok(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                })
            }
            Ast::UnaryOp(op, inner) => {
                let v = Self::eval_ast(inner, scope, registry)?;
                Ok(match op {
                    UnaryOp::Neg => -v,
                })
            }
            Ast::Call(name, args) => {
                let func = registry
                    .get(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;

                if args.len() != func.arg_count() {
                    return Err(EvalError::WrongArgCount {
                        func: name.clone(),
                        expected: func.arg_count(),
                        got: args.len(),
                    });
                }

                let arg_values: Vec<f32> = args
                    .iter()
                    .map(|a| Self::eval_ast(a, scope, registry))
                    .collect::<Result<_, _>>()?;

                Ok(func.call(&arg_values))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Sin;
    impl ExprFn for Sin {
        fn name(&self) -> &str {
            "sin"
        }
        fn arg_count(&self) -> usize {
            1
        }
        fn call(&self, args: &[f32]) -> f32 {
            args[0].sin()
        }
    }

    fn test_registry() -> FunctionRegistry {
        let mut r = FunctionRegistry::new();
        r.register(Sin);
        r
    }

    fn eval(expr: &str, vars: &[(&str, f32)]) -> f32 {
        let registry = test_registry();
        let expr = Expr::parse(expr).unwrap();
        expr.eval(Scope::new(vars), &registry).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(eval("42", &[]), 42.0);
    }

    #[test]
    fn test_parse_float() {
        assert!((eval("1.234", &[]) - 1.234).abs() < 0.001);
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(eval("x", &[("x", 5.0)]), 5.0);
        assert_eq!(eval("v", &[("u", 0.0), ("v", 3.0)]), 3.0);
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(eval("1 + 2", &[]), 3.0);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4", &[]), 14.0);
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(eval("(2 + 3) * 4", &[]), 20.0);
    }

    #[test]
    fn test_negation() {
        assert_eq!(eval("-5", &[]), -5.0);
        let v = eval("-y + 0.1 * x", &[("x", 2.0), ("y", 1.0)]);
        assert!((v - (-0.8)).abs() < 1e-6);
    }

    #[test]
    fn test_power_right_associative() {
        assert_eq!(eval("2 ^ 3", &[]), 8.0);
        assert_eq!(eval("2 ^ 3 ^ 2", &[]), 512.0);
    }

    #[test]
    fn test_division_by_zero_is_infinity() {
        assert!(eval("1 / 0", &[]).is_infinite());
    }

    #[test]
    fn test_function_call() {
        assert!(eval("sin(0)", &[]).abs() < 0.001);
    }

    #[test]
    fn test_lorenz_component() {
        let v = eval("x * (28 - z) - y", &[("x", 1.0), ("y", 1.0), ("z", 1.0)]);
        assert_eq!(v, 26.0);
    }

    #[test]
    fn test_unknown_variable() {
        let registry = test_registry();
        let expr = Expr::parse("w + 1").unwrap();
        let result = expr.eval(Scope::new(&[("x", 0.0)]), &registry);
        assert!(matches!(result, Err(EvalError::UnknownVariable(_))));
    }

    #[test]
    fn test_unknown_function() {
        let registry = test_registry();
        let expr = Expr::parse("unknown(1)").unwrap();
        let result = expr.eval(Scope::default(), &registry);
        assert!(matches!(result, Err(EvalError::UnknownFunction(_))));
    }

    #[test]
    fn test_wrong_arg_count() {
        let registry = test_registry();
        let expr = Expr::parse("sin(1, 2)").unwrap();
        let result = expr.eval(Scope::default(), &registry);
        assert!(matches!(result, Err(EvalError::WrongArgCount { .. })));
    }

    #[test]
    fn test_variables_are_collected() {
        let expr = Expr::parse("sin(t + u) * v").unwrap();
        let vars: Vec<&str> = expr.variables().into_iter().collect();
        assert_eq!(vars, vec!["t", "u", "v"]);
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(Expr::parse("1 + 2 )").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(Expr::parse(""), Err(ParseError::UnexpectedEnd)));
    }

    #[test]
    fn test_bad_character_rejected() {
        assert!(matches!(
            Expr::parse("1 $ 2"),
            Err(ParseError::UnexpectedChar('$'))
        ));
    }

    #[test]
    fn test_custom_function() {
        struct Double;
        impl ExprFn for Double {
            fn name(&self) -> &str {
                "double"
            }
            fn arg_count(&self) -> usize {
                1
            }
            fn call(&self, args: &[f32]) -> f32 {
                args[0] * 2.0
            }
        }

        let mut registry = test_registry();
        registry.register(Double);

        let expr = Expr::parse("double(5)").unwrap();
        assert_eq!(expr.eval(Scope::default(), &registry).unwrap(), 10.0);
    }
}
