//! Evaluate a lexed GPR token sequence into a single expression scalar
//!
//! The token stream is parsed by recursive descent into an explicit tree,
//! then folded in one pass. Connectives chain left to right with no
//! precedence between `and` and `or`; well-formed GPR rules are
//! pre-parenthesized upstream, and a mixed flat run like `a and b or c`
//! evaluates as `(a and b) or c`.

use crate::eflux::token::{Aggregator, Token};

use thiserror::Error;
/*
GPR value grammar:
expression -> primary (("and" | "or") primary)* ;
primary -> VALUE | "(" expression ")" ;

e.g. (Gene1 and Gene2) or Gene3, with every gene already resolved to a value
*/

/// A GPR expression tree over resolved gene values
#[derive(Clone, Debug, PartialEq)]
pub enum GprExpr {
    /// A resolved gene expression value
    Leaf(f64),
    /// An aggregation of two subexpressions
    Node {
        op: Aggregator,
        left: Box<GprExpr>,
        right: Box<GprExpr>,
    },
}

impl GprExpr {
    /// Fold the tree into its scalar value
    pub fn fold(&self) -> f64 {
        match self {
            GprExpr::Leaf(value) => *value,
            GprExpr::Node { op, left, right } => op.combine(left.fold(), right.fold()),
        }
    }
}

/// GPR evaluator, consuming the token vec produced by [`Lexer`](super::lexer::Lexer)
pub struct GprEvaluator {
    /// Vector of tokens from the GPR string
    tokens: Vec<Token>,
    /// Current token being processed
    current: usize,
}

impl GprEvaluator {
    /// Create a new GprEvaluator
    pub fn new(tokens: Vec<Token>) -> GprEvaluator {
        GprEvaluator { tokens, current: 0 }
    }

    /// Evaluate the token vector to a single scalar
    pub fn evaluate(&mut self) -> Result<f64, GprEvalError> {
        let tree = self.expression()?;
        if !self.is_at_end() {
            // A complete expression was parsed but input remains, e.g. a
            // stray closing parenthesis
            return Err(GprEvalError::TrailingTokens);
        }
        Ok(tree.fold())
    }

    fn expression(&mut self) -> Result<GprExpr, GprEvalError> {
        let mut expr = self.primary()?;

        while let Some(op) = self.match_operator() {
            let right = self.primary()?;
            expr = GprExpr::Node {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<GprExpr, GprEvalError> {
        if let Some(value) = self.match_value() {
            return Ok(GprExpr::Leaf(value));
        }

        if self.match_token(Token::LeftParen) {
            let expr = self.expression()?;
            self.consume(Token::RightParen)?;
            return Ok(expr);
        }

        Err(GprEvalError::ExpectedOperand)
    }

    /// If the current token is an operator, advance past it and return its kind
    fn match_operator(&mut self) -> Option<Aggregator> {
        if let Token::Operator(op) = self.peek() {
            self.advance();
            return Some(op);
        }
        None
    }

    /// If the current token is a value, advance past it and return it
    fn match_value(&mut self) -> Option<f64> {
        if let Token::Value(value) = self.peek() {
            self.advance();
            return Some(value);
        }
        None
    }

    /// Check whether the current token matches `token`, advancing if it does
    fn match_token(&mut self, token: Token) -> bool {
        if self.check(&token) {
            self.advance();
            return true;
        }
        false
    }

    /// Check whether the current token matches the provided `token`
    fn check(&self, token: &Token) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek() == *token
    }

    /// Advance `self.current` one position unless at end of the token vec
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// Check whether the evaluator is at the end of the token vec
    fn is_at_end(&self) -> bool {
        self.peek() == Token::Eof
    }

    /// Get a copy of the current token
    ///
    /// Positions past the end of the vec read as [`Token::Eof`], so a token
    /// vec without a trailing Eof (which [`Lexer`](super::lexer::Lexer)
    /// always appends) still terminates cleanly.
    fn peek(&self) -> Token {
        self.tokens.get(self.current).cloned().unwrap_or(Token::Eof)
    }

    /// Require the current token to match `token`, used to close parentheses
    fn consume(&mut self, token: Token) -> Result<(), GprEvalError> {
        if self.check(&token) {
            self.advance();
            return Ok(());
        }
        // Depth never returned to zero before the sequence ran out
        Err(GprEvalError::UnbalancedParenthesis)
    }
}

/// Enum representing possible GPR evaluation errors
///
/// Lookup misses and empty rules are not errors: the former resolve to the
/// default value at lex time, the latter are handled before the evaluator is
/// invoked (see [`constrain_reaction`](super::constrain::constrain_reaction)).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GprEvalError {
    /// An opened parenthesis was never closed
    #[error("unbalanced expression, expected `)` before end of rule")]
    UnbalancedParenthesis,
    /// A gene value or grouped expression was expected but not found
    #[error("expected a gene or `(`, check for dangling connectives")]
    ExpectedOperand,
    /// Input continued after a complete expression, e.g. a stray `)`
    #[error("trailing tokens after the end of the expression")]
    TrailingTokens,
}
