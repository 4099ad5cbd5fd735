//! Lex a GPR string into a series of tokens for evaluation
//!
//! Identifier resolution happens here rather than during evaluation: every
//! gene id is looked up in the [`ExpressionMap`] while it is being read, with
//! absent ids falling back to the caller's default value. The evaluator then
//! operates purely on numbers and a two-operator vocabulary.

use crate::eflux::expression::ExpressionMap;
use crate::eflux::token::{Aggregator, Token};

pub struct Lexer<'e> {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    expression: &'e ExpressionMap,
    default_value: f64,
}

impl<'e> Lexer<'e> {
    pub fn new(source: &str, expression: &'e ExpressionMap, default_value: f64) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            expression,
            default_value,
        }
    }

    /// Scan the whole source, consuming the lexer and returning the token vec
    ///
    /// Lexing a GPR cannot fail: parentheses and connectives have fixed
    /// spellings, and every other whitespace-delimited run is a gene id whose
    /// lookup miss resolves to the default value.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::Eof);
        self.tokens
    }

    fn scan_token(&mut self) {
        let c: char = self.advance();
        match c {
            '(' => self.add_token(Token::LeftParen),
            ')' => self.add_token(Token::RightParen),
            c if c.is_whitespace() => {}
            _ => self.read_identifier(),
        };
    }

    fn advance(&mut self) -> char {
        let char_at_current = self.source[self.current];
        self.current += 1;
        char_at_current
    }

    /// Read a maximal non-whitespace, non-parenthesis run and map it
    fn read_identifier(&mut self) {
        while Lexer::is_identifier_char(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        match text.as_str() {
            // Capitalized forms appear in rules pre-normalized upstream
            "and" | "And" | "AND" => self.add_token(Token::Operator(Aggregator::Min)),
            "or" | "Or" | "OR" => self.add_token(Token::Operator(Aggregator::Sum)),
            gene => {
                let value = self.expression.get_or(gene, self.default_value);
                self.add_token(Token::Value(value));
            }
        }
    }

    fn is_identifier_char(c: char) -> bool {
        !c.is_whitespace() && c != '(' && c != ')' && c != '\0'
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eflux::expression::test_support::map_from;

    #[test]
    fn single_gene() {
        let expression = map_from(&[("Rv0023", 0.75)]);
        let tokens = Lexer::new("Rv0023", &expression, 0.0).scan_tokens();
        assert_eq!(tokens, vec![Token::Value(0.75), Token::Eof]);
    }

    #[test]
    fn unknown_gene_resolves_to_default() {
        let expression = ExpressionMap::default();
        let tokens = Lexer::new("geneX", &expression, 0.3).scan_tokens();
        assert_eq!(tokens, vec![Token::Value(0.3), Token::Eof]);
    }

    #[test]
    fn grouping() {
        let expression = map_from(&[("Rv0023", 0.2), ("Rv0123", 0.9)]);
        let tokens = Lexer::new("(Rv0023 or Rv0123)", &expression, 0.0).scan_tokens();
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Value(0.2),
                Token::Operator(Aggregator::Sum),
                Token::Value(0.9),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn uppercase_connectives() {
        let expression = map_from(&[("a", 0.1), ("b", 0.4)]);
        let tokens = Lexer::new("a AND b", &expression, 0.0).scan_tokens();
        assert_eq!(
            tokens,
            vec![
                Token::Value(0.1),
                Token::Operator(Aggregator::Min),
                Token::Value(0.4),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn capitalized_connectives() {
        // "And"/"Or" are connectives, never gene ids resolved to the default
        let expression = map_from(&[("a", 0.1), ("b", 0.4)]);
        let tokens = Lexer::new("a And b Or a", &expression, 9.0).scan_tokens();
        assert_eq!(
            tokens,
            vec![
                Token::Value(0.1),
                Token::Operator(Aggregator::Min),
                Token::Value(0.4),
                Token::Operator(Aggregator::Sum),
                Token::Value(0.1),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn identifiers_may_contain_punctuation() {
        // Locus tags like "ENSG00000139618.15" or "b1723-2" are single tokens
        let expression = map_from(&[("ENSG00000139618.15", 0.6)]);
        let tokens = Lexer::new("ENSG00000139618.15", &expression, 0.0).scan_tokens();
        assert_eq!(tokens, vec![Token::Value(0.6), Token::Eof]);
    }

    #[test]
    fn parens_split_without_whitespace() {
        let expression = map_from(&[("a", 0.5)]);
        let tokens = Lexer::new("(a)", &expression, 0.0).scan_tokens();
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Value(0.5),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn empty_source_yields_only_eof() {
        let expression = ExpressionMap::default();
        let tokens = Lexer::new("", &expression, 0.0).scan_tokens();
        assert_eq!(tokens, vec![Token::Eof]);
    }
}
