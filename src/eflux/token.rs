//! Module providing the Token enum produced by lexing a GPR string

/// Represents Tokens in a GPR expression
///
/// Gene identifiers never survive lexing: they are resolved against the
/// expression data as soon as they are read, so the evaluator only ever sees
/// parentheses, operators, and concrete values.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// A resolved gene expression value
    Value(f64),
    /// An `and`/`or` connective mapped to its numeric aggregation
    Operator(Aggregator),
    LeftParen,
    RightParen,
    Eof,
}

/// Numeric aggregation applied by a GPR connective
///
/// `and` requires every gene product, so the limiting expression level wins;
/// `or` offers alternative enzymes, so expression levels add.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Aggregator {
    /// Minimum of both sides, from `and`
    Min,
    /// Sum of both sides, from `or`
    Sum,
}

impl Aggregator {
    /// Combine two evaluated subexpressions
    pub fn combine(&self, left: f64, right: f64) -> f64 {
        match self {
            Aggregator::Min => left.min(right),
            Aggregator::Sum => left + right,
        }
    }
}
