use std::fmt::Display;

use crate::tokenizer::{Keyword, Operator, Token};

/// One executable statement. It borrows from the token stream and lives only until it has
/// been executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Assign {
        name: &'a str,
        operator: AssignOperator,
        value: Operand<'a>,
    },
    Print(Operand<'a>),
}

/// Right-hand side of an assignment or the argument of a print.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<'a> {
    Text(&'a str),
    Variable(&'a str),
    Expression(&'a [Token]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOperator {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl AssignOperator {
    pub fn from_operator(operator: Operator) -> Option<Self> {
        match operator {
            Operator::Equal => Some(AssignOperator::Assign),
            Operator::PlusEqual => Some(AssignOperator::Add),
            Operator::MinusEqual => Some(AssignOperator::Subtract),
            Operator::StarEqual => Some(AssignOperator::Multiply),
            Operator::SlashEqual => Some(AssignOperator::Divide),
            Operator::PercentEqual => Some(AssignOperator::Modulo),
            _ => None,
        }
    }

    /// The arithmetic a compound assignment applies, `None` for plain `=`.
    pub fn arithmetic(&self) -> Option<ArithmeticOperator> {
        match self {
            AssignOperator::Assign => None,
            AssignOperator::Add => Some(ArithmeticOperator::Add),
            AssignOperator::Subtract => Some(ArithmeticOperator::Subtract),
            AssignOperator::Multiply => Some(ArithmeticOperator::Multiply),
            AssignOperator::Divide => Some(ArithmeticOperator::Divide),
            AssignOperator::Modulo => Some(ArithmeticOperator::Modulo),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithmeticOperator::Add => write!(f, "+"),
            ArithmeticOperator::Subtract => write!(f, "-"),
            ArithmeticOperator::Multiply => write!(f, "*"),
            ArithmeticOperator::Divide => write!(f, "/"),
            ArithmeticOperator::Modulo => write!(f, "%"),
        }
    }
}

impl Display for AssignOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.arithmetic() {
            Some(op) => write!(f, "{}=", op),
            None => write!(f, "="),
        }
    }
}

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Text(text) => write!(f, "\"{}\"", text),
            Operand::Variable(name) => write!(f, "{}", name),
            Operand::Expression(tokens) => {
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", token)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Assign {
                name,
                operator,
                value,
            } => write!(f, "{} {} {};", name, operator, value),
            Statement::Print(operand) => write!(f, "{}({});", Keyword::Print, operand),
        }
    }
}
