use crate::{
    ast::ArithmeticOperator,
    parser::{consume, first, ParseError},
    tokenizer::{Operator, Token},
};

use super::{symbol_table::SymbolTable, ExecutionErrorKind, Value, ValueKind};

/// Deepest parenthesis nesting an expression may use.
pub const MAX_NESTING: usize = 256;

/// Evaluates `tokens` as one whole expression.
pub fn evaluate(symbols: &SymbolTable, tokens: &[Token]) -> Result<Value, ExecutionErrorKind> {
    let (value, rest) = expression(symbols, tokens, 0)?;
    match rest.first() {
        None => Ok(value),
        Some(token) => Err(ParseError::TrailingToken(token.clone()).into()),
    }
}

/// expression := term (('+' | '-') term)*
fn expression<'a>(
    symbols: &SymbolTable,
    tokens: &'a [Token],
    depth: usize,
) -> Result<(Value, &'a [Token]), ExecutionErrorKind> {
    binary(
        symbols,
        term,
        |token| match token {
            Token::Operator(Operator::Plus) => Some(ArithmeticOperator::Add),
            Token::Operator(Operator::Minus) => Some(ArithmeticOperator::Subtract),
            _ => None,
        },
        tokens,
        depth,
    )
}

/// term := primary (('*' | '/') primary)*
fn term<'a>(
    symbols: &SymbolTable,
    tokens: &'a [Token],
    depth: usize,
) -> Result<(Value, &'a [Token]), ExecutionErrorKind> {
    binary(
        symbols,
        primary,
        |token| match token {
            Token::Operator(Operator::Star) => Some(ArithmeticOperator::Multiply),
            Token::Operator(Operator::Slash) => Some(ArithmeticOperator::Divide),
            _ => None,
        },
        tokens,
        depth,
    )
}

fn binary<'a>(
    symbols: &SymbolTable,
    precedence: impl Fn(
        &SymbolTable,
        &'a [Token],
        usize,
    ) -> Result<(Value, &'a [Token]), ExecutionErrorKind>,
    operator: impl Fn(&Token) -> Option<ArithmeticOperator>,
    tokens: &'a [Token],
    depth: usize,
) -> Result<(Value, &'a [Token]), ExecutionErrorKind> {
    let (mut value, mut tokens) = precedence(symbols, tokens, depth)?;

    while let Some(token) = tokens.first() {
        let op = match operator(token) {
            Some(op) => op,
            None => break,
        };
        let (right, rest) = precedence(symbols, &tokens[1..], depth)?;
        value = apply(op, value, right)?;
        tokens = rest;
    }

    Ok((value, tokens))
}

/// primary := Integer | Double | Identifier | '(' expression ')'
fn primary<'a>(
    symbols: &SymbolTable,
    tokens: &'a [Token],
    depth: usize,
) -> Result<(Value, &'a [Token]), ExecutionErrorKind> {
    match first(tokens) {
        Token::Integer(n) => Ok((Value::Integer(*n), &tokens[1..])),
        Token::Double(n) => Ok((Value::Double(*n), &tokens[1..])),
        Token::Identifier(name) => Ok((symbols.get_number(name)?.clone(), &tokens[1..])),
        Token::Operator(Operator::LeftParen) if depth >= MAX_NESTING => {
            Err(ParseError::NestingTooDeep(MAX_NESTING).into())
        }
        Token::Operator(Operator::LeftParen) => {
            let (value, rest) = expression(symbols, &tokens[1..], depth + 1)?;
            let rest = consume(rest, Operator::RightParen)?;
            Ok((value, rest))
        }
        token => Err(ParseError::ExpectedOperand(token.clone()).into()),
    }
}

/// Combines two values, promoting an Integer operand to Double when the other one is a
/// Double. Strings take part in no arithmetic.
pub fn apply(
    operator: ArithmeticOperator,
    left: Value,
    right: Value,
) -> Result<Value, ExecutionErrorKind> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer(operator, a, b).map(Value::Integer),
        (Value::Integer(a), Value::Double(b)) => double(operator, a as f64, b).map(Value::Double),
        (Value::Double(a), Value::Integer(b)) => double(operator, a, b as f64).map(Value::Double),
        (Value::Double(a), Value::Double(b)) => double(operator, a, b).map(Value::Double),
        (Value::StringValue(_), _) | (_, Value::StringValue(_)) => {
            Err(ExecutionErrorKind::UnsupportedOperation {
                operator,
                kind: ValueKind::StringValue,
            })
        }
    }
}

fn integer(operator: ArithmeticOperator, a: i64, b: i64) -> Result<i64, ExecutionErrorKind> {
    if b == 0 && matches!(operator, ArithmeticOperator::Divide | ArithmeticOperator::Modulo) {
        return Err(ExecutionErrorKind::DivisionByZero);
    }

    match operator {
        ArithmeticOperator::Add => a.checked_add(b),
        ArithmeticOperator::Subtract => a.checked_sub(b),
        ArithmeticOperator::Multiply => a.checked_mul(b),
        ArithmeticOperator::Divide => a.checked_div(b),
        ArithmeticOperator::Modulo => a.checked_rem(b),
    }
    .ok_or(ExecutionErrorKind::ArithmeticOverflow {
        operator,
        left: a,
        right: b,
    })
}

fn double(operator: ArithmeticOperator, a: f64, b: f64) -> Result<f64, ExecutionErrorKind> {
    match operator {
        ArithmeticOperator::Add => Ok(a + b),
        ArithmeticOperator::Subtract => Ok(a - b),
        ArithmeticOperator::Multiply => Ok(a * b),
        ArithmeticOperator::Divide if b == 0.0 => Err(ExecutionErrorKind::DivisionByZero),
        ArithmeticOperator::Divide => Ok(a / b),
        ArithmeticOperator::Modulo => Err(ExecutionErrorKind::UnsupportedOperation {
            operator,
            kind: ValueKind::Double,
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokenizer::tokens;

    fn eval(source: &str) -> Result<Value, ExecutionErrorKind> {
        eval_with(&SymbolTable::new(), source)
    }

    fn eval_with(symbols: &SymbolTable, source: &str) -> Result<Value, ExecutionErrorKind> {
        let tokens = tokens(source).unwrap();
        evaluate(symbols, &tokens[..tokens.len() - 1])
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("3*5+1-2").unwrap(), Value::Integer(14));
        assert_eq!(eval("2+3*4").unwrap(), Value::Integer(14));
        assert_eq!(eval("(2+3)*4").unwrap(), Value::Integer(20));
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(eval("10-4-3").unwrap(), Value::Integer(3));
        assert_eq!(eval("64/4/2").unwrap(), Value::Integer(8));
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(eval("7/2").unwrap(), Value::Integer(3));
        assert_eq!(eval("-7/2").unwrap(), Value::Integer(-3));
    }

    #[test]
    fn test_promotion() {
        assert_eq!(eval("1+2.5").unwrap(), Value::Double(3.5));
        assert_eq!(eval("2.5*2").unwrap(), Value::Double(5.0));
        assert_eq!(eval("7/2.0").unwrap(), Value::Double(3.5));
        assert_eq!(eval("1.5-1.5").unwrap(), Value::Double(0.0));
    }

    #[test]
    fn test_result_kind_follows_operands() {
        let operands = [Value::Integer(6), Value::Double(1.5)];
        let operators = [
            ArithmeticOperator::Add,
            ArithmeticOperator::Subtract,
            ArithmeticOperator::Multiply,
            ArithmeticOperator::Divide,
        ];
        for left in &operands {
            for right in &operands {
                for op in operators {
                    let result = apply(op, left.clone(), right.clone()).unwrap();
                    let either_double =
                        left.kind() == ValueKind::Double || right.kind() == ValueKind::Double;
                    assert_eq!(result.kind() == ValueKind::Double, either_double);
                    if either_double {
                        let (a, b) = (left.as_f64(), right.as_f64());
                        let exact = match op {
                            ArithmeticOperator::Add => a + b,
                            ArithmeticOperator::Subtract => a - b,
                            ArithmeticOperator::Multiply => a * b,
                            _ => a / b,
                        };
                        assert_eq!(result, Value::Double(exact));
                    }
                }
            }
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(eval("5/0"), Err(ExecutionErrorKind::DivisionByZero)));
        assert!(matches!(eval("5/0.0"), Err(ExecutionErrorKind::DivisionByZero)));
        assert!(matches!(eval("5.5/(1-1)"), Err(ExecutionErrorKind::DivisionByZero)));
    }

    #[test]
    fn test_modulo() {
        assert_eq!(
            apply(ArithmeticOperator::Modulo, Value::Integer(7), Value::Integer(3)).unwrap(),
            Value::Integer(1)
        );
        assert!(matches!(
            apply(ArithmeticOperator::Modulo, Value::Integer(7), Value::Double(2.0)),
            Err(ExecutionErrorKind::UnsupportedOperation {
                kind: ValueKind::Double,
                ..
            })
        ));
        assert!(matches!(
            apply(ArithmeticOperator::Modulo, Value::Integer(7), Value::Integer(0)),
            Err(ExecutionErrorKind::DivisionByZero)
        ));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            eval("9223372036854775807+1"),
            Err(ExecutionErrorKind::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_strings_do_not_combine() {
        assert!(matches!(
            apply(
                ArithmeticOperator::Add,
                Value::StringValue("a".to_string()),
                Value::Integer(1)
            ),
            Err(ExecutionErrorKind::UnsupportedOperation {
                kind: ValueKind::StringValue,
                ..
            })
        ));
    }

    #[test]
    fn test_variables_as_operands() {
        let mut symbols = SymbolTable::new();
        symbols.upsert("عدد", Value::Integer(4)).unwrap();
        symbols.upsert("r", Value::Double(0.5)).unwrap();
        symbols.upsert("s", Value::StringValue("x".to_string())).unwrap();

        assert_eq!(eval_with(&symbols, "عدد * r + 1").unwrap(), Value::Double(3.0));
        assert!(matches!(
            eval_with(&symbols, "s + 1"),
            Err(ExecutionErrorKind::NotANumber { name, found: ValueKind::StringValue })
                if name == "s"
        ));
        assert!(matches!(
            eval_with(&symbols, "missing + 1"),
            Err(ExecutionErrorKind::UndefinedVariable(_))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(eval(&nested(MAX_NESTING)).unwrap(), Value::Integer(1));
        assert!(matches!(
            eval(&nested(MAX_NESTING + 1)),
            Err(ExecutionErrorKind::Parse(ParseError::NestingTooDeep(MAX_NESTING)))
        ));
        assert!(matches!(
            eval(&nested(10_000)),
            Err(ExecutionErrorKind::Parse(ParseError::NestingTooDeep(_)))
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            eval("(1+2"),
            Err(ExecutionErrorKind::Parse(ParseError::Expected {
                expected: Operator::RightParen,
                ..
            }))
        ));
        assert!(matches!(
            eval("1 2"),
            Err(ExecutionErrorKind::Parse(ParseError::TrailingToken(Token::Integer(2))))
        ));
        assert!(matches!(
            eval("1 % 2"),
            Err(ExecutionErrorKind::Parse(ParseError::TrailingToken(_)))
        ));
        assert!(matches!(
            eval("\"text\""),
            Err(ExecutionErrorKind::Parse(ParseError::ExpectedOperand(_)))
        ));
    }
}
