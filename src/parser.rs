use crate::{
    ast::{AssignOperator, Operand, Statement},
    tokenizer::{Keyword, Operator, Token},
};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Expected \"{expected}\" but found \"{found}\"")]
    Expected { expected: Operator, found: Token },
    #[error("Expected an assignment operator but found \"{0}\"")]
    ExpectedAssignmentOperator(Token),
    #[error("Expected a string, a variable or an expression to print but found \"{0}\"")]
    ExpectedPrintArgument(Token),
    #[error("Expected a number, a variable or \"(\" but found \"{0}\"")]
    ExpectedOperand(Token),
    #[error("Expressions may nest at most {0} parentheses deep")]
    NestingTooDeep(usize),
    #[error("Unexpected \"{0}\" after expression")]
    TrailingToken(Token),
    #[error("Unexpected token in statement: \"{0}\"")]
    UnexpectedToken(Token),
    #[error("\"{0}\" statements are not supported")]
    UnsupportedStatement(Keyword),
}

const END_OF_INPUT: &Token = &Token::EndOfInput;

/// Recognizes the statement at the start of `tokens` and returns it with the tokens that
/// follow its terminating `;`.
pub fn statement(tokens: &[Token]) -> Result<(Statement<'_>, &[Token]), ParseError> {
    match first(tokens) {
        Token::Identifier(name) => assignment(name, &tokens[1..]),
        Token::Keyword(Keyword::Print) => print_statement(&tokens[1..]),
        Token::Keyword(keyword) => Err(ParseError::UnsupportedStatement(*keyword)),
        token => Err(ParseError::UnexpectedToken(token.clone())),
    }
}

fn assignment<'a>(
    name: &'a str,
    tokens: &'a [Token],
) -> Result<(Statement<'a>, &'a [Token]), ParseError> {
    let operator = match first(tokens) {
        Token::Operator(op) => AssignOperator::from_operator(*op),
        _ => None,
    }
    .ok_or_else(|| ParseError::ExpectedAssignmentOperator(first(tokens).clone()))?;

    let (value, tokens) = split_at_semicolon(&tokens[1..])?;
    if value.is_empty() {
        return Err(ParseError::ExpectedOperand(Token::Operator(
            Operator::Semicolon,
        )));
    }

    Ok((
        Statement::Assign {
            name,
            operator,
            value: operand(value),
        },
        tokens,
    ))
}

fn print_statement(tokens: &[Token]) -> Result<(Statement<'_>, &[Token]), ParseError> {
    let tokens = consume(tokens, Operator::LeftParen)?;
    let (argument, tokens) = split_at_closing_paren(tokens)?;
    if argument.is_empty() {
        return Err(ParseError::ExpectedPrintArgument(Token::Operator(
            Operator::RightParen,
        )));
    }
    let tokens = consume(tokens, Operator::Semicolon)?;
    Ok((Statement::Print(operand(argument)), tokens))
}

fn operand(tokens: &[Token]) -> Operand<'_> {
    match tokens {
        [Token::StringLiteral(text)] => Operand::Text(text),
        [Token::Identifier(name)] => Operand::Variable(name),
        _ => Operand::Expression(tokens),
    }
}

fn split_at_semicolon(tokens: &[Token]) -> Result<(&[Token], &[Token]), ParseError> {
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Operator(Operator::Semicolon) => return Ok((&tokens[..i], &tokens[i + 1..])),
            Token::EndOfInput => break,
            _ => {}
        }
    }
    Err(ParseError::Expected {
        expected: Operator::Semicolon,
        found: Token::EndOfInput,
    })
}

fn split_at_closing_paren(tokens: &[Token]) -> Result<(&[Token], &[Token]), ParseError> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Operator(Operator::LeftParen) => depth += 1,
            Token::Operator(Operator::RightParen) if depth == 0 => {
                return Ok((&tokens[..i], &tokens[i + 1..]))
            }
            Token::Operator(Operator::RightParen) => depth -= 1,
            Token::Operator(Operator::Semicolon) | Token::EndOfInput => {
                return Err(ParseError::Expected {
                    expected: Operator::RightParen,
                    found: token.clone(),
                })
            }
            _ => {}
        }
    }
    Err(ParseError::Expected {
        expected: Operator::RightParen,
        found: Token::EndOfInput,
    })
}

pub fn consume(tokens: &[Token], operator: Operator) -> Result<&[Token], ParseError> {
    match first(tokens) {
        Token::Operator(op) if *op == operator => Ok(&tokens[1..]),
        token => Err(ParseError::Expected {
            expected: operator,
            found: token.clone(),
        }),
    }
}

pub fn first(tokens: &[Token]) -> &Token {
    tokens.first().unwrap_or(END_OF_INPUT)
}
