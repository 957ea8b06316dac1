use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Integer(i64),
    Double(f64),
    StringLiteral(String),
    Identifier(String),

    Operator(Operator),
    Keyword(Keyword),

    EndOfInput,
}

impl Eq for Token {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // Single-character operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LeftParen,
    RightParen,
    Less,
    Greater,
    Equal,
    Comma,
    Semicolon,
    Dot,
    Colon,
    Question,
    Bang,
    LeftBracket,
    RightBracket,
    Hash,

    // Two-character operators
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    EqualEqual,
    BangEqual,
    LessEqual,
    GreaterEqual,
    AndAnd,
    OrOr,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Caret => "^",
            Operator::LeftParen => "(",
            Operator::RightParen => ")",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Equal => "=",
            Operator::Comma => ",",
            Operator::Semicolon => ";",
            Operator::Dot => ".",
            Operator::Colon => ":",
            Operator::Question => "?",
            Operator::Bang => "!",
            Operator::LeftBracket => "[",
            Operator::RightBracket => "]",
            Operator::Hash => "#",
            Operator::PlusEqual => "+=",
            Operator::MinusEqual => "-=",
            Operator::StarEqual => "*=",
            Operator::SlashEqual => "/=",
            Operator::PercentEqual => "%=",
            Operator::EqualEqual => "==",
            Operator::BangEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Else,
    While,
    For,
    Print,
    Return,
}

impl Keyword {
    /// The keyword as written in source.
    pub fn spelling(&self) -> &'static str {
        match self {
            Keyword::If => "إذا",
            Keyword::Else => "وإلا",
            Keyword::While => "بينما",
            Keyword::For => "ل",
            Keyword::Print => "اطبع",
            Keyword::Return => "ارجع",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spelling())
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::Double(n) => write!(f, "{:?}", n),
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Keyword(keyword) => write!(f, "{}", keyword),
            Token::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// Failure to scan the whole input. Positions count Unicode scalar values from the
/// start of the source.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TokensError {
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { position: usize, character: char },
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },
    #[error("Number literal {literal} at position {position} cannot be represented")]
    InvalidNumber { position: usize, literal: String },
}

impl TokensError {
    fn at(error: TokenError, position: usize) -> Self {
        match error {
            TokenError::UnexpectedCharacter(character) => {
                TokensError::UnexpectedCharacter { position, character }
            }
            TokenError::UnterminatedString => TokensError::UnterminatedString { position },
            TokenError::InvalidNumber(literal) => TokensError::InvalidNumber { position, literal },
        }
    }
}

pub fn tokens(source: &str) -> Result<Vec<Token>, TokensError> {
    let mut tokens = Vec::new();
    let mut remaining = source;
    let mut position = 0;

    loop {
        let trimmed = skip_whitespace(remaining);
        position += scalar_count(remaining, trimmed);
        remaining = trimmed;

        let signed = operand_expected(tokens.last());
        let (token, rest) =
            token(remaining, signed).map_err(|error| TokensError::at(error, position))?;
        position += scalar_count(remaining, rest);
        remaining = rest;

        if matches!(token, Token::EndOfInput) {
            tokens.push(token);
            break;
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn scalar_count(before: &str, after: &str) -> usize {
    before[..before.len() - after.len()].chars().count()
}

/// A `-` glued to a digit only starts a negative literal where an operand is expected,
/// otherwise `1-2` would scan as `1` followed by `-2`.
fn operand_expected(previous: Option<&Token>) -> bool {
    match previous {
        None => true,
        Some(Token::Operator(Operator::RightParen)) => false,
        Some(Token::Operator(_) | Token::Keyword(_)) => true,
        Some(_) => false,
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
enum TokenError {
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Number literal {0} cannot be represented")]
    InvalidNumber(String),
}

/// Scans a single token. `signed` allows a leading `-` on a numeric literal.
fn token(source: &str, signed: bool) -> Result<(Token, &str), TokenError> {
    let source = skip_whitespace(source);

    if source.is_empty() {
        return Ok((Token::EndOfInput, source));
    }

    if let Some((literal, rest)) = number(source, signed) {
        let token = if literal.contains('.') {
            literal.parse().map(Token::Double).ok()
        } else {
            literal.parse().map(Token::Integer).ok()
        }
        .ok_or_else(|| TokenError::InvalidNumber(literal.to_string()))?;
        return Ok((token, rest));
    }

    if source.starts_with('"') {
        return string(source).ok_or(TokenError::UnterminatedString);
    }

    maximal(
        &[
            // Single-character operators
            plus,
            minus,
            star,
            slash,
            percent,
            caret,
            left_paren,
            right_paren,
            less,
            greater,
            equal,
            comma,
            semicolon,
            dot,
            colon,
            question,
            bang,
            left_bracket,
            right_bracket,
            hash,
            // Two-character operators
            plus_equal,
            minus_equal,
            star_equal,
            slash_equal,
            percent_equal,
            equal_equal,
            bang_equal,
            less_equal,
            greater_equal,
            and_and,
            or_or,
            // Keywords, ahead of identifier so they win a tie
            if_,
            else_,
            while_,
            for_,
            print_,
            return_,
            identifier,
        ],
        source,
    )
    .ok_or_else(|| TokenError::UnexpectedCharacter(source.chars().next().unwrap_or_default()))
}

fn maximal<'a, T: std::fmt::Debug>(
    parsers: &[fn(&str) -> Option<(T, &str)>],
    source: &'a str,
) -> Option<(T, &'a str)> {
    let mut min_left = source.len() + 1;
    let mut max_match = None;

    let matching_parsers = parsers.iter().filter_map(|parser| parser(source));
    for (m, rest) in matching_parsers {
        let left = rest.len();
        if left < min_left {
            min_left = left;
            max_match = Some((m, rest));
        }
    }

    max_match
}

fn skip_whitespace(source: &str) -> &str {
    source.trim_start_matches(char::is_whitespace)
}

macro_rules! match_literal {
    ($name:ident, $word:literal, $token:expr) => {
        fn $name(source: &str) -> Option<(Token, &str)> {
            source.strip_prefix($word).map(|rest| ($token, rest))
        }
    };
}

match_literal! { plus, "+", Token::Operator(Operator::Plus) }
match_literal! { minus, "-", Token::Operator(Operator::Minus) }
match_literal! { star, "*", Token::Operator(Operator::Star) }
match_literal! { slash, "/", Token::Operator(Operator::Slash) }
match_literal! { percent, "%", Token::Operator(Operator::Percent) }
match_literal! { caret, "^", Token::Operator(Operator::Caret) }
match_literal! { left_paren, "(", Token::Operator(Operator::LeftParen) }
match_literal! { right_paren, ")", Token::Operator(Operator::RightParen) }
match_literal! { less, "<", Token::Operator(Operator::Less) }
match_literal! { greater, ">", Token::Operator(Operator::Greater) }
match_literal! { equal, "=", Token::Operator(Operator::Equal) }
match_literal! { comma, ",", Token::Operator(Operator::Comma) }
match_literal! { semicolon, ";", Token::Operator(Operator::Semicolon) }
match_literal! { dot, ".", Token::Operator(Operator::Dot) }
match_literal! { colon, ":", Token::Operator(Operator::Colon) }
match_literal! { question, "?", Token::Operator(Operator::Question) }
match_literal! { bang, "!", Token::Operator(Operator::Bang) }
match_literal! { left_bracket, "[", Token::Operator(Operator::LeftBracket) }
match_literal! { right_bracket, "]", Token::Operator(Operator::RightBracket) }
match_literal! { hash, "#", Token::Operator(Operator::Hash) }
match_literal! { plus_equal, "+=", Token::Operator(Operator::PlusEqual) }
match_literal! { minus_equal, "-=", Token::Operator(Operator::MinusEqual) }
match_literal! { star_equal, "*=", Token::Operator(Operator::StarEqual) }
match_literal! { slash_equal, "/=", Token::Operator(Operator::SlashEqual) }
match_literal! { percent_equal, "%=", Token::Operator(Operator::PercentEqual) }
match_literal! { equal_equal, "==", Token::Operator(Operator::EqualEqual) }
match_literal! { bang_equal, "!=", Token::Operator(Operator::BangEqual) }
match_literal! { less_equal, "<=", Token::Operator(Operator::LessEqual) }
match_literal! { greater_equal, ">=", Token::Operator(Operator::GreaterEqual) }
match_literal! { and_and, "&&", Token::Operator(Operator::AndAnd) }
match_literal! { or_or, "||", Token::Operator(Operator::OrOr) }
match_literal! { if_, "إذا", Token::Keyword(Keyword::If) }
match_literal! { else_, "وإلا", Token::Keyword(Keyword::Else) }
match_literal! { while_, "بينما", Token::Keyword(Keyword::While) }
match_literal! { for_, "ل", Token::Keyword(Keyword::For) }
match_literal! { print_, "اطبع", Token::Keyword(Keyword::Print) }
match_literal! { return_, "ارجع", Token::Keyword(Keyword::Return) }

/// ASCII letters and the Arabic letter blocks.
fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\u{0621}'..='\u{064A}' | '\u{0671}'..='\u{06D3}')
}

fn is_identifier_char(c: char) -> bool {
    is_letter(c) || c.is_ascii_digit() || c == '_'
}

fn identifier(source: &str) -> Option<(Token, &str)> {
    let mut chars = source.chars();

    let first = chars.next()?;
    if !is_letter(first) {
        return None;
    }

    let len = first.len_utf8()
        + chars
            .take_while(|c| is_identifier_char(*c))
            .map(char::len_utf8)
            .sum::<usize>();

    Some((Token::Identifier(source[..len].to_string()), &source[len..]))
}

// No escape sequences: the literal ends at the next double quote.
fn string(source: &str) -> Option<(Token, &str)> {
    let body = source.strip_prefix('"')?;
    let end = body.find('"')?;
    Some((
        Token::StringLiteral(body[..end].to_string()),
        &body[end + 1..],
    ))
}

fn number(source: &str, signed: bool) -> Option<(&str, &str)> {
    let mut len = if signed && source.starts_with('-') { 1 } else { 0 };

    let digits = digit_run(&source[len..]);
    if digits == 0 {
        return None;
    }
    len += digits;

    if source[len..].starts_with('.') {
        let fraction = digit_run(&source[len + 1..]);
        if fraction > 0 {
            len += 1 + fraction;
        }
    }

    Some((&source[..len], &source[len..]))
}

fn digit_run(source: &str) -> usize {
    source.bytes().take_while(u8::is_ascii_digit).count()
}
