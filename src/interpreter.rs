mod evaluator;
mod symbol_table;

use std::{
    cell::RefCell,
    fmt::{Debug, Display},
    rc::Rc,
};

use crate::{
    ast::{ArithmeticOperator, Operand, Statement},
    parser::{self, ParseError},
    tokenizer::Token,
};

pub use self::evaluator::{apply, evaluate, MAX_NESTING};
pub use self::symbol_table::{SymbolTable, DEFAULT_SYMBOL_LIMIT};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Double(f64),
    StringValue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Double,
    StringValue,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Double(_) => ValueKind::Double,
            Value::StringValue(_) => ValueKind::StringValue,
        }
    }

    #[cfg(test)]
    fn as_f64(&self) -> f64 {
        match self {
            Value::Integer(n) => *n as f64,
            Value::Double(n) => *n,
            Value::StringValue(_) => f64::NAN,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{:.6}", n),
            Value::StringValue(s) => write!(f, "{}", s),
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Double => write!(f, "double"),
            ValueKind::StringValue => write!(f, "string"),
        }
    }
}

pub struct Interpreter {
    symbols: SymbolTable,
    stdout: Rc<RefCell<dyn std::io::Write>>,
}

impl Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("symbols", &self.symbols)
            .finish()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Rc::new(RefCell::new(std::io::stdout())))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("Error executing statement {statement}: {kind}")]
    Execution {
        kind: ExecutionErrorKind,
        statement: usize,
    },
}

impl ExecutionError {
    pub fn kind(&self) -> &ExecutionErrorKind {
        match self {
            ExecutionError::Execution { kind, .. } => kind,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutionErrorKind {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("Type error: {name} holds a {found} value, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Type error: {name} holds a {found} value, expected a number")]
    NotANumber { name: String, found: ValueKind },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Operator {operator} is not supported on {kind} values")]
    UnsupportedOperation {
        operator: ArithmeticOperator,
        kind: ValueKind,
    },
    #[error("Integer overflow: {left} {operator} {right}")]
    ArithmeticOverflow {
        operator: ArithmeticOperator,
        left: i64,
        right: i64,
    },
    #[error("Symbol table overflow: at most {0} variables can be defined")]
    CapacityExceeded(usize),
}

impl Interpreter {
    pub fn new(stdout: Rc<RefCell<dyn std::io::Write>>) -> Self {
        Self::with_symbol_limit(stdout, DEFAULT_SYMBOL_LIMIT)
    }

    pub fn with_symbol_limit(stdout: Rc<RefCell<dyn std::io::Write>>, limit: usize) -> Self {
        Self {
            symbols: SymbolTable::with_limit(limit),
            stdout,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Runs statements until the end of input. The first failing statement stops the run;
    /// everything before it has already taken effect.
    pub fn interpret(&mut self, tokens: &[Token]) -> Result<(), ExecutionError> {
        let mut tokens = tokens;
        let mut index = 0;

        while !matches!(tokens.first(), None | Some(Token::EndOfInput)) {
            index += 1;
            match self.step(tokens) {
                Ok(rest) => tokens = rest,
                Err(kind) => {
                    return Err(ExecutionError::Execution {
                        kind,
                        statement: index,
                    })
                }
            }
        }

        Ok(())
    }

    fn step<'a>(&mut self, tokens: &'a [Token]) -> Result<&'a [Token], ExecutionErrorKind> {
        let (statement, rest) = parser::statement(tokens)?;

        #[cfg(feature = "trace")]
        {
            println!("{:4} {}", "", statement);
        }

        self.execute(&statement)?;

        #[cfg(feature = "trace")]
        {
            println!("   | {:?}", self.symbols);
        }

        Ok(rest)
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), ExecutionErrorKind> {
        match statement {
            Statement::Assign {
                name,
                operator,
                value,
            } => {
                let value = match operator.arithmetic() {
                    None => self.operand(value)?,
                    Some(op) => {
                        let current = self.symbols.get(name)?.clone();
                        apply(op, current, self.operand(value)?)?
                    }
                };
                self.symbols.upsert(name, value)
            }
            Statement::Print(operand) => {
                let value = self.operand(operand)?;
                writeln!(self.stdout.borrow_mut(), "{}", value)?;
                Ok(())
            }
        }
    }

    fn operand(&self, operand: &Operand) -> Result<Value, ExecutionErrorKind> {
        match operand {
            Operand::Text(text) => Ok(Value::StringValue(text.to_string())),
            Operand::Variable(name) => Ok(self.symbols.get(name)?.clone()),
            Operand::Expression(tokens) => evaluate(&self.symbols, tokens),
        }
    }
}
