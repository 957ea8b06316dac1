pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod tokenizer;

use interpreter::{ExecutionError, Interpreter};
use tokenizer::TokensError;

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error(transparent)]
    Tokenize(#[from] TokensError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Scans the whole of `source`, then runs its statements against `interpreter`.
pub fn interpret(source: &str, interpreter: &mut Interpreter) -> Result<(), InterpretError> {
    let tokens = tokenizer::tokens(source)?;
    interpreter.interpret(&tokens)?;
    Ok(())
}
