use std::fmt::Debug;

use rustc_hash::FxHashMap;

use super::{ExecutionErrorKind, Value, ValueKind};

/// Number of distinct variables a run may define unless configured otherwise.
pub const DEFAULT_SYMBOL_LIMIT: usize = 100;

#[derive(Clone)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Value>,
    limit: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_SYMBOL_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            symbols: FxHashMap::default(),
            limit,
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Inserts `name` or replaces its value and kind in place. Only a new name can hit the
    /// limit.
    pub fn upsert(&mut self, name: &str, value: Value) -> Result<(), ExecutionErrorKind> {
        if let Some(slot) = self.symbols.get_mut(name) {
            *slot = value;
            return Ok(());
        }

        if self.symbols.len() >= self.limit {
            return Err(ExecutionErrorKind::CapacityExceeded(self.limit));
        }

        self.symbols.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Value, ExecutionErrorKind> {
        self.symbols
            .get(name)
            .ok_or_else(|| ExecutionErrorKind::UndefinedVariable(name.to_string()))
    }

    pub fn get_typed(&self, name: &str, expected: ValueKind) -> Result<&Value, ExecutionErrorKind> {
        let value = self.get(name)?;
        if value.kind() != expected {
            return Err(ExecutionErrorKind::TypeMismatch {
                name: name.to_string(),
                expected,
                found: value.kind(),
            });
        }
        Ok(value)
    }

    /// Looks up an arithmetic operand: an Integer or a Double.
    pub fn get_number(&self, name: &str) -> Result<&Value, ExecutionErrorKind> {
        let value = self.get(name)?;
        match value.kind() {
            ValueKind::Integer | ValueKind::Double => Ok(value),
            found => Err(ExecutionErrorKind::NotANumber {
                name: name.to_string(),
                found,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut symbols = self.symbols.iter().collect::<Vec<_>>();
        symbols.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map()
            .entries(
                symbols
                    .into_iter()
                    .map(|(name, value)| (name, format!("{}: {}", value.kind(), value))),
            )
            .finish()
    }
}
