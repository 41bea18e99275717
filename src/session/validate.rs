//! Checks on user-entered simulation input

use crate::model::ParsingEnv;
use crate::tool::END_MARKER;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("'{0}' is not a terminal")]
    NotTerminal(String),

    #[error("end marker '$' may only end the input")]
    MisplacedEndMarker,
}

/// Split test input on whitespace and check every token names a terminal.
///
/// The end marker is passed through unchanged, but only as the last token.
pub fn validate_input(env: &ParsingEnv, input: &str) -> Result<Vec<String>, ValidationError> {
    let mut by_name: FxHashMap<&str, bool> = FxHashMap::default();
    for symbol in env.symbols.iter() {
        // First definition wins, matching lookup by index order
        by_name
            .entry(symbol.name.as_str())
            .or_insert(symbol.is_terminal());
    }

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let last = tokens.len().saturating_sub(1);
    tokens
        .iter()
        .enumerate()
        .map(|(i, &token)| {
            if token == END_MARKER {
                return if i == last {
                    Ok(token.to_string())
                } else {
                    Err(ValidationError::MisplacedEndMarker)
                };
            }
            match by_name.get(token) {
                None => Err(ValidationError::UnknownSymbol(token.to_string())),
                Some(false) => Err(ValidationError::NotTerminal(token.to_string())),
                Some(true) => Ok(token.to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Symbol;

    fn env() -> ParsingEnv {
        let mut env = ParsingEnv::new();
        env.symbols.push(Symbol::new("E", false, true));
        env.symbols.push(Symbol::new("+", true, false));
        env.symbols.push(Symbol::new("id", true, false));
        env
    }

    #[test]
    fn test_accepts_terminals() {
        assert_eq!(
            validate_input(&env(), " id +  id "),
            Ok(vec!["id".to_string(), "+".to_string(), "id".to_string()])
        );
        assert_eq!(validate_input(&env(), ""), Ok(vec![]));
        assert_eq!(validate_input(&env(), "id $"), Ok(vec!["id".to_string(), "$".to_string()]));
    }

    #[test]
    fn test_rejects_unknown_and_nonterminals() {
        assert_eq!(
            validate_input(&env(), "id * id"),
            Err(ValidationError::UnknownSymbol("*".to_string()))
        );
        assert_eq!(
            validate_input(&env(), "id + E"),
            Err(ValidationError::NotTerminal("E".to_string()))
        );
    }

    #[test]
    fn test_end_marker_only_last() {
        assert_eq!(
            validate_input(&env(), "id $ id"),
            Err(ValidationError::MisplacedEndMarker)
        );
        assert_eq!(
            validate_input(&env(), "$ $"),
            Err(ValidationError::MisplacedEndMarker)
        );
        assert_eq!(validate_input(&env(), "$"), Ok(vec!["$".to_string()]));
    }
}
