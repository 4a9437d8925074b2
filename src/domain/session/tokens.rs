//! CSRF and one-time tokens kept in the session.

use serde_json::Value;

use super::{ONE_TIME_TOKENS_KEY, Session, TOKEN_KEY};
use crate::domain::encoding::random_token;

/// Oldest one-time tokens are dropped beyond this count.
pub const MAX_ONE_TIME_TOKENS: usize = 20;

impl Session {
    /// The session's CSRF token, created on first use.
    pub fn token(&self) -> String {
        let mut state = self.state.lock();
        if let Some(Value::String(token)) = state.data.get(TOKEN_KEY) {
            return token.clone();
        }

        let token = random_token();
        state.data.insert(TOKEN_KEY.to_string(), Value::String(token.clone()));
        token
    }

    /// Replace the CSRF token.
    pub fn regenerate_token(&self) -> String {
        let token = random_token();
        self.state.lock().data.insert(TOKEN_KEY.to_string(), Value::String(token.clone()));
        token
    }

    pub fn validate_token(&self, candidate: &str) -> bool {
        match self.state.lock().data.get(TOKEN_KEY) {
            Some(Value::String(token)) => constant_time_eq(token.as_bytes(), candidate.as_bytes()),
            _ => false,
        }
    }

    /// Generate a token that validates once.
    pub fn generate_one_time_token(&self) -> String {
        let token = random_token();
        let mut state = self.state.lock();

        let mut tokens = stored_tokens(state.data.get(ONE_TIME_TOKENS_KEY));
        tokens.push(token.clone());
        if tokens.len() > MAX_ONE_TIME_TOKENS {
            let excess = tokens.len() - MAX_ONE_TIME_TOKENS;
            tokens.drain(..excess);
        }

        state.data.insert(ONE_TIME_TOKENS_KEY.to_string(), Value::from(tokens));
        token
    }

    /// Check and consume a one-time token.
    pub fn validate_one_time_token(&self, candidate: &str) -> bool {
        let mut state = self.state.lock();
        let mut tokens = stored_tokens(state.data.get(ONE_TIME_TOKENS_KEY));

        let Some(position) =
            tokens.iter().position(|token| constant_time_eq(token.as_bytes(), candidate.as_bytes()))
        else {
            return false;
        };

        tokens.remove(position);
        state.data.insert(ONE_TIME_TOKENS_KEY.to_string(), Value::from(tokens));
        true
    }
}

fn stored_tokens(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|tokens| tokens.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len() && left.iter().zip(right).fold(0u8, |acc, (l, r)| acc | (l ^ r)) == 0
}
