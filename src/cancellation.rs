//! Generation-scoped cancellation for model requests.
//!
//! Every manual action on the prompter starts a new generation. A token
//! remembers the generation it was issued in and reads as cancelled once a
//! newer one begins, so a worker can skip its network call and the reducer
//! can drop the late answer.

use crate::error::PrompterError;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Session-wide generation counter. Clones share the counter.
#[derive(Clone, Debug, Default)]
pub struct Generations {
    current: Arc<AtomicU64>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    /// Start a new generation and return its number.
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            issued: self.current(),
            current: Arc::clone(&self.current),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CancellationToken {
    issued: u64,
    current: Arc<AtomicU64>,
}

impl CancellationToken {
    /// Token for work outside the voice loop; nothing ever supersedes it.
    pub fn detached() -> Self {
        Generations::new().token()
    }

    pub fn generation(&self) -> u64 {
        self.issued
    }

    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::Acquire) != self.issued
    }

    pub fn check_cancelled(&self, stage: &'static str) -> Result<(), PrompterError> {
        if self.is_cancelled() {
            return Err(PrompterError::Inference(format!(
                "request from generation {} superseded at stage={stage}",
                self.issued
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_supersedes_earlier_tokens() {
        let generations = Generations::new();
        let token = generations.token();
        assert_eq!(token.generation(), 0);
        assert!(token.check_cancelled("before_send").is_ok());

        assert_eq!(generations.advance(), 1);
        let err = token
            .check_cancelled("before_send")
            .expect_err("older generation must be cancelled");
        assert!(err.to_string().contains("before_send"));

        let fresh = generations.token();
        assert_eq!(fresh.generation(), 1);
        assert!(!fresh.is_cancelled());
    }

    #[test]
    fn clones_share_the_counter() {
        let generations = Generations::new();
        let worker_copy = generations.clone();
        let token = worker_copy.token();
        generations.advance();
        assert!(token.is_cancelled());
        assert_eq!(worker_copy.current(), 1);
    }

    #[test]
    fn detached_tokens_stay_live() {
        assert!(!CancellationToken::detached().is_cancelled());
    }
}
