//! User-facing messages for failed operations.
//!
//! Every failure a flow can produce ends up here exactly once, so the set of
//! strings a user can see is closed and reviewable in one place.

use std::fmt;

use client_blockchain_core::{CallError, RevertReason, TransportError};
use session_core::ValidationError;
use strum::{Display, IntoStaticStr};

const MAX_MESSAGE_CHARS: usize = 120;

/// Where in the pipeline a failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorCategory {
    /// Rejected locally, nothing was sent.
    Validation,
    /// Signer or node refused the transaction before inclusion.
    Submission,
    /// The contract rejected the call.
    Revert,
    /// RPC unreachable or misbehaving.
    Infrastructure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserMessage {
    pub category: ErrorCategory,
    pub text: String,
}

impl UserMessage {
    pub fn new(category: ErrorCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Stateless mapping from errors to [`UserMessage`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorTranslator;

impl ErrorTranslator {
    pub fn translate(&self, error: &CallError) -> UserMessage {
        match error {
            CallError::Revert(reason) => {
                UserMessage::new(ErrorCategory::Revert, revert_message(*reason))
            }
            CallError::UnknownRevert(name) => UserMessage::new(
                ErrorCategory::Revert,
                truncate(&format!("Transaction reverted ({name}).")),
            ),
            CallError::FailedOnChain(_) => {
                UserMessage::new(ErrorCategory::Revert, "The transaction failed on-chain.")
            }
            CallError::Rejected(_) => {
                UserMessage::new(ErrorCategory::Submission, "Transaction cancelled.")
            }
            CallError::Transport(transport) => self.translate_transport(transport),
            CallError::Other(message) => classify_raw(message),
        }
    }

    pub fn translate_transport(&self, error: &TransportError) -> UserMessage {
        match error {
            TransportError::NetworkError(_) => UserMessage::new(
                ErrorCategory::Infrastructure,
                "Network unavailable. Check your connection and try again.",
            ),
            TransportError::RpcError(message) => {
                let mut translated = classify_raw(message);
                if translated.category == ErrorCategory::Submission {
                    return translated;
                }
                translated.category = ErrorCategory::Infrastructure;
                translated
            }
            TransportError::InvalidResponse(message) | TransportError::ConfigError(message) => {
                UserMessage::new(ErrorCategory::Infrastructure, truncate(message))
            }
        }
    }

    pub fn translate_validation(&self, error: &ValidationError) -> UserMessage {
        UserMessage::new(ErrorCategory::Validation, truncate(&error.to_string()))
    }
}

/// Message for each contract error.
pub fn revert_message(reason: RevertReason) -> &'static str {
    match reason {
        RevertReason::AlreadyInitialized => "The contract is already initialized.",
        RevertReason::NotParticipant => "You are not a participant of this session.",
        RevertReason::AlreadyDeposited => "You already deposited.",
        RevertReason::DeadlineNotReached => "The meeting date hasn't arrived yet.",
        RevertReason::DeadlineReached => "The meeting date has passed.",
        RevertReason::AlreadyFinalized => "This session is already finalized.",
        RevertReason::NotEnoughParticipants => "Minimum 3 participants.",
        RevertReason::TooManyParticipants => "Maximum 5 participants.",
        RevertReason::TransferFailed => "Error transferring USDC. Did you approve the amount?",
        RevertReason::AlreadyVoted => "You already voted in this session.",
        RevertReason::InvalidAbsent => "That address is not a participant.",
        RevertReason::NotAllDeposited => "Not everyone successfully deposited yet.",
        RevertReason::VotingNotOpen => "Voting window hasn't opened yet.",
        RevertReason::VotingClosed => "Voting window is already closed.",
        RevertReason::SessionNotActive => "Session is not active (missing deposits).",
        RevertReason::CannotVoteSelf => "You cannot vote for yourself.",
    }
}

/// Heuristics over free-form node and signer messages.
fn classify_raw(message: &str) -> UserMessage {
    let lower = message.to_lowercase();

    if lower.contains("user rejected") || lower.contains("denied") {
        return UserMessage::new(ErrorCategory::Submission, "Transaction cancelled.");
    }
    if lower.contains("max fee per gas less than block base fee") {
        return UserMessage::new(
            ErrorCategory::Submission,
            "Network fees rose while sending. Please try again.",
        );
    }
    if lower.contains("insufficient funds") {
        return UserMessage::new(
            ErrorCategory::Submission,
            "Not enough ETH to pay for gas.",
        );
    }

    UserMessage::new(ErrorCategory::Infrastructure, truncate(message))
}

fn truncate(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_blockchain_core::TransactionId;
    use strum::IntoEnumIterator;

    #[test]
    fn every_revert_reason_has_a_distinct_message() {
        let messages: std::collections::HashSet<_> =
            RevertReason::iter().map(revert_message).collect();
        assert_eq!(messages.len(), RevertReason::iter().count());
    }

    #[test]
    fn revert_translation() {
        let message = ErrorTranslator.translate(&CallError::Revert(RevertReason::AlreadyVoted));
        assert_eq!(message.category, ErrorCategory::Revert);
        assert_eq!(message.text, "You already voted in this session.");

        let message = ErrorTranslator.translate(&CallError::Revert(RevertReason::TransferFailed));
        assert_eq!(message.text, "Error transferring USDC. Did you approve the amount?");
    }

    #[test]
    fn unknown_revert_names_the_error() {
        let message = ErrorTranslator.translate(&CallError::UnknownRevert("Paused".into()));
        assert_eq!(message.category, ErrorCategory::Revert);
        assert_eq!(message.text, "Transaction reverted (Paused).");
    }

    #[test]
    fn rejections_become_cancelled() {
        let rejected = ErrorTranslator.translate(&CallError::Rejected("nope".into()));
        assert_eq!(rejected.text, "Transaction cancelled.");

        let raw = ErrorTranslator.translate(&CallError::Other(
            "User rejected the request.".into(),
        ));
        assert_eq!(raw.category, ErrorCategory::Submission);
        assert_eq!(raw.text, "Transaction cancelled.");
    }

    #[test]
    fn fee_and_funds_heuristics() {
        let fee = ErrorTranslator.translate(&CallError::Transport(TransportError::RpcError(
            "max fee per gas less than block base fee: address 0xabc".into(),
        )));
        assert_eq!(fee.category, ErrorCategory::Submission);
        assert!(fee.text.starts_with("Network fees rose"));

        let funds = ErrorTranslator.translate(&CallError::Other(
            "insufficient funds for gas * price + value".into(),
        ));
        assert_eq!(funds.text, "Not enough ETH to pay for gas.");
    }

    #[test]
    fn network_errors_are_infrastructure() {
        let message = ErrorTranslator.translate(&CallError::Transport(
            TransportError::NetworkError("connection refused".into()),
        ));
        assert_eq!(message.category, ErrorCategory::Infrastructure);
        assert!(message.text.starts_with("Network unavailable"));
    }

    #[test]
    fn failed_on_chain() {
        let message = ErrorTranslator.translate(&CallError::FailedOnChain(TransactionId([1; 32])));
        assert_eq!(message.category, ErrorCategory::Revert);
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(200);
        let message = ErrorTranslator.translate(&CallError::Other(long));
        assert_eq!(message.text.chars().count(), MAX_MESSAGE_CHARS + 1);
        assert!(message.text.ends_with('…'));

        let short = ErrorTranslator.translate(&CallError::Other("boom".into()));
        assert_eq!(short.text, "boom");
    }

    #[test]
    fn validation_errors_keep_their_text() {
        let message = ErrorTranslator.translate_validation(&ValidationError::CannotVoteSelf);
        assert_eq!(message.category, ErrorCategory::Validation);
        assert_eq!(message.text, "You cannot vote for yourself");
    }
}
