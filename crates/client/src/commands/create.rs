//! Host a new session.

use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;
use client_core::CreateSessionFlow;
use console::style;
use session_core::{Address, CreateSessionRequest, parse_usdc};

use super::{Context, report};

/// Host a new session; you are added as the first participant
#[derive(Parser, Debug)]
pub struct Create {
    /// Deposit per person in USDC (e.g. 5 or 2.50)
    #[arg(long, value_parser = parse_usdc)]
    pub amount: u128,

    /// Meeting time: unix seconds, or relative like +90m, +2h, +1d
    #[arg(long)]
    pub deadline: Deadline,

    /// Length of the voting window after the meeting
    #[arg(long, default_value_t = 60)]
    pub voting_minutes: u64,

    /// Invitee address (repeat for each)
    #[arg(long = "participant", required = true)]
    pub participants: Vec<Address>,
}

impl Create {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let now = ctx.now().await;
        let request = CreateSessionRequest {
            host: ctx.chain().account(),
            amount_per_person: self.amount,
            deadline: self.deadline.resolve(now),
            voting_period: self.voting_minutes.saturating_mul(60),
            invitees: self.participants,
        };

        let created = CreateSessionFlow::new(request)
            .run(ctx.chain(), ctx.orchestrator(), now)
            .await
            .map_err(|e| ctx.flow_error(e))?;

        report("create-session", &created.outcome);
        match created.session_id {
            Some(id) => println!("{} Session #{id} is open for deposits", style("✓").green().bold()),
            None => println!("Run `tozlow sessions` in a moment to see the new session id"),
        }
        Ok(())
    }
}

/// Absolute or relative meeting time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deadline {
    At(u64),
    In(u64),
}

impl Deadline {
    pub fn resolve(self, now: u64) -> u64 {
        match self {
            Self::At(timestamp) => timestamp,
            Self::In(secs) => now.saturating_add(secs),
        }
    }
}

impl FromStr for Deadline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid deadline `{s}`: use unix seconds or +<n>[s|m|h|d]");

        let Some(relative) = s.trim().strip_prefix('+') else {
            return s.trim().parse().map(Self::At).map_err(|_| invalid());
        };

        let (digits, unit) = match relative.char_indices().last() {
            Some((i, c)) if c.is_ascii_alphabetic() => (&relative[..i], c),
            _ => (relative, 's'),
        };
        let scale = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            _ => return Err(invalid()),
        };
        let count: u64 = digits.parse().map_err(|_| invalid())?;
        count.checked_mul(scale).map(Self::In).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadlines_parse() {
        assert_eq!("1760000000".parse::<Deadline>(), Ok(Deadline::At(1_760_000_000)));
        assert_eq!("+90m".parse::<Deadline>(), Ok(Deadline::In(5_400)));
        assert_eq!("+2h".parse::<Deadline>(), Ok(Deadline::In(7_200)));
        assert_eq!("+1d".parse::<Deadline>(), Ok(Deadline::In(86_400)));
        assert_eq!("+45".parse::<Deadline>(), Ok(Deadline::In(45)));
    }

    #[test]
    fn bad_deadlines_are_rejected() {
        for bad in ["", "+", "+2w", "+h", "tomorrow", "-5m"] {
            assert!(bad.parse::<Deadline>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn relative_deadlines_resolve_from_now() {
        assert_eq!(Deadline::In(600).resolve(1_000), 1_600);
        assert_eq!(Deadline::At(5).resolve(1_000), 5);
    }

    #[test]
    fn cli_args_parse() {
        let cmd = Create::try_parse_from([
            "create",
            "--amount",
            "2.5",
            "--deadline",
            "+2h",
            "--participant",
            "0x0202020202020202020202020202020202020202",
            "--participant",
            "0x0303030303030303030303030303030303030303",
        ])
        .unwrap();

        assert_eq!(cmd.amount, 2_500_000);
        assert_eq!(cmd.deadline, Deadline::In(7_200));
        assert_eq!(cmd.voting_minutes, 60);
        assert_eq!(cmd.participants.len(), 2);
    }
}
