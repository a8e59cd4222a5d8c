//! Plain-text rendering of sessions and amounts.

use client_core::SessionDetail;
use session_core::{Address, ParticipantStatus, SessionSummary, format_usdc};

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// One listing row: id, phase, stake, deposits, host and deadline.
pub fn summary_line(summary: &SessionSummary, caller: Address, now: u64) -> String {
    let session = &summary.session;
    let host = if session.host == caller {
        "you".to_string()
    } else {
        session.host.short()
    };
    format!(
        "#{:<4} {:<13} {:>10} USDC  {}/{} deposited  host {}  deadline {}",
        session.id,
        summary.phase.label(),
        format_usdc(session.amount_per_person),
        summary.deposited_count,
        summary.participants.len(),
        host,
        relative_time(session.deadline, now),
    )
}

pub fn detail_lines(detail: &SessionDetail, caller: Address, now: u64) -> Vec<String> {
    let summary = &detail.summary;
    let session = &summary.session;

    let mut lines = vec![
        format!("Session #{}  {}", session.id, summary.phase.label()),
        format!("  host          {}", session.host),
        format!(
            "  deposit       {} USDC each ({}/{} deposited)",
            format_usdc(session.amount_per_person),
            summary.deposited_count,
            summary.participants.len()
        ),
        format!("  deadline      {}", relative_time(session.deadline, now)),
        format!("  voting ends   {}", relative_time(session.voting_end(), now)),
    ];
    let remaining = session.voting_seconds_remaining(now);
    if remaining > 0 {
        lines.push(format!("  time to vote  {}", duration_words(remaining)));
    }
    lines.push("  participants".to_string());

    for status in &detail.statuses {
        lines.push(participant_line(status, session.host, caller));
    }
    lines
}

fn participant_line(status: &ParticipantStatus, host: Address, caller: Address) -> String {
    let mut tags = Vec::new();
    if status.address == host {
        tags.push("host");
    }
    if status.address == caller {
        tags.push("you");
    }

    format!(
        "    {}  {:<13} {:<9} {} absence vote{}{}",
        status.address,
        if status.deposited { "deposited" } else { "not deposited" },
        if status.voted { "voted" } else { "-" },
        status.absence_votes,
        if status.absence_votes == 1 { "" } else { "s" },
        if tags.is_empty() {
            String::new()
        } else {
            format!("  ({})", tags.join(", "))
        },
    )
}

/// `in 2h 5m`, `3m ago` or `now`.
pub fn relative_time(timestamp: u64, now: u64) -> String {
    match timestamp.cmp(&now) {
        std::cmp::Ordering::Greater => format!("in {}", duration_words(timestamp - now)),
        std::cmp::Ordering::Less => format!("{} ago", duration_words(now - timestamp)),
        std::cmp::Ordering::Equal => "now".to_string(),
    }
}

/// Two most significant units of a duration.
fn duration_words(secs: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    match secs {
        s if s >= DAY => format!("{}d {}h", s / DAY, (s % DAY) / HOUR),
        s if s >= HOUR => format!("{}h {}m", s / HOUR, (s % HOUR) / MINUTE),
        s if s >= MINUTE => format!("{}m", s / MINUTE),
        s => format!("{s}s"),
    }
}

/// Wei as gwei with three decimals.
pub fn format_gwei(wei: u128) -> String {
    let whole = wei / WEI_PER_GWEI;
    let milli = (wei % WEI_PER_GWEI) / 1_000_000;
    format!("{whole}.{milli:03} gwei")
}
