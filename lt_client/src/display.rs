//! Plain-text rendering of polled views.
//!
//! Held data older than the stale threshold is still printed, but prefixed
//! with `[STALE]`. Before the first successful read there is nothing to show
//! and the line reads `[NO DATA]`.

use live_table::{Card, Freshness, PlayerView, TableView};

use crate::poller::PollStatus;

pub const STALE_MARKER: &str = "[STALE]";
pub const NO_DATA_MARKER: &str = "[NO DATA]";

fn cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".to_string();
    }
    cards
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn role_tags(is_dealer: bool, is_small_blind: bool, is_big_blind: bool) -> String {
    let mut tags = Vec::new();
    if is_dealer {
        tags.push("D");
    }
    if is_small_blind {
        tags.push("SB");
    }
    if is_big_blind {
        tags.push("BB");
    }
    if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join(","))
    }
}

pub fn render_table(view: &TableView) -> String {
    let mut out = format!(
        "{} | {} | hand #{} | board: {} | v{}",
        view.name,
        view.phase,
        view.hand_number,
        cards(&view.community_cards),
        view.version
    );
    for seat in &view.players {
        out.push_str(&format!(
            "\n  {:>2}. {}{} ({} cards)",
            seat.seat + 1,
            seat.alias,
            role_tags(seat.roles.is_dealer, seat.roles.is_small_blind, seat.roles.is_big_blind),
            seat.card_count
        ));
    }
    out
}

pub fn render_player(view: &PlayerView) -> String {
    format!(
        "{} (seat {}){} | {} | hand #{} | pocket: {} | board: {} | v{}",
        view.alias,
        view.seat + 1,
        role_tags(view.roles.is_dealer, view.roles.is_small_blind, view.roles.is_big_blind),
        view.phase,
        view.hand_number,
        cards(&view.pocket_cards),
        cards(&view.community_cards),
        view.version
    )
}

/// Render a poll status with its freshness marker.
pub fn render_status<V>(status: &PollStatus<V>, render: impl Fn(&V) -> String) -> String {
    let mut out = match (&status.view, status.freshness) {
        (None, _) | (_, Freshness::Unavailable) => NO_DATA_MARKER.to_string(),
        (Some(view), Freshness::Stale) => format!("{STALE_MARKER} {}", render(view)),
        (Some(view), Freshness::Live) => render(view),
    };
    if let Some(err) = &status.last_error {
        out.push_str(&format!("\n  (last poll failed: {err})"));
    }
    out
}
