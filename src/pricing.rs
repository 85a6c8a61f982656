// Ticket price lookup against a game profile's static price table.

use crate::config::GameProfile;

/// Price in BRL for a ticket of the given size, or `None` when the game
/// does not sell that size. Never substitutes a default price.
pub fn price_for(profile: &GameProfile, ticket_size: usize) -> Option<f64> {
    profile.prices.get(&ticket_size).copied()
}

/// Render a price the way the lottery quotes it, with an explicit marker
/// for unavailable sizes.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("R$ {value:.2}"),
        None => "N/A".to_string(),
    }
}
