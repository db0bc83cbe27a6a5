//! Token availability classification.

/// Classification of a requested token ID against the current supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Not a positive token ID.
    Invalid,
    /// Beyond the last minted token.
    NotYetMinted,
    /// Minted and servable.
    Available,
}

/// Classify a requested token ID. Pure; runs before any catalog or
/// object-store access so rejected requests do no downstream work.
pub fn classify(token_id: i64, supply: u64) -> TokenStatus {
    if token_id <= 0 {
        TokenStatus::Invalid
    } else if token_id as u64 > supply {
        TokenStatus::NotYetMinted
    } else {
        TokenStatus::Available
    }
}
