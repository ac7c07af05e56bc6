//! Complexity-score to model-tier mapping.

/// The most capable tier. Escalation never goes past it.
pub const MAX_TIER: u8 = 4;

/// Inclusive score bands and the tier each maps to.
const TIER_BANDS: [(i64, i64, u8); 4] = [(1, 3, 1), (4, 5, 2), (6, 8, 3), (9, 10, 4)];

/// Map a complexity score to a tier.
///
/// Total for any input: scores are clamped to 1..=10 before the band
/// scan, so negatives map to tier 1 and anything above 10 to tier 4.
pub fn score_to_tier(score: i64) -> u8 {
    let score = score.clamp(1, 10);
    for (lo, hi, tier) in TIER_BANDS {
        if score >= lo && score <= hi {
            return tier;
        }
    }
    MAX_TIER
}

/// Human-readable tier label for logs.
pub fn tier_name(tier: u8) -> &'static str {
    match tier {
        1 => "local",
        2 => "fast-cloud",
        3 => "capable",
        4 => "premium",
        _ => "unknown",
    }
}
