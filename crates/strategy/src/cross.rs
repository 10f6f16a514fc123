use common::Condition;

/// Decide whether the latest close satisfies the watch condition against
/// its SMA.
///
/// Strict inequality in both directions: a close exactly equal to the SMA
/// is a non-event and triggers neither condition. A NaN on either side
/// compares false, so a watch with gaps in its data never fires.
pub fn crossed(close: f64, sma: f64, condition: Condition) -> bool {
    match condition {
        Condition::Greater => close > sma,
        Condition::Less => close < sma,
    }
}
