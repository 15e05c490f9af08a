//! Quantity validation for stock mutations and bulk per-size updates.

use crate::error::{CoreError, CoreResult};

/// Validate a load/sell quantity: must be at least 1.
pub fn require_positive(qty: i64, op: &str) -> CoreResult<()> {
    if qty < 1 {
        return Err(CoreError::Validation(format!(
            "quantity to {op} must be at least 1, got {qty}"
        )));
    }
    Ok(())
}

/// Parse one quantity string from a bulk per-size update.
///
/// Contract: a blank field means zero, negative values clamp to zero, and
/// anything non-numeric is rejected outright.
pub fn parse_quantity(raw: &str) -> CoreResult<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| CoreError::Validation(format!("invalid quantity {trimmed:?}")))?;
    Ok(value.max(0))
}

/// Turn raw (size label, quantity string) entries into a validated update
/// plan.
///
/// Entries with a blank size label are dropped; quantities go through
/// [`parse_quantity`]. Any invalid quantity fails the whole plan, so a bulk
/// update never half-applies.
pub fn build_quantity_plan(entries: &[(String, String)]) -> CoreResult<Vec<(String, i64)>> {
    let mut plan = Vec::with_capacity(entries.len());
    for (label, raw_qty) in entries {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        plan.push((label.to_string(), parse_quantity(raw_qty)?));
    }
    Ok(plan)
}
