use crate::{
    error::MerkleTreeError,
    tree_node::TreeNode,
};

/// Converts a decimal ui amount (e.g. `"12.345"`) into token units with `decimals` places.
/// Digits past `decimals` are floored away. The string is parsed exactly, never via a float.
pub fn ui_amount_to_token_amount(amount: &str, decimals: u32) -> Result<u64, MerkleTreeError> {
    let invalid = |reason: &str| MerkleTreeError::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = amount.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty amount"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("not an unsigned decimal number"));
    }

    let scale = 10u64
        .checked_pow(decimals)
        .ok_or_else(|| invalid("too many decimals"))?;

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .map_err(|_| invalid("amount overflows u64"))?
    };

    let kept = &fraction[..fraction.len().min(decimals as usize)];
    let fraction_units = if kept.is_empty() {
        0
    } else {
        let padding = 10u64.pow(decimals - kept.len() as u32);
        kept.parse::<u64>()
            .map_err(|_| invalid("amount overflows u64"))?
            * padding
    };

    whole_units
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_units))
        .ok_or_else(|| invalid("amount overflows u64"))
}

/// Given a set of tree nodes, get the max total claim amount. `None` on overflow.
pub fn get_max_total_claim(nodes: &[TreeNode]) -> Option<u64> {
    nodes
        .iter()
        .try_fold(0, |acc: u64, n| acc.checked_add(n.amount()))
}
