use anchor_lang::prelude::*;

use crate::error::AixblockError;

/// Below this many points in a period only half of the pool is paid out; the
/// remainder stays in the vault as reserve.
pub const RESERVE_THRESHOLD: u64 = 500;

pub fn distributable_pool(total_points: u64, monthly_pool: u64) -> u64 {
    if total_points < RESERVE_THRESHOLD {
        monthly_pool / 2
    } else {
        monthly_pool
    }
}

/// Pro rata share of the distributable pool for each entry of `points`, in
/// the same order. `total_points` is the sum of `points`.
pub fn reward_shares(points: &[u64], total_points: u64, monthly_pool: u64) -> Result<Vec<u64>> {
    require!(total_points > 0, AixblockError::NoContributions);

    let pool = distributable_pool(total_points, monthly_pool) as u128;
    Ok(points
        .iter()
        .map(|p| (*p as u128 * pool / total_points as u128) as u64)
        .collect())
}
