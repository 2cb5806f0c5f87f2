//! XP and level arithmetic.
//!
//! Levels follow a quadratic curve: reaching level `L` requires
//! `(L - 1)^2 * 100` total XP. The level is always derived from total XP,
//! never stored independently of it.

/// XP for one run: 10 per meter plus 1 per full minute.
pub fn xp_for_run(distance_meters: f64, duration_seconds: u32) -> u64 {
    let distance_xp = (distance_meters.max(0.0) * 10.0).floor() as u64;
    let duration_xp = u64::from(duration_seconds / 60);
    distance_xp + duration_xp
}

/// Level reached with `xp` total experience.
pub fn level_for_xp(xp: u64) -> u32 {
    let root = integer_sqrt(xp / 100);
    u32::try_from(root).unwrap_or(u32::MAX).saturating_add(1)
}

/// Total XP at which `level` begins.
pub fn xp_for_level(level: u32) -> u64 {
    let steps = u64::from(level.saturating_sub(1));
    steps.saturating_mul(steps).saturating_mul(100)
}

/// Total XP at which the level after `level` begins.
pub fn xp_for_next_level(level: u32) -> u64 {
    let level = u64::from(level);
    level.saturating_mul(level).saturating_mul(100)
}

/// Fraction of the way from the start of the current level to the next (0..1).
pub fn level_progress(xp: u64) -> f64 {
    let level = level_for_xp(xp);
    let floor = xp_for_level(level);
    let ceiling = xp_for_next_level(level);
    if ceiling <= floor {
        return 0.0;
    }
    (xp - floor) as f64 / (ceiling - floor) as f64
}

/// Floor of the square root of `n`.
fn integer_sqrt(n: u64) -> u64 {
    let mut root = (n as f64).sqrt() as u64;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).is_some_and(|sq| sq <= n) {
        root += 1;
    }
    root
}
