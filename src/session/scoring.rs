//! Pure scoring arithmetic (spec.md §4.2): `points = 100 + max(0, floor(50 *
//! (1 - t / (L * 1000))))` for a correct answer, `0` for an incorrect one.
//! Kept free of `Session` so it can be exercised directly without spinning
//! up any session state.

pub const BASE_POINTS: u32 = 100;
pub const MAX_BONUS: f64 = 50.0;

pub fn score_answer(correct: bool, elapsed_ms: u64, time_limit_secs: u32) -> u32 {
    if !correct {
        return 0;
    }
    if time_limit_secs == 0 {
        return BASE_POINTS;
    }
    let limit_ms = time_limit_secs as u64 * 1000;
    let ratio = 1.0 - (elapsed_ms as f64 / limit_ms as f64);
    let bonus = (MAX_BONUS * ratio).floor().max(0.0) as u32;
    BASE_POINTS + bonus
}
