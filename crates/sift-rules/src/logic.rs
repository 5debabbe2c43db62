//! Three-valued criterion logic.
//!
//! A [`Verdict`] is `Some(true)` (pass), `Some(false)` (fail) or `None`
//! (unknown, usually insufficient history). Conjunction and disjunction follow
//! Kleene logic; only [`all_pass`] collapses unknown to a plain `false`.

/// Outcome of one criterion on one row.
pub type Verdict = Option<bool>;

/// `value >= threshold`, unknown when the value is unknown.
pub fn at_least<T: PartialOrd>(value: Option<T>, threshold: T) -> Verdict {
    value.map(|v| v >= threshold)
}

/// `value <= threshold`, unknown when the value is unknown.
pub fn at_most<T: PartialOrd>(value: Option<T>, threshold: T) -> Verdict {
    value.map(|v| v <= threshold)
}

/// `value > threshold`, unknown when the value is unknown.
pub fn above<T: PartialOrd>(value: Option<T>, threshold: T) -> Verdict {
    value.map(|v| v > threshold)
}

/// Kleene AND: a known failure dominates an unknown.
pub const fn and(lhs: Verdict, rhs: Verdict) -> Verdict {
    match (lhs, rhs) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

/// Kleene OR: a known pass dominates an unknown.
pub const fn or(lhs: Verdict, rhs: Verdict) -> Verdict {
    match (lhs, rhs) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

/// Fail-closed conjunction: true only when every verdict is a known pass.
pub fn all_pass(verdicts: impl IntoIterator<Item = Verdict>) -> bool {
    verdicts.into_iter().all(|v| v == Some(true))
}
