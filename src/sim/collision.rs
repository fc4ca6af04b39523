//! Collision detection between the player and enemies
//!
//! Everything here is a plain rectangle test. The optional buffer inflates the
//! candidate rectangle once, on all four sides, to tune how forgiving hits feel.

use super::rect::Rect;

/// Result of scanning a list of candidates for a hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    /// Index of the first overlapping candidate (insertion order)
    pub index: usize,
    /// The candidate's rectangle at the time of the hit
    pub rect: Rect,
}

/// True if `a` intersects `b` grown by `buffer` on every side.
///
/// `buffer` must not be negative.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect, buffer: f32) -> bool {
    debug_assert!(buffer >= 0.0, "collision buffer must not be negative");
    a.intersects(&b.inflated(buffer))
}

/// Find the first candidate whose rectangle overlaps `subject`
///
/// Candidates are scanned in order, so the result is stable for identical inputs.
pub fn find_first_collision<'a, I>(subject: &Rect, candidates: I, buffer: f32) -> Option<CollisionHit>
where
    I: IntoIterator<Item = &'a Rect>,
{
    candidates
        .into_iter()
        .enumerate()
        .find(|(_, rect)| overlaps(subject, rect, buffer))
        .map(|(index, rect)| CollisionHit { index, rect: *rect })
}
