//! Slide reordering by swapping positions with a neighbour.
//!
//! Everything here is pure; `queries::move_slide` runs the same logic over
//! row-locked data inside a transaction.

use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// The parts of a slide that reordering looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct SlidePosition {
    pub id: i64,
    pub slideshow_id: i64,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}

/// The slide `target` swaps with, if any.
///
/// Up: the largest order strictly below the target's. Down: the smallest
/// strictly above. Several siblings sharing that order resolve to the lowest id.
pub fn neighbour(siblings: &[SlidePosition], target: &SlidePosition, dir: Direction) -> Option<SlidePosition> {
    let candidates = siblings
        .iter()
        .filter(|s| s.slideshow_id == target.slideshow_id && s.id != target.id);

    match dir {
        Direction::Up => candidates
            .filter(|s| s.order < target.order)
            .min_by_key(|s| (Reverse(s.order), s.id))
            .copied(),
        Direction::Down => candidates
            .filter(|s| s.order > target.order)
            .min_by_key(|s| (s.order, s.id))
            .copied(),
    }
}

/// Order in which a multi-slide selection is processed.
///
/// Moving down starts from the highest position. Walking upward from the
/// lowest undoes earlier moves: slide 2 drops to 3, pulling slide 3 up to 2,
/// and slide 3 then swaps straight back. Moving up keeps the list's natural
/// ascending order.
pub fn batch_sequence(selected: &[SlidePosition], dir: Direction) -> Vec<i64> {
    let mut ordered = selected.to_vec();
    match dir {
        Direction::Up => ordered.sort_by_key(|s| (s.slideshow_id, s.order, s.id)),
        Direction::Down => ordered.sort_by_key(|s| (Reverse(s.order), s.slideshow_id, Reverse(s.id))),
    }
    let mut seen = std::collections::HashSet::new();
    ordered
        .into_iter()
        .map(|s| s.id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Swap `slide_id` with its neighbour in `slides`. Returns false on a no-op.
pub fn apply_move(slides: &mut [SlidePosition], slide_id: i64, dir: Direction) -> bool {
    let Some(target) = slides.iter().find(|s| s.id == slide_id).copied() else {
        return false;
    };
    let Some(other) = neighbour(slides, &target, dir) else {
        return false;
    };
    for s in slides.iter_mut() {
        if s.id == target.id {
            s.order = other.order;
        } else if s.id == other.id {
            s.order = target.order;
        }
    }
    true
}

/// Move every slide in `ids`, one at a time, in [`batch_sequence`] order.
/// Returns how many actually moved.
pub fn apply_batch(slides: &mut [SlidePosition], ids: &[i64], dir: Direction) -> usize {
    let selected: Vec<SlidePosition> = slides.iter().filter(|s| ids.contains(&s.id)).copied().collect();
    batch_sequence(&selected, dir)
        .into_iter()
        .filter(|id| apply_move(slides, *id, dir))
        .count()
}
