//! Multiple-choice distractors.
//!
//! Distractors are drawn from cards sharing the target's difficulty tier.
//! When that tier cannot supply enough usable cards the whole pool is used
//! instead. Usable means: not the target itself, a non-empty gloss, and a
//! gloss that is textually distinct (after [`normalize`]) from the target's
//! gloss and from every other candidate. Small pools degrade to fewer
//! options; they never fail.

use std::collections::HashSet;

use drillkit::Card;

use crate::normalize::normalize;
use crate::shuffle::Shuffler;

/// Number of wrong answers offered alongside the correct one.
pub const DISTRACTOR_COUNT: usize = 3;

/// Pick up to `count` wrong glosses for `target` from `pool`.
///
/// The draw is a uniform sample without replacement: candidates are shuffled
/// and the first `count` are kept.
///
/// ```
/// use drillkit_engine::Card;
/// use drillkit_engine::distractor::select;
/// use drillkit_engine::shuffle::NoShuffle;
///
/// let pool = vec![
///     Card::new(1, "Hola", "Hello", ""),
///     Card::new(2, "Gracias", "Thank you", ""),
///     Card::new(3, "Adiós", "Goodbye", ""),
/// ];
///
/// let wrong = select(&pool[0], &pool, 3, &mut NoShuffle);
/// assert_eq!(wrong, vec!["Thank you", "Goodbye"]);
/// ```
pub fn select<S: Shuffler>(target: &Card, pool: &[Card], count: usize, shuffler: &mut S) -> Vec<String> {
    let tier = target.tier();
    let same_tier = usable(target, pool.iter().filter(|c| c.tier() == tier));

    let mut candidates = if same_tier.len() >= count {
        same_tier
    } else {
        usable(target, pool.iter())
    };

    shuffler.shuffle(&mut candidates);
    candidates.truncate(count);
    candidates.into_iter().map(|c| c.gloss.clone()).collect()
}

/// Build the full option list for `target`: the distractors plus the correct
/// gloss, in a shuffled presentation order.
///
/// The correct gloss appears exactly once.
pub fn options<S: Shuffler>(target: &Card, pool: &[Card], count: usize, shuffler: &mut S) -> Vec<String> {
    let mut options = select(target, pool, count, shuffler);
    options.push(target.gloss.clone());
    shuffler.shuffle(&mut options);
    options
}

fn usable<'a>(target: &Card, cards: impl Iterator<Item = &'a Card>) -> Vec<&'a Card> {
    let mut seen = HashSet::new();
    seen.insert(normalize(&target.gloss));

    cards
        .filter(|c| c.key != target.key)
        .filter(|c| {
            let gloss = normalize(&c.gloss);
            !gloss.is_empty() && seen.insert(gloss)
        })
        .collect()
}
