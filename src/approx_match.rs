//! Approximate text correspondence
//!
//! Maps a character offset in one text to the best-effort corresponding
//! offset in a differently-formatted rendering of the same content (raw
//! source vs. the plain text extracted from rendered HTML). The matcher is
//! a pluggable capability: `PreviewSync` built without one degrades the
//! whole sync feature to a no-op rather than crashing.

/// Fuzzy positional matcher contract.
///
/// Offsets are character offsets. `None` means no adequate match was
/// found; callers silently skip the sync action in that case.
pub trait ApproxMatcher: Send + Sync {
    fn locate(&self, source: &str, offset: usize, target: &str) -> Option<usize>;
}

/// Default matcher: a window of source text around the offset is walked
/// greedily against every alignment of the target, tolerating a few
/// inserted characters (markup artifacts, reflowed whitespace) per source
/// character and dropping source characters with no nearby counterpart.
/// The best-scoring alignment wins; anything under the similarity floor is
/// rejected.
#[derive(Debug, Clone)]
pub struct WindowedMatcher {
    /// Characters of context taken on each side of the offset.
    pub window: usize,
    /// Inserted target characters tolerated per source character.
    pub slack: usize,
    /// Minimum fraction of window characters that must match.
    pub floor: f32,
}

impl Default for WindowedMatcher {
    fn default() -> Self {
        Self {
            window: 80,
            slack: 4,
            floor: 0.5,
        }
    }
}

impl ApproxMatcher for WindowedMatcher {
    fn locate(&self, source: &str, offset: usize, target: &str) -> Option<usize> {
        let src: Vec<char> = source.chars().collect();
        let tgt: Vec<char> = target.chars().collect();
        if tgt.is_empty() {
            return None;
        }
        let offset = offset.min(src.len());
        let begin = offset.saturating_sub(self.window);
        let end = (offset + self.window).min(src.len());
        let needle = &src[begin..end];
        if needle.is_empty() {
            return None;
        }
        let anchor = offset - begin;

        let mut best_score = 0.0f32;
        let mut best_mapped = None;
        for start in 0..tgt.len() {
            let (score, mapped) = walk(needle, anchor, &tgt, start, self.slack);
            if score > best_score {
                best_score = score;
                best_mapped = Some(mapped);
            }
        }

        if best_score < self.floor {
            return None;
        }
        best_mapped
    }
}

/// Greedy alignment of `needle` against `tgt[start..]`. Returns the
/// fraction of needle characters matched and the target position the
/// anchor character landed on.
fn walk(needle: &[char], anchor: usize, tgt: &[char], start: usize, slack: usize) -> (f32, usize) {
    let mut tp = start;
    let mut matched = 0usize;
    let mut mapped = start.min(tgt.len());

    for (np, &ch) in needle.iter().enumerate() {
        if np == anchor {
            mapped = tp.min(tgt.len());
        }
        let limit = (tp + slack + 1).min(tgt.len());
        if let Some(hit) = (tp..limit).find(|&k| tgt[k] == ch) {
            if np == anchor {
                mapped = hit;
            }
            matched += 1;
            tp = hit + 1;
        }
        // Unmatched source character: leave the target pointer in place.
    }
    if anchor >= needle.len() {
        mapped = tp.min(tgt.len());
    }

    (matched as f32 / needle.len() as f32, mapped)
}
