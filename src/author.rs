//! Author level labels. An author's level grows with the base-2 logarithm of
//! their post count, so each level takes twice as many posts as the last.

/// Computes the author's level for `post_count`: `floor(log2(count))`, with
/// anything below 2 mapped to level 1 and everything else shifted down by one.
/// A count of zero yields level 1.
pub fn author_level(post_count: u64) -> u64 {
    let level = (post_count as f64).log2().floor();
    if level < 2.0 {
        1
    } else {
        level as u64 - 1
    }
}

/// Labels an author by post count.
///
/// When `is_auto` is `false` and a non-empty `labels` list is given, the label
/// at `level - 1` is used. Levels past the end of the list fall back to the
/// last label, but the comparison is `level > labels.len()`, so a level equal
/// to the length still indexes the last label directly. In every other case
/// the label is `Lv{level}`.
pub fn author_label(post_count: u64, is_auto: bool, labels: Option<&[String]>) -> String {
    let level = author_level(post_count);
    match labels {
        Some(labels) if !is_auto && !labels.is_empty() => {
            let index = if level > labels.len() as u64 {
                labels.len() - 1
            } else {
                (level - 1) as usize
            };
            labels[index].clone()
        }
        _ => format!("Lv{}", level),
    }
}
