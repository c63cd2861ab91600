// crates/sync-engine/src/merge.rs
//! Merging the remote collection into the local one

use quotesync_core::Quote;

/// Appends remote quotes whose text is new to the local collection
///
/// Local order is kept and new quotes follow in remote order. A remote quote
/// is skipped if its text is already present locally, whatever the category:
/// disagreeing categories are the conflict resolver's business. That also
/// means a new remote quote whose text collides with an unrelated local one
/// is dropped.
pub fn merge(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    let mut merged = local.to_vec();

    for remote_quote in remote {
        if merged.iter().any(|quote| quote == remote_quote) {
            continue;
        }
        if merged.iter().any(|quote| quote.same_text(remote_quote)) {
            log::trace!("Merge skipping conflicting text \"{}\"", remote_quote.text);
            continue;
        }
        merged.push(remote_quote.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn q(text: &str, category: &str) -> Quote {
        Quote::new(text, category)
    }

    #[test]
    fn test_merge_no_duplicate() {
        let local = vec![q("X", "A")];
        let remote = vec![q("X", "A"), q("Y", "B")];
        assert_eq!(merge(&local, &remote), vec![q("X", "A"), q("Y", "B")]);
    }

    #[test]
    fn test_merge_skips_conflicting_text() {
        let local = vec![q("Be kind", "A")];
        let remote = vec![q("Be kind", "B")];
        assert_eq!(merge(&local, &remote), local);
    }

    #[test]
    fn test_merge_keeps_order() {
        let local = vec![q("L2", "x"), q("L1", "x")];
        let remote = vec![q("R2", "y"), q("L1", "x"), q("R1", "y")];
        assert_eq!(
            merge(&local, &remote),
            vec![q("L2", "x"), q("L1", "x"), q("R2", "y"), q("R1", "y")]
        );
    }

    #[test]
    fn test_merge_deduplicates_within_remote() {
        let remote = vec![q("R", "y"), q("R", "y"), q("R", "z")];
        assert_eq!(merge(&[], &remote), vec![q("R", "y")]);
    }

    #[test]
    fn test_merge_contains_all_local_and_new_remote() {
        let local = vec![q("A", "1"), q("B", "2"), q("C", "3")];
        let remote = vec![q("B", "9"), q("D", "4"), q("A", "1"), q("E", "5")];
        let merged = merge(&local, &remote);

        for quote in &local {
            assert!(merged.contains(quote));
        }
        for quote in remote.iter().filter(|r| !local.iter().any(|l| l.same_text(r))) {
            assert!(merged.contains(quote));
        }
        assert!(!merged.contains(&q("B", "9")));
    }

    #[test]
    fn test_merge_idempotent() {
        let local = vec![q("A", "1"), q("B", "2")];
        let remote = vec![q("B", "3"), q("C", "4"), q("D", "5")];

        let once = merge(&local, &remote);
        let twice = merge(&once, &remote);

        let once_set: HashSet<_> = once.iter().collect();
        let twice_set: HashSet<_> = twice.iter().collect();
        assert_eq!(once_set, twice_set);
        assert_eq!(once, twice);
    }
}
