// crates/sync-engine/src/conflict.rs
//! Conflict detection and resolution

use crate::types::{Conflict, Resolution};
use quotesync_core::Quote;

/// Finds remote quotes whose text matches a local quote with another category
///
/// At most one conflict is emitted per remote quote: the first local match
/// wins. Neither input is modified.
pub fn detect_conflicts(local: &[Quote], remote: &[Quote]) -> Vec<Conflict> {
    remote
        .iter()
        .filter_map(|remote_quote| {
            local
                .iter()
                .find(|local_quote| local_quote.conflicts_with(remote_quote))
                .map(|local_quote| {
                    Conflict::category_mismatch(local_quote.clone(), remote_quote.clone())
                })
        })
        .collect()
}

/// Applies the remote-wins policy to `collection`
///
/// When `enabled` is false the collection comes back unchanged. Otherwise the
/// first quote equal to the conflict's local side (text and category) takes
/// the remote category. A conflict whose local quote is no longer present is
/// skipped and not counted, so a stale list is safe to apply.
pub fn resolve_conflicts(
    conflicts: &[Conflict],
    mut collection: Vec<Quote>,
    enabled: bool,
) -> Resolution {
    if !enabled {
        return Resolution {
            collection,
            resolved: 0,
        };
    }

    let mut resolved = 0;
    for conflict in conflicts {
        let target = collection
            .iter_mut()
            .find(|quote| **quote == conflict.local);

        match target {
            Some(quote) => {
                log::debug!(
                    "Resolving \"{}\": {} -> {}",
                    quote.text,
                    quote.category,
                    conflict.remote.category
                );
                quote.category = conflict.remote.category.clone();
                resolved += 1;
            }
            _ => log::trace!("Skipping stale conflict for \"{}\"", conflict.text()),
        }
    }

    Resolution { collection, resolved }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, category: &str) -> Quote {
        Quote::new(text, category)
    }

    #[test]
    fn test_detect_single_mismatch() {
        let local = vec![q("Be kind", "A")];
        let remote = vec![q("Be kind", "B")];

        let conflicts = detect_conflicts(&local, &remote);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].local, q("Be kind", "A"));
        assert_eq!(conflicts[0].remote, q("Be kind", "B"));
    }

    #[test]
    fn test_detect_ignores_exact_and_unrelated() {
        let local = vec![q("X", "A"), q("Y", "B")];
        let remote = vec![q("X", "A"), q("Z", "C")];
        assert!(detect_conflicts(&local, &remote).is_empty());
    }

    #[test]
    fn test_detect_one_per_remote_quote() {
        let local = vec![q("Be kind", "A"), q("Be kind", "C")];
        let remote = vec![q("Be kind", "B")];

        let conflicts = detect_conflicts(&local, &remote);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].local.category, "A");
    }

    #[test]
    fn test_detect_is_case_sensitive() {
        let local = vec![q("be kind", "A")];
        let remote = vec![q("Be kind", "B")];
        assert!(detect_conflicts(&local, &remote).is_empty());
    }

    #[test]
    fn test_detect_does_not_mutate() {
        let local = vec![q("Be kind", "A")];
        let remote = vec![q("Be kind", "B")];
        let _ = detect_conflicts(&local, &remote);
        assert_eq!(local, vec![q("Be kind", "A")]);
        assert_eq!(remote, vec![q("Be kind", "B")]);
    }

    #[test]
    fn test_resolve_disabled_is_noop() {
        let collection = vec![q("Be kind", "A")];
        let conflicts = detect_conflicts(&collection, &[q("Be kind", "B")]);

        let resolution = resolve_conflicts(&conflicts, collection.clone(), false);
        assert_eq!(resolution.collection, collection);
        assert_eq!(resolution.resolved, 0);
    }

    #[test]
    fn test_resolve_remote_wins() {
        let collection = vec![q("Be kind", "A"), q("Other", "X")];
        let conflicts = detect_conflicts(&collection, &[q("Be kind", "B")]);

        let resolution = resolve_conflicts(&conflicts, collection, true);
        assert_eq!(resolution.collection, vec![q("Be kind", "B"), q("Other", "X")]);
        assert_eq!(resolution.resolved, 1);
    }

    #[test]
    fn test_resolve_stale_conflict_not_counted() {
        let conflict = Conflict::category_mismatch(q("Gone", "A"), q("Gone", "B"));
        let resolution = resolve_conflicts(&[conflict], vec![q("Other", "X")], true);
        assert_eq!(resolution.resolved, 0);
        assert_eq!(resolution.collection, vec![q("Other", "X")]);
    }

    #[test]
    fn test_resolve_twice_does_not_double_apply() {
        let conflicts = detect_conflicts(&[q("Be kind", "A")], &[q("Be kind", "B")]);
        let first = resolve_conflicts(&conflicts, vec![q("Be kind", "A")], true);
        let second = resolve_conflicts(&conflicts, first.collection.clone(), true);

        assert_eq!(second.resolved, 0);
        assert_eq!(second.collection, first.collection);
    }

    #[test]
    fn test_resolve_duplicate_conflicts_in_batch() {
        let conflict = Conflict::category_mismatch(q("Be kind", "A"), q("Be kind", "B"));
        let resolution =
            resolve_conflicts(&[conflict.clone(), conflict], vec![q("Be kind", "A")], true);
        assert_eq!(resolution.resolved, 1);
    }

    #[test]
    fn test_resolve_targets_the_conflicting_duplicate() {
        let collection = vec![q("X", "B"), q("X", "A")];
        let conflicts = detect_conflicts(&collection, &[q("X", "B")]);
        assert_eq!(conflicts.len(), 1);

        let resolution = resolve_conflicts(&conflicts, collection, true);
        assert_eq!(resolution.resolved, 1);
        assert_eq!(resolution.collection, vec![q("X", "B"), q("X", "B")]);
        assert!(detect_conflicts(&resolution.collection, &[q("X", "B")]).is_empty());
    }
}
