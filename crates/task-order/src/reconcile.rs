//! Order Reconciler
//!
//! Merges the item set supplied by the remote source with the order the
//! user saved for a view.

use std::collections::HashMap;

use crate::entity::Entity;

/// Arrange `remote` by `stored`.
///
/// Items named in `stored` come first, in stored order; ids missing from
/// `remote` are skipped and repeated ids only count once. Every item not
/// named follows in the order the remote source supplied it. The result is
/// always a permutation of `remote`.
pub fn reconcile<T: Entity>(remote: Vec<T>, stored: &[T::Id]) -> Vec<T> {
    if stored.is_empty() {
        return remote;
    }

    let mut index: HashMap<T::Id, usize> = HashMap::with_capacity(remote.len());
    for (pos, item) in remote.iter().enumerate() {
        index.entry(item.id()).or_insert(pos);
    }

    let mut slots: Vec<Option<T>> = remote.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(slots.len());

    for id in stored {
        if let Some(pos) = index.remove(id) {
            if let Some(item) = slots[pos].take() {
                result.push(item);
            }
        }
    }

    result.extend(slots.into_iter().flatten());
    result
}

/// Ids of `items` in display order
pub fn ids_of<T: Entity>(items: &[T]) -> Vec<T::Id> {
    items.iter().map(Entity::id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
        content: &'static str,
    }

    impl Entity for Row {
        type Id = String;

        fn id(&self) -> String {
            self.id.to_string()
        }
    }

    fn rows(ids: &[&'static str]) -> Vec<Row> {
        ids.iter().map(|id| Row { id, content: "task" }).collect()
    }

    fn order(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn sorted_ids(items: &[Row]) -> Vec<String> {
        let mut ids = ids_of(items);
        ids.sort();
        ids
    }

    /// Every ordering of every subset of `pool`, used as stored orders
    fn stored_orders(pool: &[&str]) -> Vec<Vec<String>> {
        fn permute(prefix: Vec<String>, rest: Vec<String>, out: &mut Vec<Vec<String>>) {
            out.push(prefix.clone());
            for i in 0..rest.len() {
                let mut next = prefix.clone();
                next.push(rest[i].clone());
                let mut remaining = rest.clone();
                remaining.remove(i);
                permute(next, remaining, out);
            }
        }
        let mut out = Vec::new();
        permute(Vec::new(), order(pool), &mut out);
        out
    }

    #[test]
    fn test_empty_stored_order_is_identity() {
        let remote = rows(&["c", "a", "b"]);
        assert_eq!(reconcile(remote.clone(), &[]), remote);
    }

    #[test]
    fn test_unseen_items_go_last() {
        let result = reconcile(rows(&["a", "b", "c"]), &order(&["b", "a"]));
        assert_eq!(ids_of(&result), order(&["b", "a", "c"]));
    }

    #[test]
    fn test_unseen_items_keep_remote_order() {
        let result = reconcile(rows(&["d", "a", "e", "b"]), &order(&["b"]));
        assert_eq!(ids_of(&result), order(&["b", "d", "a", "e"]));
    }

    #[test]
    fn test_stale_ids_are_skipped() {
        let result = reconcile(rows(&["a", "b"]), &order(&["gone", "b", "older", "a"]));
        assert_eq!(ids_of(&result), order(&["b", "a"]));
    }

    #[test]
    fn test_duplicate_stored_ids_first_wins() {
        let result = reconcile(rows(&["a", "b", "c"]), &order(&["c", "a", "c", "b", "a"]));
        assert_eq!(ids_of(&result), order(&["c", "a", "b"]));
    }

    #[test]
    fn test_result_is_permutation_and_idempotent() {
        // stored orders may mention ids that the remote set does not have
        let pool = ["a", "b", "c", "x"];
        for remote_ids in [vec!["a", "b", "c"], vec!["c", "a"], vec![], vec!["b"]] {
            let remote = rows(&remote_ids);
            for stored in stored_orders(&pool) {
                let once = reconcile(remote.clone(), &stored);
                assert_eq!(sorted_ids(&once), sorted_ids(&remote), "stored {:?}", stored);

                let again = reconcile(remote.clone(), &ids_of(&once));
                assert_eq!(again, once, "stored {:?}", stored);
            }
        }
    }

    #[test]
    fn test_content_travels_with_id() {
        let remote = vec![
            Row { id: "1", content: "water plants" },
            Row { id: "2", content: "call mom" },
        ];
        let result = reconcile(remote, &order(&["2", "1"]));
        assert_eq!(result[0].content, "call mom");
        assert_eq!(result[1].content, "water plants");
    }
}
