//! Behaviour every `WishDao` implementation must share.

use futures_util::{Stream, StreamExt};
use std::time::Duration;
use wishlist::storage::{InsertOutcome, WishDao};
use wishlist::Wish;

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(100);

/// Next item of a live stream, failing the test if it takes too long.
pub async fn next_within<S, T>(stream: &mut S) -> T
where
    S: Stream<Item = T> + Unpin,
{
    tokio::time::timeout(WAIT, stream.next())
        .await
        .expect("live stream did not emit in time")
        .expect("live stream ended unexpectedly")
}

/// Assert a live stream stays quiet for a short while.
pub async fn assert_silent<S, T>(stream: &mut S)
where
    S: Stream<Item = T> + Unpin,
{
    assert!(
        tokio::time::timeout(QUIET, stream.next()).await.is_err(),
        "live stream emitted unexpectedly"
    );
}

/// Current table contents, read through a fresh subscription.
pub async fn snapshot(dao: &dyn WishDao) -> Vec<Wish> {
    let mut stream = dao.list_all();
    next_within(&mut stream).await.unwrap()
}

pub async fn inserted_id(dao: &dyn WishDao, wish: Wish) -> i64 {
    match dao.insert(wish).await.unwrap() {
        InsertOutcome::Inserted(id) => id,
        InsertOutcome::Ignored => panic!("insert was unexpectedly ignored"),
    }
}

pub async fn insert_then_get_by_id(dao: &dyn WishDao) {
    let id = inserted_id(dao, Wish::new("A", "B")).await;
    assert_ne!(id, 0);

    let mut stream = dao.get_by_id(id);
    let wish = next_within(&mut stream).await.unwrap();
    assert_eq!(wish.id, id);
    assert_eq!(wish.title, "A");
    assert_eq!(wish.description, "B");
}

pub async fn insert_conflict_is_ignored(dao: &dyn WishDao) {
    let id = inserted_id(dao, Wish::new("First", "Original")).await;

    let outcome = dao.insert(Wish::new("Second", "Replacement").with_id(id)).await.unwrap();
    assert_eq!(outcome, InsertOutcome::Ignored);

    let rows = snapshot(dao).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], Wish::new("First", "Original").with_id(id));
}

pub async fn update_is_observed(dao: &dyn WishDao) {
    let id = inserted_id(dao, Wish::new("A", "desc")).await;
    let mut stream = dao.get_by_id(id);
    assert_eq!(next_within(&mut stream).await.unwrap().title, "A");

    dao.update(Wish::new("Z", "desc").with_id(id)).await.unwrap();

    let updated = next_within(&mut stream).await.unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "Z");
}

pub async fn update_missing_id_is_noop(dao: &dyn WishDao) {
    inserted_id(dao, Wish::new("Kept", "row")).await;
    let before = snapshot(dao).await;

    dao.update(Wish::new("Z", "").with_id(9999)).await.unwrap();

    let after = snapshot(dao).await;
    assert_eq!(after.len(), before.len());
    assert_eq!(after, before);
}

pub async fn delete_then_list(dao: &dyn WishDao) {
    let keep = inserted_id(dao, Wish::new("Keep", "me")).await;
    let drop = inserted_id(dao, Wish::new("Drop", "me")).await;

    dao.delete(Wish::new("Drop", "me").with_id(drop)).await.unwrap();

    let rows = snapshot(dao).await;
    assert_eq!(rows, vec![Wish::new("Keep", "me").with_id(keep)]);
}

pub async fn delete_missing_id_is_noop(dao: &dyn WishDao) {
    inserted_id(dao, Wish::new("Only", "one")).await;
    dao.delete(Wish::default().with_id(4242)).await.unwrap();
    assert_eq!(snapshot(dao).await.len(), 1);
}

pub async fn list_all_reemits_after_insert(dao: &dyn WishDao) {
    let mut stream = dao.list_all();
    assert!(next_within(&mut stream).await.unwrap().is_empty());

    let id = inserted_id(dao, Wish::new("Live", "row")).await;

    let rows = next_within(&mut stream).await.unwrap();
    assert_eq!(rows, vec![Wish::new("Live", "row").with_id(id)]);
}

pub async fn list_all_is_ordered_by_id(dao: &dyn WishDao) {
    let first = inserted_id(dao, Wish::new("z", "")).await;
    let second = inserted_id(dao, Wish::new("a", "")).await;

    let ids: Vec<i64> = snapshot(dao).await.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![first, second]);
}

pub async fn get_by_id_missing_is_silent(dao: &dyn WishDao) {
    let mut stream = dao.get_by_id(12345);
    assert_silent(&mut stream).await;

    inserted_id(dao, Wish::new("Other", "row")).await;
    assert_silent(&mut stream).await;
}

pub async fn get_by_id_ignores_other_rows(dao: &dyn WishDao) {
    let watched = inserted_id(dao, Wish::new("Watched", "")).await;
    let other = inserted_id(dao, Wish::new("Other", "")).await;

    let mut stream = dao.get_by_id(watched);
    next_within(&mut stream).await.unwrap();

    dao.update(Wish::new("Other 2", "").with_id(other)).await.unwrap();
    assert_silent(&mut stream).await;
}

pub async fn no_op_mutations_do_not_reemit(dao: &dyn WishDao) {
    let id = inserted_id(dao, Wish::new("Once", "")).await;
    let mut stream = dao.list_all();
    next_within(&mut stream).await.unwrap();

    dao.insert(Wish::new("Again", "").with_id(id)).await.unwrap();
    dao.update(Wish::new("Nobody", "").with_id(id + 100)).await.unwrap();
    dao.delete(Wish::default().with_id(id + 100)).await.unwrap();

    assert_silent(&mut stream).await;
}

pub async fn ids_are_not_reused(dao: &dyn WishDao) {
    inserted_id(dao, Wish::new("a", "")).await;
    let last = inserted_id(dao, Wish::new("b", "")).await;
    dao.delete(Wish::default().with_id(last)).await.unwrap();

    let next = inserted_id(dao, Wish::new("c", "")).await;
    assert!(next > last, "id {} was handed out again", next);
}

pub async fn explicit_id_advances_sequence(dao: &dyn WishDao) {
    assert_eq!(dao.insert(Wish::new("Pinned", "").with_id(10)).await.unwrap(), InsertOutcome::Inserted(10));

    let next = inserted_id(dao, Wish::new("After", "")).await;
    assert!(next > 10);
}

pub async fn max_id_exhausts_sequence(dao: &dyn WishDao) {
    assert_eq!(
        dao.insert(Wish::new("Last", "id").with_id(i64::MAX)).await.unwrap(),
        InsertOutcome::Inserted(i64::MAX)
    );

    assert!(dao.insert(Wish::new("No", "room")).await.is_err());

    // the failed insert leaves the store usable
    let rows = snapshot(dao).await;
    assert_eq!(rows, vec![Wish::new("Last", "id").with_id(i64::MAX)]);
    dao.update(Wish::new("Still", "writable").with_id(i64::MAX)).await.unwrap();
}

/// `dao` must be built on a notifier with a capacity of one.
pub async fn lagged_stream_requeries(dao: &dyn WishDao) {
    let mut stream = dao.list_all();
    assert!(next_within(&mut stream).await.unwrap().is_empty());

    for title in ["one", "two", "three"] {
        inserted_id(dao, Wish::new(title, "")).await;
    }

    let titles: Vec<String> = next_within(&mut stream).await.unwrap().into_iter().map(|w| w.title).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

pub async fn deleted_row_stops_by_id_stream_emitting(dao: &dyn WishDao) {
    let id = inserted_id(dao, Wish::new("Gone", "soon")).await;
    let mut stream = dao.get_by_id(id);
    next_within(&mut stream).await.unwrap();

    dao.delete(Wish::default().with_id(id)).await.unwrap();
    assert_silent(&mut stream).await;
}

/// Run every shared check against fresh DAOs from `make`.
macro_rules! dao_contract_tests {
    ($make:expr) => {
        #[tokio::test]
        async fn test_insert_then_get_by_id() {
            let dao = $make.await;
            $crate::common::insert_then_get_by_id(&dao).await;
        }

        #[tokio::test]
        async fn test_insert_conflict_is_ignored() {
            let dao = $make.await;
            $crate::common::insert_conflict_is_ignored(&dao).await;
        }

        #[tokio::test]
        async fn test_update_is_observed() {
            let dao = $make.await;
            $crate::common::update_is_observed(&dao).await;
        }

        #[tokio::test]
        async fn test_update_missing_id_is_noop() {
            let dao = $make.await;
            $crate::common::update_missing_id_is_noop(&dao).await;
        }

        #[tokio::test]
        async fn test_delete_then_list() {
            let dao = $make.await;
            $crate::common::delete_then_list(&dao).await;
        }

        #[tokio::test]
        async fn test_delete_missing_id_is_noop() {
            let dao = $make.await;
            $crate::common::delete_missing_id_is_noop(&dao).await;
        }

        #[tokio::test]
        async fn test_list_all_reemits_after_insert() {
            let dao = $make.await;
            $crate::common::list_all_reemits_after_insert(&dao).await;
        }

        #[tokio::test]
        async fn test_list_all_is_ordered_by_id() {
            let dao = $make.await;
            $crate::common::list_all_is_ordered_by_id(&dao).await;
        }

        #[tokio::test]
        async fn test_get_by_id_missing_is_silent() {
            let dao = $make.await;
            $crate::common::get_by_id_missing_is_silent(&dao).await;
        }

        #[tokio::test]
        async fn test_get_by_id_ignores_other_rows() {
            let dao = $make.await;
            $crate::common::get_by_id_ignores_other_rows(&dao).await;
        }

        #[tokio::test]
        async fn test_no_op_mutations_do_not_reemit() {
            let dao = $make.await;
            $crate::common::no_op_mutations_do_not_reemit(&dao).await;
        }

        #[tokio::test]
        async fn test_ids_are_not_reused() {
            let dao = $make.await;
            $crate::common::ids_are_not_reused(&dao).await;
        }

        #[tokio::test]
        async fn test_explicit_id_advances_sequence() {
            let dao = $make.await;
            $crate::common::explicit_id_advances_sequence(&dao).await;
        }

        #[tokio::test]
        async fn test_max_id_exhausts_sequence() {
            let dao = $make.await;
            $crate::common::max_id_exhausts_sequence(&dao).await;
        }

        #[tokio::test]
        async fn test_deleted_row_stops_by_id_stream_emitting() {
            let dao = $make.await;
            $crate::common::deleted_row_stops_by_id_stream_emitting(&dao).await;
        }
    };
}
