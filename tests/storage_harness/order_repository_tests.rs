//! Macro-generated test suite for `OrderRepository` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use food_order::storage::InMemoryOrderRepository;
//!
//! order_repository_tests!(InMemoryOrderRepository::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Create & Get
//! - `test_create_and_get`: round-trip keeps items, total and customer fields
//! - `test_get_nonexistent`: unknown id returns None
//! - `test_zero_item_order`: an order without items is stored with total 0.00
//! - `test_duplicate_lines_preserved`: two lines for the same item stay two lines
//! - `test_ids_are_unique`: sequential creates never share an id
//!
//! ## List
//! - `test_list_empty`
//! - `test_list_newest_first`: ordered by creation time, descending
//! - `test_list_is_repeatable`: two calls with no writes in between agree
//!
//! ## Status
//! - `test_update_status_keeps_items_and_total`
//! - `test_update_status_nonexistent`
//! - `test_update_status_last_writer_wins`
//!
//! ## Concurrency
//! - `test_concurrent_creates`: parallel creates from spawned tasks

/// Generate a full `OrderRepository` conformance test suite.
///
/// `$factory` must be an expression that evaluates to a fresh, empty
/// repository. It is re-evaluated for each test to ensure isolation. For the
/// concurrent test the repository must also implement `Clone + 'static`.
#[macro_export]
macro_rules! order_repository_tests {
    ($factory:expr) => {
        mod order_repository_contract_tests {
            use super::*;
            use food_order::core::{OrderItem, OrderRepository};
            use rust_decimal_macros::dec;
            use std::collections::HashSet;

            // ==================================================================
            // Create & Get
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let repo = $factory;
                let draft = draft_order("Ada", pizza_and_cola_items());

                let created = repo.create(draft).await.unwrap();
                assert!(created.id > 0);
                assert_eq!(created.status, "pending");
                assert_eq!(created.total, dec!(28.97));
                assert_eq!(created.customer_name.as_deref(), Some("Ada"));
                assert_eq!(created.customer_phone.as_deref(), Some("555-0100"));
                assert_eq!(created.delivery_address.as_deref(), Some("1 Main St"));
                assert_eq!(created.items, pizza_and_cola_items());

                let fetched = repo.get_by_id(created.id).await.unwrap();
                assert!(fetched.is_some(), "Order should exist after create");
                assert_same_order(&fetched.unwrap(), &created);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let repo = $factory;
                assert!(repo.get_by_id(987_654).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_zero_item_order() {
                let repo = $factory;
                let created = repo.create(draft_order("Nobody", Vec::new())).await.unwrap();

                assert!(created.items.is_empty());
                assert_eq!(created.total.to_string(), "0.00");

                let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
                assert!(fetched.items.is_empty());
                assert_eq!(fetched.total, dec!(0));

                let all = repo.list_all().await.unwrap();
                assert_count(&all, 1);
            }

            #[tokio::test]
            async fn test_duplicate_lines_preserved() {
                let repo = $factory;
                let items = vec![
                    OrderItem::new(1, "Margherita Pizza", 1, dec!(12.99)),
                    OrderItem::new(1, "Margherita Pizza", 3, dec!(12.99)),
                ];

                let created = repo.create(draft_order("Ada", items.clone())).await.unwrap();
                let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

                assert_eq!(fetched.items, items);
                assert_eq!(fetched.total, dec!(51.96));
            }

            #[tokio::test]
            async fn test_ids_are_unique() {
                let repo = $factory;
                let mut ids = HashSet::new();
                for i in 0..5 {
                    let order = repo
                        .create(draft_order(&format!("Customer {}", i), pizza_and_cola_items()))
                        .await
                        .unwrap();
                    assert!(ids.insert(order.id), "id {} handed out twice", order.id);
                }
            }

            // ==================================================================
            // List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let repo = $factory;
                assert!(repo.list_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let repo = $factory;
                let oldest = repo.create(draft_minutes_ago("Oldest", 30)).await.unwrap();
                let newest = repo.create(draft_minutes_ago("Newest", 10)).await.unwrap();
                let middle = repo.create(draft_minutes_ago("Middle", 20)).await.unwrap();

                let all = repo.list_all().await.unwrap();
                let ids: Vec<i64> = all.iter().map(|o| o.id).collect();
                assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);

                for order in &all {
                    assert_count(&order.items, 2);
                }
            }

            #[tokio::test]
            async fn test_list_is_repeatable() {
                let repo = $factory;
                repo.create(draft_minutes_ago("A", 3)).await.unwrap();
                repo.create(draft_minutes_ago("B", 2)).await.unwrap();
                repo.create(draft_order("C", Vec::new())).await.unwrap();

                let first = repo.list_all().await.unwrap();
                let second = repo.list_all().await.unwrap();
                assert_count(&first, 3);
                assert_eq!(first, second);
            }

            // ==================================================================
            // Status
            // ==================================================================

            #[tokio::test]
            async fn test_update_status_keeps_items_and_total() {
                let repo = $factory;
                let created = repo.create(draft_order("Ada", pizza_and_cola_items())).await.unwrap();

                let updated = repo.update_status(created.id, "preparing").await.unwrap();
                let updated = updated.expect("Order should exist");
                assert_eq!(updated.status, "preparing");
                assert_eq!(updated.total, created.total);
                assert_eq!(updated.items, created.items);

                let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.status, "preparing");
                assert_eq!(fetched.items, created.items);
            }

            #[tokio::test]
            async fn test_update_status_nonexistent() {
                let repo = $factory;
                assert!(repo.update_status(987_654, "ready").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_update_status_last_writer_wins() {
                let repo = $factory;
                let created = repo.create(draft_order("Ada", pizza_and_cola_items())).await.unwrap();

                repo.update_status(created.id, "ready").await.unwrap();
                repo.update_status(created.id, "out for delivery").await.unwrap();

                let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.status, "out for delivery");
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_concurrent_creates() {
                let repo = $factory;

                let handles: Vec<_> = (0..10)
                    .map(|i| {
                        let repo = repo.clone();
                        tokio::spawn(async move {
                            repo.create(draft_order(&format!("Parallel {}", i), pizza_and_cola_items()))
                                .await
                        })
                    })
                    .collect();

                let results = tokio::time::timeout(
                    std::time::Duration::from_secs(30),
                    futures::future::join_all(handles),
                )
                .await
                .expect("Concurrent creates timed out after 30s");

                let ids: HashSet<i64> = results
                    .into_iter()
                    .map(|r| r.unwrap().unwrap().id)
                    .collect();
                assert_eq!(ids.len(), 10, "Every concurrent create needs its own id");

                let all = repo.list_all().await.unwrap();
                assert_count(&all, 10);
                for order in &all {
                    assert_count(&order.items, 2);
                    assert_eq!(order.total, dec!(28.97));
                }
            }
        }
    };
}
