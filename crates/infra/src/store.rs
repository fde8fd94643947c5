//! Inventory store: owns parts, movements and categories and is the only
//! mutation surface over them.
//!
//! Every mutating operation validates first, applies its change to memory as a
//! single transition, then writes the touched collections through the
//! persistence gateway. The in-memory state is authoritative for reads within
//! the process; a failed write does not undo the mutation. It is logged and
//! queued as a [`PersistenceWarning`] for the caller to drain.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use stockroom_core::{
    CategoryId, Clock, DomainError, DomainResult, MovementId, PartId, SystemClock,
    entity::{find_by_id, position_by_id},
};
use stockroom_inventory::{
    Category, DashboardSummary, Movement, MovementDraft, MovementFilter, MovementTotals,
    MovementType, Part, PartDraft, PartFilter, PartPatch, Report, default_categories, ledger,
    low_stock_report, stock_report, summarize,
};

use crate::config::{LedgerPolicy, NegativeStockPolicy};
use crate::persistence::{
    CATEGORIES_KEY, KeyValueStore, MOVEMENTS_KEY, PARTS_KEY, PersistenceError, load_collection,
    save_collection,
};

/// A write that failed after the in-memory mutation had already been applied.
#[derive(Debug)]
pub struct PersistenceWarning {
    pub key: &'static str,
    pub error: PersistenceError,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Collection {
    Parts,
    Movements,
    Categories,
}

impl Collection {
    fn key(self) -> &'static str {
        match self {
            Collection::Parts => PARTS_KEY,
            Collection::Movements => MOVEMENTS_KEY,
            Collection::Categories => CATEGORIES_KEY,
        }
    }
}

#[derive(Debug)]
pub struct InventoryStore<S, C = SystemClock>
where
    S: KeyValueStore,
    C: Clock,
{
    gateway: S,
    clock: C,
    policy: LedgerPolicy,
    parts: Vec<Part>,
    movements: Vec<Movement>,
    categories: Vec<Category>,
    warnings: Vec<PersistenceWarning>,
}

impl<S> InventoryStore<S, SystemClock>
where
    S: KeyValueStore,
{
    /// Hydrate from `gateway` using wall-clock time.
    pub fn open(gateway: S, policy: LedgerPolicy) -> Result<Self, PersistenceError> {
        Self::open_with_clock(gateway, policy, SystemClock)
    }
}

impl<S, C> InventoryStore<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    /// Hydrate from `gateway`.
    ///
    /// Missing slots default to empty collections (seed categories for the
    /// category slot). A corrupt slot fails the open instead of being replaced.
    pub fn open_with_clock(gateway: S, policy: LedgerPolicy, clock: C) -> Result<Self, PersistenceError> {
        let parts: Vec<Part> = load_collection(&gateway, PARTS_KEY)?.unwrap_or_default();
        let movements: Vec<Movement> = load_collection(&gateway, MOVEMENTS_KEY)?.unwrap_or_default();
        let categories: Vec<Category> =
            load_collection(&gateway, CATEGORIES_KEY)?.unwrap_or_else(default_categories);

        info!(
            parts = parts.len(),
            movements = movements.len(),
            categories = categories.len(),
            "inventory store hydrated"
        );

        let store = Self {
            gateway,
            clock,
            policy,
            parts,
            movements,
            categories,
            warnings: Vec::new(),
        };

        for (part_id, cached, expected) in store.verify_stock_ledger() {
            warn!(%part_id, cached, %expected, "persisted stock disagrees with movement ledger");
        }

        Ok(store)
    }

    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    // ---- parts ----

    /// Create a part with zero stock.
    pub fn add_part(&mut self, draft: PartDraft) -> DomainResult<Part> {
        let part = Part::create(PartId::new(), draft, self.clock.now())?;
        self.parts.push(part.clone());
        debug!(part_id = %part.id_typed(), code = part.code(), "part added");

        self.persist(Collection::Parts);
        Ok(part)
    }

    /// Merge `patch` into a part; `updated_at` always moves.
    pub fn update_part(&mut self, id: PartId, patch: PartPatch) -> DomainResult<Part> {
        let idx = position_by_id(&self.parts, &id).ok_or_else(|| DomainError::not_found("part", id))?;
        let now = self.clock.now();
        self.parts[idx].apply_patch(patch, now)?;
        debug!(part_id = %id, "part updated");

        self.persist(Collection::Parts);
        Ok(self.parts[idx].clone())
    }

    /// Remove a part and every movement recorded against it.
    pub fn delete_part(&mut self, id: PartId) -> DomainResult<Part> {
        let idx = position_by_id(&self.parts, &id).ok_or_else(|| DomainError::not_found("part", id))?;

        let before = self.movements.len();
        self.movements.retain(|m| m.part_id() != id);
        let cascaded = before - self.movements.len();
        let removed = self.parts.remove(idx);
        debug!(part_id = %id, cascaded, "part deleted");

        if cascaded > 0 {
            self.persist(Collection::Movements);
        }
        self.persist(Collection::Parts);
        Ok(removed)
    }

    pub fn get_part_by_id(&self, id: PartId) -> Option<&Part> {
        find_by_id(&self.parts, &id)
    }

    /// Parts matching `filter`, most recently updated first.
    pub fn search_parts(&self, filter: &PartFilter) -> Vec<Part> {
        filter.apply(&self.parts)
    }

    // ---- movements ----

    /// Record a movement and apply its signed quantity to the owning part.
    ///
    /// Validation (part exists, quantity positive, resulting stock fits in an
    /// `i64`, negative-stock policy) happens before anything changes; the
    /// ledger append and the stock update then land together.
    pub fn add_movement(&mut self, draft: MovementDraft) -> DomainResult<Movement> {
        let idx = position_by_id(&self.parts, &draft.part_id)
            .ok_or_else(|| DomainError::not_found("part", draft.part_id))?;
        let movement = Movement::record(MovementId::new(), draft)?;

        let new_stock = self.parts[idx].stock_after(&movement)?;
        if new_stock < 0 && movement.kind() == MovementType::Exit {
            match self.policy.negative_stock {
                NegativeStockPolicy::Reject => {
                    return Err(DomainError::invariant(format!(
                        "exit of {} exceeds current stock {}",
                        movement.quantity(),
                        self.parts[idx].current_stock()
                    )));
                }
                NegativeStockPolicy::Allow => {
                    warn!(
                        part_id = %movement.part_id(),
                        quantity = movement.quantity(),
                        new_stock,
                        "exit drives stock negative"
                    );
                }
            }
        }

        let now = self.clock.now();
        self.parts[idx].apply_movement(&movement, now)?;
        self.movements.push(movement.clone());
        debug!(
            movement_id = %movement.id_typed(),
            part_id = %movement.part_id(),
            delta = movement.signed_delta(),
            new_stock,
            "movement recorded"
        );

        self.persist(Collection::Movements);
        self.persist(Collection::Parts);
        Ok(movement)
    }

    /// Movements of one part, most recent first. Empty for unknown parts.
    pub fn get_part_movements(&self, part_id: PartId) -> Vec<Movement> {
        ledger::movements_for_part(&self.movements, part_id)
    }

    /// Movements matching `filter`, most recent first.
    pub fn query_movements(&self, filter: &MovementFilter) -> Vec<Movement> {
        filter.apply(&self.movements)
    }

    pub fn movement_totals(&self) -> MovementTotals {
        MovementTotals::count(&self.movements)
    }

    /// Parts whose cached stock disagrees with the ledger, as
    /// `(part, cached, ledger)`. Empty unless persisted state was tampered
    /// with or torn by a crash between writes.
    pub fn verify_stock_ledger(&self) -> Vec<(PartId, i64, i128)> {
        ledger::stock_mismatches(&self.parts, &self.movements)
    }

    // ---- categories ----

    pub fn add_category(&mut self, name: &str) -> DomainResult<Category> {
        let category = Category::new(CategoryId::new(), name)?;
        self.categories.push(category.clone());
        debug!(category_id = %category.id_typed(), name = category.name(), "category added");

        self.persist(Collection::Categories);
        Ok(category)
    }

    /// Remove a category. Parts keep whatever name they copied.
    pub fn delete_category(&mut self, id: CategoryId) -> DomainResult<Category> {
        let idx = position_by_id(&self.categories, &id)
            .ok_or_else(|| DomainError::not_found("category", id))?;
        let removed = self.categories.remove(idx);
        debug!(category_id = %id, "category deleted");

        self.persist(Collection::Categories);
        Ok(removed)
    }

    // ---- derived views ----

    pub fn get_dashboard_summary(&self) -> DashboardSummary {
        summarize(&self.parts, &self.movements, self.policy.recent_movements)
    }

    pub fn low_stock_report(&self) -> Report {
        low_stock_report(&self.parts)
    }

    pub fn stock_report(&self) -> Report {
        stock_report(&self.parts)
    }

    // ---- persistence ----

    /// Drain warnings for writes that failed since the last call.
    pub fn take_persistence_warnings(&mut self) -> Vec<PersistenceWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn persist(&mut self, collection: Collection) {
        let key = collection.key();
        let result = match collection {
            Collection::Parts => save_collection(&self.gateway, key, &self.parts),
            Collection::Movements => save_collection(&self.gateway, key, &self.movements),
            Collection::Categories => save_collection(&self.gateway, key, &self.categories),
        };

        if let Err(error) = result {
            warn!(key, %error, "failed to persist collection; in-memory state kept");
            self.warnings.push(PersistenceWarning {
                key,
                error,
                at: self.clock.now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{Duration, TimeZone};
    use stockroom_core::ManualClock;
    use stockroom_inventory::StockStatus;

    use crate::persistence::InMemoryKeyValueStore;

    /// Gateway that can be told to refuse writes.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: InMemoryKeyValueStore,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PersistenceError::Unavailable("disk full".to_string()));
            }
            self.inner.save(key, value)
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn store() -> (InventoryStore<Arc<InMemoryKeyValueStore>, ManualClock>, Arc<InMemoryKeyValueStore>, ManualClock) {
        let gateway = Arc::new(InMemoryKeyValueStore::new());
        let clock = ManualClock::new(t0());
        let store = InventoryStore::open_with_clock(gateway.clone(), LedgerPolicy::default(), clock.clone()).unwrap();
        (store, gateway, clock)
    }

    fn widget() -> PartDraft {
        PartDraft {
            code: "A1".to_string(),
            name: "Widget".to_string(),
            description: String::new(),
            category: "Mechanical".to_string(),
            unit: "un".to_string(),
            minimum_stock: 5,
        }
    }

    fn movement(part_id: PartId, kind: MovementType, quantity: i64, date: DateTime<Utc>) -> MovementDraft {
        MovementDraft {
            part_id,
            kind,
            quantity,
            date,
            notes: String::new(),
            created_by: "tester".to_string(),
        }
    }

    #[test]
    fn fresh_store_has_seed_categories_and_empty_dashboard() {
        let (store, _, _) = store();
        assert_eq!(store.categories().len(), 4);

        let summary = store.get_dashboard_summary();
        assert_eq!(summary.total_parts, 0);
        assert_eq!(summary.low_stock_count, 0);
        assert!(summary.recent_movements.is_empty());
        assert!(summary.low_stock_parts.is_empty());
    }

    #[test]
    fn entry_then_exit_scenario() {
        let (mut store, _, _) = store();
        let part = store.add_part(widget()).unwrap();
        assert_eq!(part.current_stock(), 0);

        store.add_movement(movement(part.id_typed(), MovementType::Entry, 10, t0())).unwrap();
        let p = store.get_part_by_id(part.id_typed()).unwrap();
        assert_eq!(p.current_stock(), 10);
        assert_eq!(p.classification().status, StockStatus::Healthy);

        store.add_movement(movement(part.id_typed(), MovementType::Exit, 8, t0())).unwrap();
        let p = store.get_part_by_id(part.id_typed()).unwrap();
        assert_eq!(p.current_stock(), 2);
        assert_eq!(p.classification().status, StockStatus::Low);

        let summary = store.get_dashboard_summary();
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.recent_movements.len(), 2);
    }

    #[test]
    fn non_positive_quantity_is_rejected_without_side_effects() {
        let (mut store, _, _) = store();
        let part = store.add_part(widget()).unwrap();
        store.add_movement(movement(part.id_typed(), MovementType::Entry, 3, t0())).unwrap();

        for q in [0, -1] {
            let err = store
                .add_movement(movement(part.id_typed(), MovementType::Entry, q, t0()))
                .unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().current_stock(), 3);
        assert_eq!(store.movements().len(), 1);
    }

    #[test]
    fn movement_for_unknown_part_is_not_found() {
        let (mut store, _, _) = store();
        let err = store
            .add_movement(movement(PartId::new(), MovementType::Entry, 1, t0()))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.movements().is_empty());
    }

    #[test]
    fn overflowing_movement_is_rejected_without_side_effects() {
        let (mut store, gateway, _) = store();
        let part = store.add_part(widget()).unwrap();
        store.add_movement(movement(part.id_typed(), MovementType::Entry, i64::MAX, t0())).unwrap();
        let saved = gateway.load(MOVEMENTS_KEY).unwrap();

        let err = store
            .add_movement(movement(part.id_typed(), MovementType::Entry, 1, t0()))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().current_stock(), i64::MAX);
        assert_eq!(store.movements().len(), 1);
        assert_eq!(gateway.load(MOVEMENTS_KEY).unwrap(), saved);
        assert!(store.verify_stock_ledger().is_empty());
    }

    #[test]
    fn underflowing_exit_is_rejected_without_side_effects() {
        let (mut store, _, _) = store();
        let part = store.add_part(widget()).unwrap();
        store.add_movement(movement(part.id_typed(), MovementType::Exit, 1, t0())).unwrap();

        let err = store
            .add_movement(movement(part.id_typed(), MovementType::Exit, i64::MAX, t0()))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().current_stock(), -1);
        assert_eq!(store.movements().len(), 1);
    }

    #[test]
    fn exits_may_drive_stock_negative_by_default() {
        let (mut store, _, _) = store();
        let part = store.add_part(widget()).unwrap();
        store.add_movement(movement(part.id_typed(), MovementType::Exit, 2, t0())).unwrap();
        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().current_stock(), -2);
        assert!(store.verify_stock_ledger().is_empty());
    }

    #[test]
    fn reject_policy_refuses_exit_beyond_stock() {
        let gateway = InMemoryKeyValueStore::new();
        let policy = LedgerPolicy {
            negative_stock: NegativeStockPolicy::Reject,
            ..LedgerPolicy::default()
        };
        let mut store = InventoryStore::open(gateway, policy).unwrap();
        let part = store.add_part(widget()).unwrap();
        store.add_movement(movement(part.id_typed(), MovementType::Entry, 3, t0())).unwrap();

        let err = store
            .add_movement(movement(part.id_typed(), MovementType::Exit, 4, t0()))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().current_stock(), 3);
        assert_eq!(store.movements().len(), 1);

        // Exactly draining stock is fine.
        store.add_movement(movement(part.id_typed(), MovementType::Exit, 3, t0())).unwrap();
        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().current_stock(), 0);
    }

    #[test]
    fn movement_bumps_part_updated_at() {
        let (mut store, _, clock) = store();
        let part = store.add_part(widget()).unwrap();

        clock.advance(Duration::hours(1));
        store.add_movement(movement(part.id_typed(), MovementType::Entry, 1, t0())).unwrap();

        let p = store.get_part_by_id(part.id_typed()).unwrap();
        assert_eq!(p.created_at(), t0());
        assert_eq!(p.updated_at(), t0() + Duration::hours(1));
    }

    #[test]
    fn update_part_merges_and_refreshes_timestamp() {
        let (mut store, _, clock) = store();
        let part = store.add_part(widget()).unwrap();

        clock.advance(Duration::minutes(10));
        let updated = store
            .update_part(
                part.id_typed(),
                PartPatch {
                    name: Some("Big widget".to_string()),
                    minimum_stock: Some(12),
                    ..PartPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name(), "Big widget");
        assert_eq!(updated.code(), "A1");
        assert_eq!(updated.minimum_stock(), 12);
        assert_eq!(updated.updated_at(), t0() + Duration::minutes(10));

        clock.advance(Duration::minutes(10));
        let same = store.update_part(part.id_typed(), PartPatch::default()).unwrap();
        assert_eq!(same.updated_at(), t0() + Duration::minutes(20));
    }

    #[test]
    fn update_and_delete_unknown_part_are_not_found() {
        let (mut store, _, _) = store();
        assert!(store.update_part(PartId::new(), PartPatch::default()).unwrap_err().is_not_found());
        assert!(store.delete_part(PartId::new()).unwrap_err().is_not_found());
        assert!(store.get_part_by_id(PartId::new()).is_none());
    }

    #[test]
    fn add_part_rejects_blank_fields() {
        let (mut store, gateway, _) = store();
        let mut draft = widget();
        draft.name = "  ".to_string();
        assert!(store.add_part(draft).unwrap_err().is_validation());
        assert!(store.parts().is_empty());
        assert!(gateway.load(PARTS_KEY).unwrap().is_none());
    }

    #[test]
    fn delete_part_cascades_to_its_movements_only() {
        let (mut store, _, _) = store();
        let a = store.add_part(widget()).unwrap();
        let mut other = widget();
        other.code = "B2".to_string();
        let b = store.add_part(other).unwrap();

        store.add_movement(movement(a.id_typed(), MovementType::Entry, 5, t0())).unwrap();
        store.add_movement(movement(a.id_typed(), MovementType::Exit, 1, t0())).unwrap();
        store.add_movement(movement(b.id_typed(), MovementType::Entry, 7, t0())).unwrap();

        store.delete_part(a.id_typed()).unwrap();

        assert!(store.get_part_movements(a.id_typed()).is_empty());
        assert!(store.movements().iter().all(|m| m.part_id() != a.id_typed()));
        assert_eq!(store.get_part_movements(b.id_typed()).len(), 1);
        assert_eq!(store.get_part_by_id(b.id_typed()).unwrap().current_stock(), 7);
    }

    #[test]
    fn part_movements_are_newest_first() {
        let (mut store, _, _) = store();
        let part = store.add_part(widget()).unwrap();
        for h in [2, 0, 5, 1] {
            store
                .add_movement(movement(part.id_typed(), MovementType::Entry, 1, t0() + Duration::hours(h)))
                .unwrap();
        }
        let dates: Vec<_> = store.get_part_movements(part.id_typed()).iter().map(Movement::date).collect();
        let hours: Vec<_> = dates.iter().map(|d| (*d - t0()).num_hours()).collect();
        assert_eq!(hours, vec![5, 2, 1, 0]);
    }

    #[test]
    fn dashboard_is_idempotent_without_mutation() {
        let (mut store, _, _) = store();
        let part = store.add_part(widget()).unwrap();
        store.add_movement(movement(part.id_typed(), MovementType::Entry, 2, t0())).unwrap();

        assert_eq!(store.get_dashboard_summary(), store.get_dashboard_summary());
    }

    #[test]
    fn categories_do_not_cascade_into_parts() {
        let (mut store, _, _) = store();
        let category = store.add_category("  Pneumatic  ").unwrap();
        assert_eq!(category.name(), "Pneumatic");
        assert!(store.add_category(" ").unwrap_err().is_validation());

        let mut draft = widget();
        draft.category = category.name().to_string();
        let part = store.add_part(draft).unwrap();

        store.delete_category(category.id_typed()).unwrap();
        assert!(store.categories().iter().all(|c| c.id_typed() != category.id_typed()));
        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().category(), "Pneumatic");

        assert!(store.delete_category(category.id_typed()).unwrap_err().is_not_found());
    }

    #[test]
    fn state_survives_reopen() {
        let (mut store, gateway, _) = store();
        let part = store.add_part(widget()).unwrap();
        store.add_movement(movement(part.id_typed(), MovementType::Entry, 9, t0())).unwrap();
        store.add_category("Pneumatic").unwrap();
        drop(store);

        let reopened = InventoryStore::open(gateway.clone(), LedgerPolicy::default()).unwrap();
        assert_eq!(reopened.parts().len(), 1);
        assert_eq!(reopened.movements().len(), 1);
        assert_eq!(reopened.categories().len(), 5);
        assert_eq!(reopened.get_part_by_id(part.id_typed()).unwrap().current_stock(), 9);
        assert!(reopened.verify_stock_ledger().is_empty());
    }

    #[test]
    fn corrupt_slot_fails_open() {
        let gateway = InMemoryKeyValueStore::new();
        gateway.save(MOVEMENTS_KEY, "[{\"oops\":").unwrap();
        let err = InventoryStore::open(gateway, LedgerPolicy::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Deserialize { .. }));
    }

    #[test]
    fn failed_write_keeps_memory_and_reports_warning() {
        let gateway = Arc::new(FlakyStore::default());
        let mut store = InventoryStore::open(gateway.clone(), LedgerPolicy::default()).unwrap();
        let part = store.add_part(widget()).unwrap();
        assert!(store.take_persistence_warnings().is_empty());

        gateway.fail_writes.store(true, Ordering::SeqCst);
        store.add_movement(movement(part.id_typed(), MovementType::Entry, 4, t0())).unwrap();

        assert_eq!(store.get_part_by_id(part.id_typed()).unwrap().current_stock(), 4);
        let warnings = store.take_persistence_warnings();
        let keys: Vec<_> = warnings.iter().map(|w| w.key).collect();
        assert_eq!(keys, vec![MOVEMENTS_KEY, PARTS_KEY]);
        assert!(store.take_persistence_warnings().is_empty());
    }

    #[test]
    fn reports_and_queries_read_current_state() {
        let (mut store, _, _) = store();
        let a = store.add_part(widget()).unwrap();
        let mut healthy = widget();
        healthy.code = "B2".to_string();
        healthy.name = "Bolt".to_string();
        let b = store.add_part(healthy).unwrap();

        store.add_movement(movement(a.id_typed(), MovementType::Entry, 5, t0())).unwrap();
        store.add_movement(movement(b.id_typed(), MovementType::Entry, 50, t0())).unwrap();
        store.add_movement(movement(b.id_typed(), MovementType::Exit, 1, t0())).unwrap();

        let low = store.low_stock_report();
        assert_eq!(low.rows.len(), 1);
        assert_eq!(low.rows[0].code, "A1");
        assert_eq!(store.stock_report().rows.len(), 2);

        assert_eq!(store.movement_totals(), MovementTotals { entries: 2, exits: 1 });
        let exits = store.query_movements(&MovementFilter {
            kind: Some(MovementType::Exit),
            ..MovementFilter::default()
        });
        assert_eq!(exits.len(), 1);

        let found = store.search_parts(&PartFilter {
            search: Some("bolt".to_string()),
            category: None,
        });
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id_typed(), b.id_typed());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            AddPart(i64),
            Entry(usize, i64),
            Exit(usize, i64),
            BadQuantity(usize, i64),
            Delete(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0i64..20).prop_map(Op::AddPart),
                (any::<usize>(), 1i64..50).prop_map(|(i, q)| Op::Entry(i, q)),
                (any::<usize>(), 1i64..50).prop_map(|(i, q)| Op::Exit(i, q)),
                (any::<usize>(), -5i64..=0).prop_map(|(i, q)| Op::BadQuantity(i, q)),
                any::<usize>().prop_map(Op::Delete),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Property: cached stock always equals the ledger sum, quantities
            /// stay positive and no movement outlives its part.
            #[test]
            fn ledger_invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 1..60)) {
                let (mut store, _, _) = store();

                for op in ops {
                    let ids: Vec<PartId> = store.parts().iter().map(Part::id_typed).collect();
                    let pick = |i: usize| if ids.is_empty() { PartId::new() } else { ids[i % ids.len()] };

                    match op {
                        Op::AddPart(minimum) => {
                            let mut draft = widget();
                            draft.minimum_stock = minimum;
                            store.add_part(draft).unwrap();
                        }
                        Op::Entry(i, q) => {
                            let _ = store.add_movement(movement(pick(i), MovementType::Entry, q, t0()));
                        }
                        Op::Exit(i, q) => {
                            let _ = store.add_movement(movement(pick(i), MovementType::Exit, q, t0()));
                        }
                        Op::BadQuantity(i, q) => {
                            let before = store.movements().len();
                            let result = store.add_movement(movement(pick(i), MovementType::Entry, q, t0()));
                            prop_assert!(result.is_err());
                            prop_assert_eq!(store.movements().len(), before);
                        }
                        Op::Delete(i) => {
                            if !ids.is_empty() {
                                let id = pick(i);
                                store.delete_part(id).unwrap();
                                prop_assert!(store.get_part_movements(id).is_empty());
                            }
                        }
                    }

                    prop_assert!(store.verify_stock_ledger().is_empty());
                    prop_assert!(store.movements().iter().all(|m| m.quantity() > 0));
                    prop_assert!(store
                        .movements()
                        .iter()
                        .all(|m| store.get_part_by_id(m.part_id()).is_some()));
                }
            }
        }
    }
}
