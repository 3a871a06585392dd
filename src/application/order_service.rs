use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::config::OrderPolicy;
use crate::domain::collection::OrderCollection;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus, OrderUpdate, Statistics};
use crate::domain::ports::OrderStore;
use crate::domain::user::{Role, Session};

use super::pager::{total_pages, OrderPage, Pager};

const GUEST_AUTHOR: &str = "Гость";
const DEFAULT_PAYMENT_METHOD: &str = "наличные";
const DEFAULT_PREPAYMENT_PERCENT: u8 = 30;

/// Raw input of the new-order form.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    pub furniture_type: String,
    pub custom_description: Option<String>,
    pub wood_type: Option<String>,
    pub hardware_type: Option<String>,
    pub width_cm: Option<u32>,
    pub height_cm: Option<u32>,
    pub depth_cm: Option<u32>,
    pub quantity: Option<u32>,
    pub install_cost: Option<BigDecimal>,
    pub payment_method: Option<String>,
    pub prepayment_percent: Option<u8>,
    pub client_name: Option<String>,
    pub client_address: Option<String>,
    pub client_phone: Option<String>,
}

/// What a customer sees when checking on an order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub id: String,
    pub status: OrderStatus,
    pub cost: BigDecimal,
    pub prepayment_percent: u8,
    pub material: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

/// Order workflow on top of an `OrderCollection`. Every successful mutation
/// writes the full collection back to the store before returning; if that
/// write fails the in-memory collection is restored to its prior state and
/// the storage error is returned.
pub struct OrderService<S> {
    store: S,
    collection: OrderCollection,
    policy: OrderPolicy,
}

impl<S: OrderStore> OrderService<S> {
    /// Loads the stored orders, falling back to `seed` (and saving it) when
    /// the store has none.
    pub fn bootstrap(store: S, policy: OrderPolicy, seed: Vec<Order>) -> Result<Self, DomainError> {
        let stored = store.load()?;
        let seeded = stored.is_empty();
        let records = if seeded { seed } else { stored };

        let (collection, rejected) = OrderCollection::from_records(records);
        for order in &rejected {
            log::warn!("ignoring invalid or duplicate order '{}'", order.id);
        }

        let service = Self {
            store,
            collection,
            policy,
        };
        if seeded {
            log::info!("storage empty, seeding {} orders", service.collection.len());
            service.persist()?;
        } else {
            log::info!("loaded {} orders", service.collection.len());
        }
        Ok(service)
    }

    pub fn collection(&self) -> &OrderCollection {
        &self.collection
    }

    pub fn policy(&self) -> &OrderPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pager(&self) -> Pager {
        Pager::new(self.policy.page_size)
    }

    fn persist(&self) -> Result<(), DomainError> {
        self.store.save(self.collection.orders()).map_err(|e| {
            log::error!("failed to save orders: {}", e);
            e
        })
    }

    /// Persists the mutated collection, or puts `before` back if the store
    /// refuses the write.
    fn commit(&mut self, before: OrderCollection) -> Result<(), DomainError> {
        if let Err(e) = self.persist() {
            log::warn!("rolling back {} in-memory orders", self.collection.len());
            self.collection = before;
            return Err(e);
        }
        Ok(())
    }

    pub fn place_order(
        &mut self,
        session: Option<&Session>,
        form: OrderForm,
    ) -> Result<Order, DomainError> {
        self.place_order_at(session, form, Utc::now())
    }

    pub fn place_order_at(
        &mut self,
        session: Option<&Session>,
        form: OrderForm,
        now: DateTime<Utc>,
    ) -> Result<Order, DomainError> {
        let author = match session {
            Some(session) => session.user().name.clone(),
            None if self.policy.allow_guest_orders => non_blank(&form.client_name)
                .unwrap_or(GUEST_AUTHOR)
                .to_string(),
            None => return Err(DomainError::Unauthenticated),
        };

        if self.policy.require_client_contact {
            let contact = [
                ("client name", &form.client_name),
                ("client address", &form.client_address),
                ("client phone", &form.client_phone),
            ];
            if let Some((field, _)) = contact.iter().find(|(_, v)| non_blank(v).is_none()) {
                return Err(DomainError::InvalidInput(format!("{} is required", field)));
            }
        }

        let order = self.build_order(author, form, now);
        let before = self.collection.clone();
        if !self.collection.add_order(order.clone()) {
            return Err(DomainError::Rejected(format!(
                "order '{}' failed validation",
                order.id
            )));
        }
        self.commit(before)?;

        log::info!("order '{}' placed by '{}'", order.id, order.author);
        Ok(order)
    }

    fn next_order_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("ORD-{}", millis);
            if !self.collection.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }

    fn build_order(&self, author: String, form: OrderForm, now: DateTime<Utc>) -> Order {
        let install_cost = form.install_cost.unwrap_or_else(|| BigDecimal::from(0));
        let material = [&form.wood_type, &form.hardware_type]
            .into_iter()
            .filter_map(|part| non_blank(part))
            .collect::<Vec<_>>()
            .join(", ");
        let description = non_blank(&form.custom_description)
            .map(str::to_string)
            .unwrap_or_else(|| form.furniture_type.clone());

        Order {
            id: self.next_order_id(now),
            description,
            author,
            created_at: now,
            status: OrderStatus::Queued,
            cost: &install_cost + &self.policy.base_cost,
            install_cost,
            material,
            furniture_type: form.furniture_type,
            size: format!(
                "{}x{}x{}см",
                form.width_cm.unwrap_or(0),
                form.height_cm.unwrap_or(0),
                form.depth_cm.unwrap_or(0)
            ),
            quantity: form.quantity.unwrap_or(1),
            client_name: form.client_name.unwrap_or_default(),
            client_address: form.client_address.unwrap_or_default(),
            client_phone: form.client_phone.unwrap_or_default(),
            payment_method: form
                .payment_method
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            prepayment_percent: form.prepayment_percent.unwrap_or(DEFAULT_PREPAYMENT_PERCENT),
            photo_link: String::new(),
        }
    }

    pub fn find_order(&self, id: &str) -> Result<Order, DomainError> {
        self.collection.get_order(id).ok_or(DomainError::NotFound)
    }

    pub fn check_status(&self, id: &str) -> Result<StatusReport, DomainError> {
        let order = self.find_order(id)?;
        Ok(StatusReport {
            completed: order.is_completed(),
            id: order.id,
            status: order.status,
            cost: order.cost,
            prepayment_percent: order.prepayment_percent,
            material: order.material,
            created_at: order.created_at,
        })
    }

    /// Applies a general edit. Admin and designer only.
    pub fn edit_order(
        &mut self,
        session: &Session,
        id: &str,
        updates: OrderUpdate,
    ) -> Result<Order, DomainError> {
        require_role(session, &[Role::Admin, Role::Designer], "edit orders")?;
        self.apply_update(id, updates)
    }

    /// Any value of `OrderStatus` is accepted, in any order.
    pub fn update_status(
        &mut self,
        session: &Session,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, DomainError> {
        self.edit_order(session, id, OrderUpdate::status(status))
    }

    pub fn complete_order(&mut self, id: &str) -> Result<Order, DomainError> {
        self.apply_update(id, OrderUpdate::status(OrderStatus::Completed))
    }

    fn apply_update(&mut self, id: &str, updates: OrderUpdate) -> Result<Order, DomainError> {
        if !self.collection.contains(id) {
            return Err(DomainError::NotFound);
        }
        let before = self.collection.clone();
        if !self.collection.edit_order(id, updates) {
            return Err(DomainError::Rejected(format!(
                "update of order '{}' failed validation",
                id
            )));
        }
        self.commit(before)?;

        let order = self.find_order(id)?;
        log::info!("order '{}' updated, status {}", order.id, order.status);
        Ok(order)
    }

    pub fn delete_order(&mut self, session: &Session, id: &str) -> Result<(), DomainError> {
        require_role(session, &[Role::Admin], "delete orders")?;
        let before = self.collection.clone();
        if !self.collection.remove_order(id) {
            return Err(DomainError::NotFound);
        }
        self.commit(before)?;
        log::info!("order '{}' deleted by '{}'", id, session.user().username);
        Ok(())
    }

    /// Bulk-adds orders and returns the ones that were not accepted.
    pub fn import_orders(
        &mut self,
        session: &Session,
        orders: Vec<Order>,
    ) -> Result<Vec<Order>, DomainError> {
        require_role(session, &[Role::Admin], "import orders")?;
        let offered = orders.len();
        let before = self.collection.clone();
        let rejected = self.collection.add_all(orders);
        if rejected.len() < offered {
            self.commit(before)?;
        }
        log::info!(
            "imported {} of {} orders",
            offered - rejected.len(),
            offered
        );
        Ok(rejected)
    }

    pub fn clear_orders(&mut self, session: &Session) -> Result<(), DomainError> {
        require_role(session, &[Role::Admin], "clear orders")?;
        let before = self.collection.clone();
        self.collection.clear();
        self.commit(before)?;
        log::info!("all orders cleared by '{}'", session.user().username);
        Ok(())
    }

    pub fn list_page(&self, pager: &Pager) -> Result<OrderPage, DomainError> {
        let filter = pager.filter();
        let total = self.collection.count(filter)?;
        let items = self
            .collection
            .get_orders(pager.skip(), pager.page_size(), filter)?;

        Ok(OrderPage {
            items,
            page: pager.page(),
            total,
            total_pages: total_pages(total, pager.page_size()),
        })
    }

    /// Moves to the next page only if it has anything on it.
    pub fn next_page(&self, pager: &mut Pager) -> Result<bool, DomainError> {
        let next_skip = pager.skip().saturating_add(pager.page_size());
        if next_skip >= self.collection.count(pager.filter())? {
            return Ok(false);
        }
        pager.advance();
        Ok(true)
    }

    pub fn statistics(&self) -> Statistics {
        self.collection.get_statistics()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn require_role(session: &Session, roles: &[Role], action: &str) -> Result<(), DomainError> {
    if session.has_any_role(roles) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "role '{}' may not {}",
            session.user().role,
            action
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::filter::OrderFilter;
    use crate::domain::order::fixtures::{at, order};
    use crate::domain::user::User;

    /// Records every snapshot handed to `save`.
    #[derive(Clone, Default)]
    struct RecordingStore {
        initial: Vec<Order>,
        saves: Arc<Mutex<Vec<Vec<Order>>>>,
        broken: Arc<AtomicBool>,
    }

    impl RecordingStore {
        fn with(initial: Vec<Order>) -> Self {
            Self {
                initial,
                ..Self::default()
            }
        }

        fn save_count(&self) -> usize {
            self.saves.lock().unwrap().len()
        }

        fn last_save(&self) -> Vec<Order> {
            self.saves.lock().unwrap().last().cloned().unwrap_or_default()
        }

        fn break_writes(&self) {
            self.broken.store(true, Ordering::SeqCst);
        }
    }

    impl OrderStore for RecordingStore {
        fn load(&self) -> Result<Vec<Order>, DomainError> {
            Ok(self.initial.clone())
        }

        fn save(&self, orders: &[Order]) -> Result<(), DomainError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(DomainError::Storage("disk full".to_string()));
            }
            self.saves.lock().unwrap().push(orders.to_vec());
            Ok(())
        }
    }

    fn session(role: Role) -> Session {
        Session::new(User {
            id: format!("{}001", role),
            username: role.to_string(),
            role,
            name: format!("Пользователь {}", role),
            email: String::new(),
        })
    }

    fn service(initial: Vec<Order>) -> (RecordingStore, OrderService<RecordingStore>) {
        let store = RecordingStore::with(initial);
        let service = OrderService::bootstrap(store.clone(), OrderPolicy::default(), vec![])
            .expect("bootstrap");
        (store, service)
    }

    fn stocked() -> (RecordingStore, OrderService<RecordingStore>) {
        service(vec![
            order("ORD-2", "A", OrderStatus::Queued, 500, 8),
            order("ORD-1", "B", OrderStatus::InProgress, 1500, 12),
        ])
    }

    fn wardrobe_form() -> OrderForm {
        OrderForm {
            furniture_type: "Шкаф".to_string(),
            wood_type: Some("дуб".to_string()),
            hardware_type: Some("латунь".to_string()),
            width_cm: Some(120),
            height_cm: Some(200),
            depth_cm: Some(60),
            install_cost: Some(BigDecimal::from(150)),
            client_name: Some("Ирина".to_string()),
            ..OrderForm::default()
        }
    }

    #[test]
    fn bootstrap_seeds_and_saves_when_store_is_empty() {
        let store = RecordingStore::default();
        let service = OrderService::bootstrap(
            store.clone(),
            OrderPolicy::default(),
            vec![order("ORD-1", "A", OrderStatus::Queued, 1, 1)],
        )
        .unwrap();

        assert_eq!(service.collection().len(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn bootstrap_keeps_stored_orders_without_saving() {
        let (store, service) = stocked();
        assert_eq!(service.collection().len(), 2);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn failed_save_leaves_collection_untouched() {
        let (store, mut service) = stocked();
        store.break_writes();
        let admin = session(Role::Admin);
        let original = service.collection().orders().to_vec();

        assert!(matches!(
            service.place_order_at(Some(&admin), wardrobe_form(), at(15)),
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(
            service.update_status(&admin, "ORD-1", OrderStatus::Completed),
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(
            service.delete_order(&admin, "ORD-2"),
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(
            service.import_orders(&admin, vec![order("ORD-9", "C", OrderStatus::Queued, 1, 9)]),
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(
            service.clear_orders(&admin),
            Err(DomainError::Storage(_))
        ));

        assert_eq!(service.collection().orders(), original.as_slice());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn place_order_prices_and_persists() {
        let (store, mut service) = stocked();
        let placed = service
            .place_order_at(Some(&session(Role::Client)), wardrobe_form(), at(15))
            .unwrap();

        assert_eq!(placed.id, format!("ORD-{}", at(15).timestamp_millis()));
        assert_eq!(placed.author, "Пользователь client");
        assert_eq!(placed.description, "Шкаф");
        assert_eq!(placed.material, "дуб, латунь");
        assert_eq!(placed.size, "120x200x60см");
        assert_eq!(placed.cost, BigDecimal::from(650));
        assert_eq!(placed.status, OrderStatus::Queued);
        assert_eq!(placed.payment_method, "наличные");
        assert_eq!(placed.prepayment_percent, 30);
        assert_eq!(placed.quantity, 1);

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.last_save().len(), 3);
    }

    #[test]
    fn same_millisecond_orders_get_distinct_ids() {
        let (_, mut service) = stocked();
        let client = session(Role::Client);
        let a = service
            .place_order_at(Some(&client), wardrobe_form(), at(15))
            .unwrap();
        let b = service
            .place_order_at(Some(&client), wardrobe_form(), at(15))
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn anonymous_orders_follow_policy() {
        let (_, mut service) = stocked();
        assert!(matches!(
            service.place_order(None, wardrobe_form()),
            Err(DomainError::Unauthenticated)
        ));

        service.policy.allow_guest_orders = true;
        let placed = service.place_order(None, wardrobe_form()).unwrap();
        assert_eq!(placed.author, "Ирина");

        let anonymous = OrderForm {
            client_name: None,
            ..wardrobe_form()
        };
        assert_eq!(service.place_order(None, anonymous).unwrap().author, "Гость");
    }

    #[test]
    fn client_contact_can_be_required() {
        let (store, mut service) = stocked();
        service.policy.require_client_contact = true;
        let err = service
            .place_order(Some(&session(Role::Client)), wardrobe_form())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn invalid_form_is_rejected_without_saving() {
        let (store, mut service) = stocked();
        let form = OrderForm {
            custom_description: Some("x".repeat(201)),
            ..wardrobe_form()
        };
        assert!(matches!(
            service.place_order(Some(&session(Role::Client)), form),
            Err(DomainError::Rejected(_))
        ));
        assert_eq!(store.save_count(), 0);
        assert_eq!(service.collection().len(), 2);
    }

    #[test]
    fn status_updates_need_staff() {
        let (store, mut service) = stocked();
        assert!(matches!(
            service.update_status(&session(Role::Client), "ORD-1", OrderStatus::Completed),
            Err(DomainError::Forbidden(_))
        ));

        let updated = service
            .update_status(&session(Role::Designer), "ORD-1", OrderStatus::Completed)
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Completed);

        let reopened = service
            .update_status(&session(Role::Admin), "ORD-1", OrderStatus::Queued)
            .unwrap();
        assert_eq!(reopened.status, OrderStatus::Queued);
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn edit_keeps_identity_fields() {
        let (_, mut service) = stocked();
        let edited = service
            .edit_order(
                &session(Role::Admin),
                "ORD-2",
                OrderUpdate {
                    author: Some("Z".to_string()),
                    cost: Some(BigDecimal::from(900)),
                    ..OrderUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(edited.author, "A");
        assert_eq!(edited.cost, BigDecimal::from(900));
    }

    #[test]
    fn complete_order_reports_missing_ids() {
        let (_, mut service) = stocked();
        assert!(matches!(
            service.complete_order("ORD-404"),
            Err(DomainError::NotFound)
        ));
        assert!(service.complete_order("ORD-1").unwrap().is_completed());
        assert!(service.check_status("ORD-1").unwrap().completed);
    }

    #[test]
    fn delete_is_admin_only() {
        let (store, mut service) = stocked();
        assert!(matches!(
            service.delete_order(&session(Role::Designer), "ORD-1"),
            Err(DomainError::Forbidden(_))
        ));
        service.delete_order(&session(Role::Admin), "ORD-1").unwrap();
        assert!(matches!(
            service.delete_order(&session(Role::Admin), "ORD-1"),
            Err(DomainError::NotFound)
        ));
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.last_save().len(), 1);
    }

    #[test]
    fn import_returns_rejected_orders() {
        let (store, mut service) = stocked();
        let rejected = service
            .import_orders(
                &session(Role::Admin),
                vec![
                    order("ORD-3", "C", OrderStatus::Queued, 1, 1),
                    order("ORD-1", "C", OrderStatus::Queued, 1, 1),
                ],
            )
            .unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].id, "ORD-1");
        assert_eq!(store.last_save().len(), 3);
    }

    #[test]
    fn clear_saves_empty_set() {
        let (store, mut service) = stocked();
        service.clear_orders(&session(Role::Admin)).unwrap();
        assert!(service.collection().is_empty());
        assert!(store.last_save().is_empty());
    }

    #[test]
    fn paging_walks_filtered_results() {
        let records = (0..25)
            .map(|i| order(&format!("ORD-{:02}", i), "A", OrderStatus::Queued, 100, i % 24))
            .collect();
        let (_, service) = service(records);
        let mut pager = service.pager();

        let first = service.list_page(&pager).unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 25);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_prev());
        assert!(first.has_next());

        assert!(service.next_page(&mut pager).unwrap());
        assert!(service.next_page(&mut pager).unwrap());
        let last = service.list_page(&pager).unwrap();
        assert_eq!(last.items.len(), 5);
        assert!(!last.has_next());
        assert!(!service.next_page(&mut pager).unwrap());
        assert_eq!(pager.page(), 2);

        pager.apply_filter(OrderFilter::new().with_status(OrderStatus::Completed));
        let empty = service.list_page(&pager).unwrap();
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 1);
        assert!(!service.next_page(&mut pager).unwrap());
    }

    #[test]
    fn statistics_cover_whole_collection() {
        let (_, service) = stocked();
        let stats = service.statistics();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_cost, BigDecimal::from(2000));
    }
}
