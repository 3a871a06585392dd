//! End-to-end test: orders placed and edited through the services survive a
//! restart on the file-backed store.

use bigdecimal::BigDecimal;
use furniture_orders::application::order_service::OrderForm;
use furniture_orders::domain::errors::DomainError;
use furniture_orders::domain::filter::OrderFilter;
use furniture_orders::domain::order::OrderStatus;
use furniture_orders::domain::ports::OrderStore;
use furniture_orders::infrastructure::kv_store::FileKeyValueStore;
use furniture_orders::infrastructure::order_storage::OrderStorage;
use furniture_orders::{build_app, AppConfig};
use tempfile::TempDir;

fn config(dir: &TempDir) -> AppConfig {
    AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    }
}

fn bookshelf() -> OrderForm {
    OrderForm {
        furniture_type: "Стеллаж".to_string(),
        custom_description: Some("Стеллаж в детскую".to_string()),
        wood_type: Some("берёза".to_string()),
        width_cm: Some(80),
        height_cm: Some(180),
        depth_cm: Some(30),
        install_cost: Some(BigDecimal::from(200)),
        client_name: Some("Наталья".to_string()),
        client_address: Some("Минск".to_string()),
        client_phone: Some("+375290000000".to_string()),
        ..OrderForm::default()
    }
}

#[test]
fn first_start_seeds_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = build_app(&config(&dir)).expect("app");

    assert_eq!(app.orders.collection().len(), 6);
    assert!(dir.path().join("furnitureOrders.json").exists());
    assert!(dir.path().join("furnitureUsers.json").exists());
}

#[test]
fn orders_survive_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let placed_id = {
        let mut app = build_app(&config(&dir)).expect("app");
        let client = app.auth.login("client", "client123").expect("login");
        let placed = app
            .orders
            .place_order(Some(&client), bookshelf())
            .expect("place order");
        assert_eq!(placed.cost, BigDecimal::from(700));
        assert_eq!(placed.author, "Клиент Тестовый");

        let designer = app.auth.login("designer", "designer123").expect("login");
        app.orders
            .update_status(&designer, &placed.id, OrderStatus::InProgress)
            .expect("status update");
        placed.id
    };

    let app = build_app(&config(&dir)).expect("reopen");
    assert_eq!(app.orders.collection().len(), 7);
    let reloaded = app.orders.find_order(&placed_id).expect("persisted");
    assert_eq!(reloaded.status, OrderStatus::InProgress);
    assert_eq!(reloaded.material, "берёза");
    assert_eq!(reloaded.size, "80x180x30см");

    let mut pager = app.orders.pager();
    pager.apply_filter(OrderFilter::new().with_author("тестовый"));
    let page = app.orders.list_page(&pager).expect("list");
    assert_eq!(page.items[0].id, placed_id);
}

#[test]
fn file_store_roundtrip_preserves_every_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = build_app(&config(&dir)).expect("app");
    let original = app.orders.collection().orders().to_vec();

    let storage = OrderStorage::with_default_key(FileKeyValueStore::open(dir.path()).expect("store"));
    assert_eq!(storage.load().expect("load"), original);
}

#[test]
fn clients_cannot_delete_and_admins_can() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = build_app(&config(&dir)).expect("app");

    let client = app.auth.login("client", "client123").expect("login");
    assert!(matches!(
        app.orders.delete_order(&client, "ORD-1003"),
        Err(DomainError::Forbidden(_))
    ));

    let admin = app.auth.login("admin", "admin123").expect("login");
    app.orders.delete_order(&admin, "ORD-1003").expect("delete");
    app.auth.logout(admin);

    let app = build_app(&config(&dir)).expect("reopen");
    assert!(matches!(
        app.orders.find_order("ORD-1003"),
        Err(DomainError::NotFound)
    ));
    assert_eq!(app.orders.statistics().total_orders, 5);
}

#[test]
fn corrupt_order_blob_falls_back_to_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("furnitureOrders.json"), "{oops").expect("write");

    let app = build_app(&config(&dir)).expect("app");
    assert_eq!(app.orders.collection().len(), 6);
}

#[test]
fn cleared_storage_reseeds_on_next_start() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut app = build_app(&config(&dir)).expect("app");
        let admin = app.auth.login("admin", "admin123").expect("login");
        app.orders.clear_orders(&admin).expect("clear");
        assert!(app.orders.collection().is_empty());
        assert_eq!(app.orders.store().storage_info().expect("info").item_count, 0);
    }

    let app = build_app(&config(&dir)).expect("reopen");
    assert_eq!(app.orders.collection().len(), 6);
}
