use crate::domain::order::Order;

use super::order_storage::decode_orders;

/// Sample orders used when storage holds nothing yet. Kept in the same
/// JSON shape the store writes.
const SEED_ORDERS: &str = r#"[
  {
    "id": "ORD-1001",
    "description": "Шкаф-купе с зеркальными дверями",
    "author": "Клиент Тестовый",
    "createdAt": "2024-02-03T09:15:00Z",
    "status": "завершен",
    "cost": 1850,
    "installCost": 150,
    "material": "дуб, латунь",
    "furnitureType": "Шкаф",
    "size": "180x240x60см",
    "quantity": 1,
    "clientName": "Ирина Ковалёва",
    "clientAddress": "Минск, ул. Сурганова, 12",
    "clientPhone": "+375291112233",
    "paymentMethod": "карта",
    "prepaymentPercent": 50
  },
  {
    "id": "ORD-1002",
    "description": "Обеденный стол на 6 персон",
    "author": "Клиент Тестовый",
    "createdAt": "2024-02-10T14:40:00Z",
    "status": "в работе",
    "cost": 1200,
    "installCost": 0,
    "material": "ясень, сталь",
    "furnitureType": "Стол",
    "size": "160x75x90см",
    "quantity": 1,
    "clientName": "Павел Сидоренко",
    "clientAddress": "Минск, пр. Независимости, 95",
    "clientPhone": "+375332223344",
    "paymentMethod": "наличные",
    "prepaymentPercent": 30
  },
  {
    "id": "ORD-1003",
    "description": "Комплект стульев к столу",
    "author": "Дизайнер Петров",
    "createdAt": "2024-02-11T08:05:00Z",
    "status": "в очереди",
    "cost": 960,
    "installCost": 0,
    "material": "ясень, сталь",
    "furnitureType": "Стул",
    "size": "45x95x50см",
    "quantity": 6,
    "clientName": "Павел Сидоренко",
    "clientAddress": "Минск, пр. Независимости, 95",
    "clientPhone": "+375332223344",
    "paymentMethod": "наличные",
    "prepaymentPercent": 30
  },
  {
    "id": "ORD-1004",
    "description": "Кухонный гарнитур угловой",
    "author": "Администратор",
    "createdAt": "2024-02-18T11:30:00Z",
    "status": "в работе",
    "cost": 4300,
    "installCost": 400,
    "material": "МДФ, блюм",
    "furnitureType": "Кухня",
    "size": "320x220x60см",
    "quantity": 1,
    "clientName": "Ольга Мельник",
    "clientAddress": "Гродно, ул. Ожешко, 4",
    "clientPhone": "+375295556677",
    "paymentMethod": "карта",
    "prepaymentPercent": 50
  },
  {
    "id": "ORD-1005",
    "description": "Прикроватная тумба",
    "author": "Клиент Тестовый",
    "createdAt": "2024-03-01T16:20:00Z",
    "status": "в очереди",
    "cost": 380,
    "installCost": 0,
    "material": "сосна, латунь",
    "furnitureType": "Тумба",
    "size": "45x55x40см",
    "quantity": 2,
    "clientName": "Ирина Ковалёва",
    "clientAddress": "Минск, ул. Сурганова, 12",
    "clientPhone": "+375291112233",
    "paymentMethod": "наличные",
    "prepaymentPercent": 30
  },
  {
    "id": "ORD-1006",
    "description": "Книжный стеллаж",
    "author": "Дизайнер Петров",
    "createdAt": "2024-03-04T10:00:00Z",
    "status": "завершен",
    "cost": 720,
    "installCost": 100,
    "material": "сосна, сталь",
    "furnitureType": "Шкаф",
    "size": "100x200x35см",
    "quantity": 1,
    "clientName": "Андрей Лис",
    "clientAddress": "Брест, ул. Советская, 30",
    "clientPhone": "+375447778899",
    "paymentMethod": "карта",
    "prepaymentPercent": 100
  }
]"#;

pub fn seed_orders() -> Vec<Order> {
    match decode_orders(SEED_ORDERS) {
        Ok(orders) => orders,
        Err(e) => {
            log::error!("built-in seed orders are unreadable: {}", e);
            vec![]
        }
    }
}
