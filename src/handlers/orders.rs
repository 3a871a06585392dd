use std::fs;
use std::path::Path;

use bigdecimal::BigDecimal;

use crate::application::order_service::{OrderForm, StatusReport};
use crate::application::pager::OrderPage;
use crate::domain::filter::OrderFilter;
use crate::domain::order::{Order, OrderStatus, Statistics};
use crate::domain::ports::KeyValueStore;
use crate::domain::user::{NewUser, Session, User};
use crate::errors::AppError;
use crate::infrastructure::order_storage::decode_orders_counted;
use crate::App;

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Page number (1-based).
    pub page: usize,
    pub author: Option<String>,
    /// Status label, alias or the "all" sentinel.
    pub status: Option<String>,
    pub furniture_type: Option<String>,
    pub min_cost: Option<BigDecimal>,
    pub max_cost: Option<BigDecimal>,
}

impl ListQuery {
    fn filter(&self) -> Result<OrderFilter, AppError> {
        let mut filter = OrderFilter::new();
        if let Some(author) = self.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            filter = filter.with_author(author);
        }
        if let Some(status) = &self.status {
            filter = filter.with_status_label(status)?;
        }
        if let Some(kind) = &self.furniture_type {
            filter = filter.with_furniture_type(kind.clone());
        }
        if let Some(min) = &self.min_cost {
            filter = filter.with_min_cost(min.clone());
        }
        if let Some(max) = &self.max_cost {
            filter = filter.with_max_cost(max.clone());
        }
        filter.validate()?;
        Ok(filter)
    }
}

fn login<S: KeyValueStore + Clone>(app: &App<S>, credentials: &Credentials) -> Result<Session, AppError> {
    Ok(app.auth.login(&credentials.username, &credentials.password)?)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

pub fn list_orders<S: KeyValueStore + Clone>(app: &App<S>, query: ListQuery) -> Result<String, AppError> {
    let mut pager = app.orders.pager();
    pager.apply_filter(query.filter()?);
    pager.go_to(query.page.saturating_sub(1));

    let page = app.orders.list_page(&pager)?;
    Ok(render_page(&page))
}

pub fn show_order<S: KeyValueStore + Clone>(app: &App<S>, id: &str) -> Result<String, AppError> {
    let order = app.orders.find_order(id)?;
    let report = app.orders.check_status(id)?;
    Ok(format!("{}\n\n{}", render_order(&order), render_status(&report)))
}

pub fn statistics<S: KeyValueStore + Clone>(app: &App<S>) -> Result<String, AppError> {
    Ok(render_statistics(&app.orders.statistics()))
}

/// Places an order, anonymously when no credentials are given.
pub fn create_order<S: KeyValueStore + Clone>(
    app: &mut App<S>,
    credentials: Option<&Credentials>,
    form: OrderForm,
) -> Result<String, AppError> {
    let session = credentials.map(|c| login(app, c)).transpose()?;
    let order = app.orders.place_order(session.as_ref(), form)?;
    if let Some(session) = session {
        app.auth.logout(session);
    }
    Ok(format!("Order #{} placed.\n{}", order.id, render_order(&order)))
}

pub fn set_status<S: KeyValueStore + Clone>(
    app: &mut App<S>,
    credentials: &Credentials,
    id: &str,
    status: &str,
) -> Result<String, AppError> {
    let status: OrderStatus = status.parse()?;
    let session = login(app, credentials)?;
    let order = app.orders.update_status(&session, id, status)?;
    app.auth.logout(session);
    Ok(format!("Order #{} is now '{}'.", order.id, order.status))
}

pub fn complete_order<S: KeyValueStore + Clone>(app: &mut App<S>, id: &str) -> Result<String, AppError> {
    let order = app.orders.complete_order(id)?;
    Ok(format!("Order #{} completed.", order.id))
}

pub fn delete_order<S: KeyValueStore + Clone>(
    app: &mut App<S>,
    credentials: &Credentials,
    id: &str,
) -> Result<String, AppError> {
    let session = login(app, credentials)?;
    app.orders.delete_order(&session, id)?;
    app.auth.logout(session);
    Ok(format!("Order #{} deleted.", id))
}

pub fn import_orders<S: KeyValueStore + Clone>(
    app: &mut App<S>,
    credentials: &Credentials,
    path: &Path,
) -> Result<String, AppError> {
    let blob = fs::read_to_string(path)
        .map_err(|e| AppError::BadRequest(format!("cannot read {}: {}", path.display(), e)))?;
    let decoded =
        decode_orders_counted(&blob).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let offered = decoded.offered();
    let skipped = decoded.skipped;

    let session = login(app, credentials)?;
    let rejected = app.orders.import_orders(&session, decoded.orders)?;
    app.auth.logout(session);

    let mut lines = vec![format!(
        "Imported {} of {} orders.",
        offered - skipped - rejected.len(),
        offered
    )];
    if skipped > 0 {
        lines.push(format!("  skipped {} unreadable record(s)", skipped));
    }
    lines.extend(rejected.iter().map(|o| format!("  rejected #{}", o.id)));
    Ok(lines.join("\n"))
}

pub fn register<S: KeyValueStore + Clone>(app: &App<S>, new_user: NewUser) -> Result<String, AppError> {
    let user = app.auth.register(new_user)?;
    Ok(format!("Registered {}.", render_user(&user)))
}

pub fn clear_orders<S: KeyValueStore + Clone>(
    app: &mut App<S>,
    credentials: &Credentials,
) -> Result<String, AppError> {
    let session = login(app, credentials)?;
    app.orders.clear_orders(&session)?;
    app.auth.logout(session);
    Ok("All orders removed.".to_string())
}

pub fn storage_info<S: KeyValueStore + Clone>(app: &App<S>) -> Result<String, AppError> {
    let info = app.orders.store().storage_info()?;
    Ok(format!(
        "has data: {}\nsize: {} bytes\norders: {}",
        info.has_data, info.size_bytes, info.item_count
    ))
}

// ── Rendering ────────────────────────────────────────────────────────────────

pub fn render_order(order: &Order) -> String {
    [
        format!("Заказ #{} [{}]", order.id, order.status),
        format!("  Клиент: {}", order.client_name),
        format!("  Вид: {}", order.furniture_type),
        format!("  Материалы: {}", order.material),
        format!("  Размеры: {}", order.size),
        format!("  Количество: {}", order.quantity),
        format!("  Стоимость: {} BYN", order.cost),
        format!("  Предоплата: {}%", order.prepayment_percent),
        format!("  Дата создания: {}", order.created_at.format("%d.%m.%Y")),
        format!("  Автор: {}", order.author),
    ]
    .join("\n")
}

pub fn render_page(page: &OrderPage) -> String {
    let mut blocks: Vec<String> = page.items.iter().map(render_order).collect();
    if blocks.is_empty() {
        blocks.push("No orders match.".to_string());
    }
    blocks.push(format!(
        "Стр. {} из {} ({} orders)",
        page.page + 1,
        page.total_pages,
        page.total
    ));
    blocks.join("\n\n")
}

pub fn render_status(report: &StatusReport) -> String {
    let mut lines = vec![
        format!("Заказ #{} — текущий статус", report.id),
        format!("  Статус: {}", report.status),
        format!("  Стоимость: {} BYN", report.cost),
        format!("  Предоплата: {}%", report.prepayment_percent),
        format!("  Материалы: {}", report.material),
        format!("  Дата создания: {}", report.created_at.format("%d.%m.%Y")),
    ];
    if report.completed {
        lines.push("  Заказ завершен!".to_string());
    }
    lines.join("\n")
}

pub fn render_statistics(stats: &Statistics) -> String {
    let mut lines = vec![
        format!("Orders: {}", stats.total_orders),
        format!("Total cost: {} BYN", stats.total_cost),
        "By status:".to_string(),
    ];
    lines.extend(stats.by_status.iter().map(|(k, v)| format!("  {}: {}", k, v)));
    lines.push("By material:".to_string());
    lines.extend(stats.by_material.iter().map(|(k, v)| format!("  {}: {}", k, v)));
    lines.push("By type:".to_string());
    lines.extend(stats.by_type.iter().map(|(k, v)| format!("  {}: {}", k, v)));
    lines.join("\n")
}

fn render_user(user: &User) -> String {
    format!("{} ({}, {})", user.username, user.name, user.role)
}
