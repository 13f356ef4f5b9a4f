// src/services/report_service.rs
//
// Relatórios são visões derivadas somente-leitura: o repositório busca
// as linhas cruas e as funções abaixo dobram os vetores em agregados.
// Tudo puro, sem banco, para que as propriedades sejam testáveis.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::{
        auth::Session,
        order::OrderStatus,
        report::{
            BreakdownEntry, CategoryRevenueEntry, DailySalesEntry, ItemRow, OrderRow,
            ProductReport, ReportQuery, SalesReport, SalesSummary, TopProductEntry,
        },
    },
    services::policy::{self, Resource, ResourceAction},
};

pub const DEFAULT_TOP_PRODUCTS: usize = 10;

/// Dia-calendário LOCAL do timestamp persistido em UTC. O bucket diário
/// usa o fuso configurado do servidor, nunca o dia UTC.
pub fn local_day(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

fn counts_revenue(orders: &[OrderRow]) -> impl Iterator<Item = &OrderRow> {
    // CANCELADO fica fora de toda apuração de receita
    orders.iter().filter(|o| o.status != OrderStatus::Cancelado)
}

pub fn sales_summary(orders: &[OrderRow]) -> SalesSummary {
    let mut total_revenue = Decimal::ZERO;
    let mut order_count: u64 = 0;

    for order in counts_revenue(orders) {
        total_revenue += order.total_amount;
        order_count += 1;
    }

    let average_ticket = if order_count > 0 {
        (total_revenue / Decimal::from(order_count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    SalesSummary {
        total_revenue,
        order_count,
        average_ticket,
    }
}

pub fn daily_sales(orders: &[OrderRow], offset: FixedOffset) -> Vec<DailySalesEntry> {
    let mut buckets: BTreeMap<NaiveDate, (Decimal, u64, u64)> = BTreeMap::new();

    for order in counts_revenue(orders) {
        let day = local_day(order.created_at, offset);
        let bucket = buckets.entry(day).or_insert((Decimal::ZERO, 0, 0));
        bucket.0 += order.total_amount;
        bucket.1 += 1;
        // somente ENTREGUE conta como concluído
        if order.status == OrderStatus::Entregue {
            bucket.2 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, (revenue, order_count, completed_count))| DailySalesEntry {
            date,
            revenue,
            order_count,
            completed_count,
        })
        .collect()
}

pub fn top_products(items: &[ItemRow], limit: usize) -> Vec<TopProductEntry> {
    let mut by_product: HashMap<Uuid, TopProductEntry> = HashMap::new();

    for item in items.iter().filter(|i| i.order_status != OrderStatus::Cancelado) {
        let entry = by_product
            .entry(item.product_id)
            .or_insert_with(|| TopProductEntry {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                total_quantity: 0,
                total_revenue: Decimal::ZERO,
            });
        entry.total_quantity += i64::from(item.quantity);
        entry.total_revenue += item.total_price;
    }

    let mut ranking: Vec<TopProductEntry> = by_product.into_values().collect();
    ranking.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    ranking.truncate(limit);
    ranking
}

pub fn revenue_by_category(items: &[ItemRow]) -> Vec<CategoryRevenueEntry> {
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    for item in items.iter().filter(|i| i.order_status != OrderStatus::Cancelado) {
        *by_category
            .entry(item.category_name.clone())
            .or_insert(Decimal::ZERO) += item.total_price;
    }

    let mut entries: Vec<CategoryRevenueEntry> = by_category
        .into_iter()
        .map(|(category_name, total_revenue)| CategoryRevenueEntry {
            category_name,
            total_revenue,
        })
        .collect();
    entries.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    entries
}

fn enum_label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn payment_method_counts(orders: &[OrderRow]) -> Vec<BreakdownEntry> {
    breakdown(counts_revenue(orders).map(|o| enum_label(&o.payment_method)))
}

pub fn delivery_type_counts(orders: &[OrderRow]) -> Vec<BreakdownEntry> {
    breakdown(counts_revenue(orders).map(|o| enum_label(&o.delivery_type)))
}

fn breakdown(keys: impl Iterator<Item = String>) -> Vec<BreakdownEntry> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| BreakdownEntry { key, count })
        .collect()
}

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
    tz_offset: FixedOffset,
}

impl ReportService {
    pub fn new(repo: ReportRepository, tz_offset: FixedOffset) -> Self {
        Self { repo, tz_offset }
    }

    pub async fn sales_report(
        &self,
        session: &Session,
        query: &ReportQuery,
    ) -> Result<SalesReport, AppError> {
        policy::require(session, Resource::Reports, ResourceAction::Read)?;

        let orders = self
            .repo
            .fetch_orders(policy::company_filter(session), query.from, query.to)
            .await?;

        Ok(SalesReport {
            summary: sales_summary(&orders),
            daily: daily_sales(&orders, self.tz_offset),
            payment_methods: payment_method_counts(&orders),
            delivery_types: delivery_type_counts(&orders),
        })
    }

    pub async fn product_report(
        &self,
        session: &Session,
        query: &ReportQuery,
    ) -> Result<ProductReport, AppError> {
        policy::require(session, Resource::Reports, ResourceAction::Read)?;

        let items = self
            .repo
            .fetch_items(policy::company_filter(session), query.from, query.to)
            .await?;

        Ok(ProductReport {
            top_products: top_products(&items, query.limit.unwrap_or(DEFAULT_TOP_PRODUCTS)),
            revenue_by_category: revenue_by_category(&items),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{DeliveryType, PaymentMethod};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn order(status: OrderStatus, total: &str, created_at: &str) -> OrderRow {
        OrderRow {
            id: Uuid::new_v4(),
            status,
            payment_method: PaymentMethod::Pix,
            delivery_type: DeliveryType::Delivery,
            total_amount: dec(total),
            created_at: created_at.parse().unwrap(),
        }
    }

    fn item(product: Uuid, name: &str, category: &str, qty: i32, total: &str, status: OrderStatus) -> ItemRow {
        ItemRow {
            product_id: product,
            product_name: name.to_string(),
            category_name: category.to_string(),
            quantity: qty,
            total_price: dec(total),
            order_status: status,
        }
    }

    #[test]
    fn summary_excludes_cancelled_orders() {
        let orders = vec![
            order(OrderStatus::Entregue, "30.00", "2024-01-15T12:00:00Z"),
            order(OrderStatus::Recebido, "10.00", "2024-01-15T13:00:00Z"),
            order(OrderStatus::Cancelado, "99.00", "2024-01-15T14:00:00Z"),
        ];

        let summary = sales_summary(&orders);
        assert_eq!(summary.total_revenue, dec("40.00"));
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.average_ticket, dec("20.00"));
    }

    #[test]
    fn empty_summary_has_zero_ticket() {
        let summary = sales_summary(&[]);
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.average_ticket, Decimal::ZERO);
    }

    #[test]
    fn daily_buckets_use_local_calendar_day_not_utc() {
        let utc_minus_3 = FixedOffset::west_opt(3 * 3600).unwrap();

        // 23:30Z ainda é 20:30 do dia 15 em UTC-3
        let ts: DateTime<Utc> = "2024-01-15T23:30:00Z".parse().unwrap();
        assert_eq!(
            local_day(ts, utc_minus_3),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        // 01:00Z do dia 16 ainda pertence ao dia 15 local
        let ts: DateTime<Utc> = "2024-01-16T01:00:00Z".parse().unwrap();
        assert_eq!(
            local_day(ts, utc_minus_3),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn daily_sales_counts_entregue_as_completed() {
        let utc_minus_3 = FixedOffset::west_opt(3 * 3600).unwrap();
        let orders = vec![
            order(OrderStatus::Entregue, "30.00", "2024-01-15T12:00:00Z"),
            order(OrderStatus::EmRota, "10.00", "2024-01-15T13:00:00Z"),
            // 01:00Z do dia 16 cai no bucket do dia 15 local
            order(OrderStatus::Entregue, "5.00", "2024-01-16T01:00:00Z"),
            order(OrderStatus::Cancelado, "50.00", "2024-01-15T15:00:00Z"),
        ];

        let daily = daily_sales(&orders, utc_minus_3);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(daily[0].revenue, dec("45.00"));
        assert_eq!(daily[0].order_count, 3);
        assert_eq!(daily[0].completed_count, 2);
    }

    #[test]
    fn top_products_rank_by_quantity_and_skip_cancelled() {
        let cola = Uuid::new_v4();
        let pilsen = Uuid::new_v4();
        let items = vec![
            item(cola, "Cola 2L", "Refrigerantes", 2, "20.00", OrderStatus::Entregue),
            item(pilsen, "Pilsen", "Cervejas", 6, "21.00", OrderStatus::Recebido),
            item(cola, "Cola 2L", "Refrigerantes", 3, "30.00", OrderStatus::EmRota),
            item(cola, "Cola 2L", "Refrigerantes", 99, "990.00", OrderStatus::Cancelado),
        ];

        let ranking = top_products(&items, 10);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].product_id, pilsen);
        assert_eq!(ranking[0].total_quantity, 6);
        assert_eq!(ranking[1].product_id, cola);
        assert_eq!(ranking[1].total_quantity, 5);
        assert_eq!(ranking[1].total_revenue, dec("50.00"));

        let top_one = top_products(&items, 1);
        assert_eq!(top_one.len(), 1);
    }

    #[test]
    fn revenue_by_category_sums_and_sorts() {
        let items = vec![
            item(Uuid::new_v4(), "Cola 2L", "Refrigerantes", 2, "20.00", OrderStatus::Entregue),
            item(Uuid::new_v4(), "Guaraná", "Refrigerantes", 1, "8.00", OrderStatus::Recebido),
            item(Uuid::new_v4(), "Pilsen", "Cervejas", 6, "21.00", OrderStatus::Entregue),
        ];

        let entries = revenue_by_category(&items);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category_name, "Refrigerantes");
        assert_eq!(entries[0].total_revenue, dec("28.00"));
        assert_eq!(entries[1].category_name, "Cervejas");
    }

    #[test]
    fn breakdowns_count_by_enum_label() {
        let mut orders = vec![
            order(OrderStatus::Entregue, "10.00", "2024-01-15T12:00:00Z"),
            order(OrderStatus::Recebido, "10.00", "2024-01-15T12:00:00Z"),
        ];
        orders[1].payment_method = PaymentMethod::Dinheiro;
        orders[1].delivery_type = DeliveryType::Retirada;

        let payments = payment_method_counts(&orders);
        assert!(payments.contains(&BreakdownEntry { key: "PIX".to_string(), count: 1 }));
        assert!(payments.contains(&BreakdownEntry { key: "DINHEIRO".to_string(), count: 1 }));

        let deliveries = delivery_type_counts(&orders);
        assert!(deliveries.contains(&BreakdownEntry { key: "DELIVERY".to_string(), count: 1 }));
        assert!(deliveries.contains(&BreakdownEntry { key: "RETIRADA".to_string(), count: 1 }));
    }
}
