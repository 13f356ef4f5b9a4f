// src/services/order_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CompanyRepository, CustomerRepository, OrderRepository},
    models::{
        audit::AuditAction,
        auth::Session,
        order::{
            CreateOrderPayload, DeliveryType, Order, OrderItem, OrderLinePayload, OrderStatus,
            OrderWithItems, UpdateOrderStatusPayload,
        },
    },
    services::{
        audit::{self, AuditService},
        finance_service::FinanceService,
        policy::{self, Resource, ResourceAction},
    },
};

/// Linha precificada contra o catálogo atual. Os valores capturados
/// aqui viram snapshot imutável no order_item.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: String,
    pub variant_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// unit_price = preço base do produto + modificador da variante.
pub fn price_line(
    base_price: Decimal,
    price_modifier: Option<Decimal>,
    quantity: i32,
) -> (Decimal, Decimal) {
    let unit_price = base_price + price_modifier.unwrap_or(Decimal::ZERO);
    let total_price = unit_price * Decimal::from(quantity);
    (unit_price, total_price)
}

pub fn subtotal(lines: &[PricedLine]) -> Decimal {
    lines.iter().map(|l| l.total_price).sum()
}

/// Taxa fixa, cobrada apenas em entregas (não calculada por distância).
pub fn delivery_fee_for(delivery_type: DeliveryType, flat_fee: Decimal) -> Decimal {
    match delivery_type {
        DeliveryType::Delivery => flat_fee,
        DeliveryType::Retirada => Decimal::ZERO,
    }
}

/// Tuplas (produto, variante, quantidade) de um pedido anterior, para
/// re-precificação no fluxo de "pedir novamente".
pub fn lines_from_items(items: &[OrderItem]) -> Vec<OrderLinePayload> {
    items
        .iter()
        .map(|item| OrderLinePayload {
            product_id: item.product_id,
            variant_id: item.variant_id,
            quantity: item.quantity,
        })
        .collect()
}

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    catalog: CatalogRepository,
    customer_repo: CustomerRepository,
    company_repo: CompanyRepository,
    finance: FinanceService,
    audit: AuditService,
    flat_delivery_fee: Decimal,
    pool: sqlx::PgPool,
}

impl OrderService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repo: OrderRepository,
        catalog: CatalogRepository,
        customer_repo: CustomerRepository,
        company_repo: CompanyRepository,
        finance: FinanceService,
        audit: AuditService,
        flat_delivery_fee: Decimal,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            repo,
            catalog,
            customer_repo,
            company_repo,
            finance,
            audit,
            flat_delivery_fee,
            pool,
        }
    }

    pub async fn list(
        &self,
        session: &Session,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, AppError> {
        policy::require(session, Resource::Orders, ResourceAction::Read)?;
        self.repo.list(policy::company_filter(session), status).await
    }

    pub async fn get(&self, session: &Session, id: Uuid) -> Result<OrderWithItems, AppError> {
        policy::require(session, Resource::Orders, ResourceAction::Read)?;

        let order = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        let items = self.repo.list_items(order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    pub async fn create(
        &self,
        session: &Session,
        payload: &CreateOrderPayload,
    ) -> Result<OrderWithItems, AppError> {
        policy::require(session, Resource::Orders, ResourceAction::Create)?;
        let company_id = policy::company_id_for_create(session, payload.company_id)?;
        self.create_for_company(company_id, Some(session.user_id), payload)
            .await
    }

    /// Checkout do storefront público, preso à loja do slug.
    pub async fn checkout(
        &self,
        slug: &str,
        payload: &CreateOrderPayload,
    ) -> Result<OrderWithItems, AppError> {
        let company = self
            .company_repo
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::NotFound("Loja"))?;

        self.create_for_company(company.id, None, payload).await
    }

    /// "Pedir novamente": copia as tuplas (produto, variante, quantidade)
    /// de um pedido anterior, re-precificadas contra o catálogo ATUAL —
    /// decisão deliberada: quem repete o pedido paga o preço de hoje.
    pub async fn reorder(&self, session: &Session, order_id: Uuid) -> Result<OrderWithItems, AppError> {
        policy::require(session, Resource::Orders, ResourceAction::Create)?;

        let source = self
            .repo
            .find_by_id(policy::company_filter(session), order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        let source_items = self.repo.list_items(source.id).await?;

        let payload = CreateOrderPayload {
            customer_id: source.customer_id,
            customer_name: source.customer_name.clone(),
            customer_email: source.customer_email.clone(),
            customer_phone: source.customer_phone.clone(),
            customer_cnpj_cpf: source.customer_cnpj_cpf.clone(),
            delivery_type: source.delivery_type,
            delivery_address: source.delivery_address.clone(),
            payment_method: source.payment_method,
            notes: source.notes.clone(),
            items: lines_from_items(&source_items),
            company_id: Some(source.company_id),
        };

        self.create_for_company(source.company_id, Some(session.user_id), &payload)
            .await
    }

    pub async fn update_status(
        &self,
        session: &Session,
        id: Uuid,
        payload: &UpdateOrderStatusPayload,
    ) -> Result<Order, AppError> {
        policy::require(session, Resource::Orders, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        let updated = self.repo.update_status(&self.pool, id, payload.status).await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "order",
                id,
                AuditAction::Update,
                audit::snapshot(&existing.status),
                audit::snapshot(&updated.status),
            ))
            .await;

        Ok(updated)
    }

    /// Resolve as linhas contra o catálogo atual da empresa. Produto ou
    /// variante ausente/inativo derruba a operação inteira: pedido
    /// parcial não existe.
    async fn resolve_lines(
        &self,
        company_id: Uuid,
        lines: &[OrderLinePayload],
    ) -> Result<Vec<PricedLine>, AppError> {
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            let product = self
                .catalog
                .find_product(Some(company_id), line.product_id)
                .await?
                .filter(|p| p.is_active)
                .ok_or(AppError::NotFound("Produto"))?;

            let variant = match line.variant_id {
                Some(variant_id) => {
                    let variant = self
                        .catalog
                        .find_variant(Some(company_id), variant_id)
                        .await?
                        .filter(|v| v.product_id == product.id && v.is_active)
                        .ok_or(AppError::NotFound("Variante"))?;
                    Some(variant)
                }
                None => None,
            };

            let (unit_price, total_price) = price_line(
                product.base_price,
                variant.as_ref().map(|v| v.price_modifier),
                line.quantity,
            );

            priced.push(PricedLine {
                product_id: product.id,
                variant_id: variant.as_ref().map(|v| v.id),
                product_name: product.name,
                variant_name: variant.map(|v| v.name),
                quantity: line.quantity,
                unit_price,
                total_price,
            });
        }

        Ok(priced)
    }

    async fn create_for_company(
        &self,
        company_id: Uuid,
        acting_user: Option<Uuid>,
        payload: &CreateOrderPayload,
    ) -> Result<OrderWithItems, AppError> {
        // Cliente registrado, se indicado, precisa pertencer à empresa.
        if let Some(customer_id) = payload.customer_id {
            self.customer_repo
                .find_by_id(Some(company_id), customer_id)
                .await?
                .ok_or(AppError::NotFound("Cliente"))?;
        }

        let lines = self.resolve_lines(company_id, &payload.items).await?;

        let order_subtotal = subtotal(&lines);
        let delivery_fee = delivery_fee_for(payload.delivery_type, self.flat_delivery_fee);
        let total_amount = order_subtotal + delivery_fee;

        // Pedido, itens e lançamento financeiro na MESMA transação:
        // ou tudo é persistido, ou nada é.
        let mut tx = self.pool.begin().await?;

        let order = self
            .repo
            .insert_order(
                &mut *tx,
                company_id,
                payload.customer_id,
                &payload.customer_name,
                payload.customer_email.as_deref(),
                payload.customer_phone.as_deref(),
                payload.customer_cnpj_cpf.as_deref(),
                payload.delivery_type,
                payload.delivery_address.as_deref(),
                payload.payment_method,
                order_subtotal,
                delivery_fee,
                total_amount,
                payload.notes.as_deref(),
            )
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = self
                .repo
                .insert_item(
                    &mut *tx,
                    order.id,
                    line.product_id,
                    line.variant_id,
                    &line.product_name,
                    line.variant_name.as_deref(),
                    line.quantity,
                    line.unit_price,
                    line.total_price,
                )
                .await?;
            items.push(item);
        }

        self.finance
            .create_receivable_for_order(
                &mut *tx,
                company_id,
                order.id,
                total_amount,
                payload.payment_method,
            )
            .await?;

        tx.commit().await?;

        self.audit
            .record(audit::entry(
                company_id,
                acting_user,
                "order",
                order.id,
                AuditAction::Create,
                None,
                audit::snapshot(&order),
            ))
            .await;

        Ok(OrderWithItems { order, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn line(product: Uuid, variant: Option<Uuid>, qty: i32, unit: &str) -> PricedLine {
        let unit_price = dec(unit);
        PricedLine {
            product_id: product,
            variant_id: variant,
            product_name: "Produto".to_string(),
            variant_name: None,
            quantity: qty,
            unit_price,
            total_price: unit_price * Decimal::from(qty),
        }
    }

    #[test]
    fn unit_price_adds_variant_modifier() {
        let (unit, total) = price_line(dec("10.00"), Some(dec("2.50")), 3);
        assert_eq!(unit, dec("12.50"));
        assert_eq!(total, dec("37.50"));

        let (unit, total) = price_line(dec("10.00"), None, 2);
        assert_eq!(unit, dec("10.00"));
        assert_eq!(total, dec("20.00"));
    }

    #[test]
    fn totals_identity_holds() {
        let lines = vec![
            line(Uuid::new_v4(), None, 2, "10.00"),
            line(Uuid::new_v4(), Some(Uuid::new_v4()), 1, "7.25"),
        ];
        let order_subtotal = subtotal(&lines);
        assert_eq!(order_subtotal, dec("27.25"));

        // total_price de cada linha = unit_price * quantity
        for l in &lines {
            assert_eq!(l.total_price, l.unit_price * Decimal::from(l.quantity));
        }

        let fee = delivery_fee_for(DeliveryType::Delivery, dec("8.00"));
        assert_eq!(order_subtotal + fee, dec("35.25"));
    }

    #[test]
    fn pickup_orders_have_no_delivery_fee() {
        assert_eq!(
            delivery_fee_for(DeliveryType::Retirada, dec("8.00")),
            Decimal::ZERO
        );
        assert_eq!(
            delivery_fee_for(DeliveryType::Delivery, dec("8.00")),
            dec("8.00")
        );
    }

    #[test]
    fn reorder_lines_preserve_product_variant_quantity_tuples() {
        let product_a = Uuid::new_v4();
        let product_b = Uuid::new_v4();
        let variant_b = Uuid::new_v4();
        let order_id = Uuid::new_v4();

        // itens com preços antigos; as tuplas devem sobreviver, os
        // preços não (serão re-resolvidos contra o catálogo atual)
        let items = vec![
            OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: product_a,
                variant_id: None,
                product_name: "Cola 2L".to_string(),
                variant_name: None,
                quantity: 2,
                unit_price: dec("8.00"),
                total_price: dec("16.00"),
            },
            OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: product_b,
                variant_id: Some(variant_b),
                product_name: "Pilsen".to_string(),
                variant_name: Some("Lata".to_string()),
                quantity: 6,
                unit_price: dec("3.50"),
                total_price: dec("21.00"),
            },
        ];

        let lines = lines_from_items(&items);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            (lines[0].product_id, lines[0].variant_id, lines[0].quantity),
            (product_a, None, 2)
        );
        assert_eq!(
            (lines[1].product_id, lines[1].variant_id, lines[1].quantity),
            (product_b, Some(variant_b), 6)
        );
    }

    #[test]
    fn payload_without_items_fails_validation() {
        use crate::models::order::PaymentMethod;
        use validator::Validate;

        let payload = CreateOrderPayload {
            customer_id: None,
            customer_name: "Cliente Balcão".to_string(),
            customer_email: None,
            customer_phone: None,
            customer_cnpj_cpf: None,
            delivery_type: DeliveryType::Retirada,
            delivery_address: None,
            payment_method: PaymentMethod::Dinheiro,
            notes: None,
            items: vec![],
            company_id: None,
        };

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    // Roda contra um Postgres real (DATABASE_URL): cargo test -- --ignored
    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer um Postgres apontado por DATABASE_URL"]
    async fn order_and_financial_entry_persist_atomically(pool: sqlx::PgPool) {
        use crate::db::FinanceRepository;
        use crate::models::finance::EntryKind;
        use crate::models::order::PaymentMethod;

        let companies = CompanyRepository::new(pool.clone());
        let catalog = CatalogRepository::new(pool.clone());
        let orders = OrderRepository::new(pool.clone());
        let finance = FinanceRepository::new(pool.clone());

        let company = companies
            .create(
                &pool,
                "Bebidas Sul",
                "bebidas-sul",
                None,
                None,
                None,
                None,
                None,
                None,
            )
            .await
            .unwrap();
        let category = catalog
            .create_category(&pool, company.id, "Refrigerantes", 0)
            .await
            .unwrap();
        let product = catalog
            .create_product(
                &pool,
                company.id,
                category.id,
                "Cola 2L",
                None,
                None,
                dec("10.00"),
            )
            .await
            .unwrap();

        // Mesma sequência do create_for_company: pedido, itens e
        // lançamento financeiro dentro de uma única transação.
        let mut tx = pool.begin().await.unwrap();
        let order = orders
            .insert_order(
                &mut *tx,
                company.id,
                None,
                "Cliente Balcão",
                None,
                None,
                None,
                DeliveryType::Retirada,
                None,
                PaymentMethod::Dinheiro,
                dec("10.00"),
                Decimal::ZERO,
                dec("10.00"),
                None,
            )
            .await
            .unwrap();
        orders
            .insert_item(
                &mut *tx,
                order.id,
                product.id,
                None,
                &product.name,
                None,
                1,
                dec("10.00"),
                dec("10.00"),
            )
            .await
            .unwrap();

        // Lançamento apontando para um pedido inexistente viola a FK e
        // derruba a transação inteira, como aconteceria no serviço.
        let result = finance
            .insert_entry(
                &mut *tx,
                company.id,
                Some(Uuid::new_v4()),
                EntryKind::Receita,
                dec("10.00"),
                "Venda Pedido",
                Some(PaymentMethod::Dinheiro),
                chrono::Utc::now().date_naive(),
            )
            .await;
        assert!(result.is_err());
        drop(tx); // rollback implícito, como no `?` do serviço

        assert!(orders.find_by_id(None, order.id).await.unwrap().is_none());
        assert!(orders.list_items(order.id).await.unwrap().is_empty());
    }
}
