// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::order::{DeliveryType, Order, OrderItem, OrderStatus, PaymentMethod},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        scope: Option<Uuid>,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::order_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn find_by_id(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE id = $1 AND ($2::uuid IS NULL OR company_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn list_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY product_name ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        customer_id: Option<Uuid>,
        customer_name: &str,
        customer_email: Option<&str>,
        customer_phone: Option<&str>,
        customer_cnpj_cpf: Option<&str>,
        delivery_type: DeliveryType,
        delivery_address: Option<&str>,
        payment_method: PaymentMethod,
        subtotal: Decimal,
        delivery_fee: Decimal,
        total_amount: Decimal,
        notes: Option<&str>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                company_id, customer_id,
                customer_name, customer_email, customer_phone, customer_cnpj_cpf,
                delivery_type, delivery_address, payment_method,
                subtotal, delivery_fee, total_amount, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .bind(customer_name)
        .bind(customer_email)
        .bind(customer_phone)
        .bind(customer_cnpj_cpf)
        .bind(delivery_type)
        .bind(delivery_address)
        .bind(payment_method)
        .bind(subtotal)
        .bind(delivery_fee)
        .bind(total_amount)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        product_name: &str,
        variant_name: Option<&str>,
        quantity: i32,
        unit_price: Decimal,
        total_price: Decimal,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (
                order_id, product_id, variant_id,
                product_name, variant_name,
                quantity, unit_price, total_price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(variant_id)
        .bind(product_name)
        .bind(variant_name)
        .bind(quantity)
        .bind(unit_price)
        .bind(total_price)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }
}
