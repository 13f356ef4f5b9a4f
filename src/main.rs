// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação de staff
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_middleware,
            )),
        );

    // Storefront público, preso ao slug da loja
    let public_routes = Router::new()
        .route("/{slug}/profile", get(handlers::public::profile))
        .route("/{slug}/menu", get(handlers::public::menu))
        .route(
            "/{slug}/customers/register",
            post(handlers::public::register_customer),
        )
        .route(
            "/{slug}/customers/login",
            post(handlers::public::login_customer),
        )
        .route("/{slug}/orders", post(handlers::public::checkout));

    // Painel administrativo: tudo atrás do middleware de autenticação.
    // A autorização fina por papel acontece nos serviços.
    let admin_routes = Router::new()
        .route(
            "/companies",
            get(handlers::companies::list).post(handlers::companies::create),
        )
        .route(
            "/companies/{id}",
            get(handlers::companies::get)
                .put(handlers::companies::update)
                .delete(handlers::companies::deactivate),
        )
        .route("/companies/{id}/logo", post(handlers::companies::upload_logo))
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/categories/{id}",
            put(handlers::categories::update).delete(handlers::categories::deactivate),
        )
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route(
            "/products/{id}",
            put(handlers::products::update).delete(handlers::products::deactivate),
        )
        .route("/products/{id}/image", post(handlers::products::upload_image))
        .route(
            "/products/{id}/variants",
            get(handlers::products::list_variants).post(handlers::products::create_variant),
        )
        .route(
            "/variants/{id}",
            axum::routing::delete(handlers::products::deactivate_variant),
        )
        .route(
            "/customers",
            get(handlers::customers::list).post(handlers::customers::create),
        )
        .route(
            "/customers/{id}",
            put(handlers::customers::update).delete(handlers::customers::deactivate),
        )
        .route(
            "/customers/{id}/reset-password",
            post(handlers::customers::reset_password),
        )
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/users/{id}",
            axum::routing::delete(handlers::users::deactivate),
        )
        .route(
            "/users/{id}/reset-password",
            post(handlers::users::reset_password),
        )
        .route(
            "/orders",
            get(handlers::orders::list).post(handlers::orders::create),
        )
        .route("/orders/{id}", get(handlers::orders::get))
        .route("/orders/{id}/reorder", post(handlers::orders::reorder))
        .route("/orders/{id}/status", put(handlers::orders::update_status))
        .route(
            "/finance",
            get(handlers::finance::list).post(handlers::finance::create),
        )
        .route("/finance/{id}/status", put(handlers::finance::update_status))
        .route("/reports/sales", get(handlers::reports::sales))
        .route("/reports/products", get(handlers::reports::products))
        .route("/audit", get(handlers::audit::list))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/public", public_routes)
        .nest("/api", admin_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
