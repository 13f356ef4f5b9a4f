// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::{CompanyRepository, UserRepository},
    models::{
        audit::AuditAction,
        auth::{Claims, Role, Session, SignupPayload, User},
    },
    services::audit::{self, AuditService},
};

const TOKEN_LIFETIME_DAYS: i64 = 7;

// --- Funções puras de token ---
// Papel e empresa entram no token no login e valem até ele expirar;
// a troca de papel só surte efeito no próximo login.

pub fn issue_token(session: &Session, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(TOKEN_LIFETIME_DAYS);

    let claims = Claims {
        sub: session.user_id,
        role: session.role,
        company_id: session.company_id,
        company_name: session.company_name.clone(),
        company_slug: session.company_slug.clone(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_session(token: &str, secret: &str) -> Result<Session, AppError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|_| AppError::Unauthenticated)?;

    Ok(token_data.claims.into_session())
}

// --- Hashing (fora do executor async) ---

pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    company_repo: CompanyRepository,
    audit: AuditService,
    jwt_secret: String,
    bcrypt_cost: u32,
    pool: sqlx::PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        company_repo: CompanyRepository,
        audit: AuditService,
        jwt_secret: String,
        bcrypt_cost: u32,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            user_repo,
            company_repo,
            audit,
            jwt_secret,
            bcrypt_cost,
            pool,
        }
    }

    /// Cadastro: cria a empresa e seu primeiro usuário (dono, MASTER_DIST)
    /// na mesma transação.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<String, AppError> {
        if self.company_repo.slug_exists(&payload.company_slug).await? {
            return Err(AppError::DuplicateResource(
                "Este slug já está em uso".to_string(),
            ));
        }
        if self.user_repo.email_exists(&payload.email).await? {
            return Err(AppError::DuplicateResource(
                "Este e-mail já está em uso".to_string(),
            ));
        }

        let hashed = hash_password(payload.password.clone(), self.bcrypt_cost).await?;

        let mut tx = self.pool.begin().await?;

        let company = self
            .company_repo
            .create(
                &mut *tx,
                &payload.company_name,
                &payload.company_slug,
                None,
                None,
                None,
                None,
                None,
                None,
            )
            .await?;

        let user = self
            .user_repo
            .create(
                &mut *tx,
                Some(company.id),
                &payload.user_name,
                &payload.email,
                &hashed,
                Role::MasterDist,
            )
            .await?;

        tx.commit().await?;

        self.audit
            .record(audit::entry(
                company.id,
                Some(user.id),
                "company",
                company.id,
                AuditAction::Create,
                None,
                audit::snapshot(&company),
            ))
            .await;

        let session = Session {
            user_id: user.id,
            role: user.role,
            company_id: Some(company.id),
            company_name: company.name,
            company_slug: company.slug,
        };
        issue_token(&session, &self.jwt_secret)
    }

    /// Login de staff. Usuário desativado ou empresa desativada falham
    /// com a mesma resposta genérica de credencial inválida.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let company = match user.company_id {
            Some(company_id) => {
                let company = self
                    .company_repo
                    .find_by_id(None, company_id)
                    .await?
                    .ok_or(AppError::InvalidCredentials)?;
                if !company.is_active {
                    return Err(AppError::InvalidCredentials);
                }
                Some(company)
            }
            None => None,
        };

        if !verify_password(password.to_owned(), user.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        let session = session_for(&user, company.as_ref().map(|c| (c.name.as_str(), c.slug.as_str())));
        issue_token(&session, &self.jwt_secret)
    }
}

fn session_for(user: &User, company: Option<(&str, &str)>) -> Session {
    let (company_name, company_slug) = company.unwrap_or(("", ""));
    Session {
        user_id: user.id,
        role: user.role,
        company_id: user.company_id,
        company_name: company_name.to_string(),
        company_slug: company_slug.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role: Role::MasterDist,
            company_id: Some(Uuid::new_v4()),
            company_name: "Bebidas Sul".to_string(),
            company_slug: "bebidas-sul".to_string(),
        }
    }

    #[test]
    fn token_roundtrip_preserves_identity() {
        let s = session();
        let token = issue_token(&s, "segredo-de-teste").unwrap();
        let decoded = decode_session(&token, "segredo-de-teste").unwrap();

        assert_eq!(decoded.user_id, s.user_id);
        assert_eq!(decoded.role, s.role);
        assert_eq!(decoded.company_id, s.company_id);
        assert_eq!(decoded.company_slug, s.company_slug);
    }

    #[test]
    fn tampered_or_foreign_token_is_rejected() {
        let token = issue_token(&session(), "segredo-a").unwrap();
        assert!(matches!(
            decode_session(&token, "segredo-b"),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            decode_session("nao-e-um-token", "segredo-a"),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let s = session();
        let past = Utc::now() - chrono::Duration::days(30);
        let claims = Claims {
            sub: s.user_id,
            role: s.role,
            company_id: s.company_id,
            company_name: s.company_name.clone(),
            company_slug: s.company_slug.clone(),
            exp: (past + chrono::Duration::days(7)).timestamp() as usize,
            iat: past.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("segredo".as_ref()),
        )
        .unwrap();

        assert!(matches!(
            decode_session(&token, "segredo"),
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn password_hash_and_verify() {
        // custo baixo apenas para o teste; produção usa BCRYPT_COST
        let hashed = hash_password("senha-secreta".to_string(), 4).await.unwrap();
        assert!(verify_password("senha-secreta".to_string(), hashed.clone())
            .await
            .unwrap());
        assert!(!verify_password("senha-errada".to_string(), hashed)
            .await
            .unwrap());
    }
}
