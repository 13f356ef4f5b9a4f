// src/services/policy.rs
//
// Núcleo de autorização: funções puras, sem efeito colateral, chamadas
// em toda fronteira de acesso a dados. Uma única tabela estática governa
// tanto a visibilidade do menu quanto a aplicação no servidor.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, Session},
};

/// Seções administrativas / recursos do sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Companies,
    Administrators,
    Audit,
    Categories,
    Customers,
    Financials,
    Orders,
    Products,
    Reports,
    Users,
}

pub const ALL_RESOURCES: [Resource; 10] = [
    Resource::Companies,
    Resource::Administrators,
    Resource::Audit,
    Resource::Categories,
    Resource::Customers,
    Resource::Financials,
    Resource::Orders,
    Resource::Products,
    Resource::Reports,
    Resource::Users,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    Read,
    Create,
    Update,
}

/// Gate grosso por lista de papéis. ADMINISTRADOR passa em qualquer checagem.
pub fn has_permission(role: Role, allowed: &[Role]) -> bool {
    role == Role::Administrador || allowed.contains(&role)
}

/// Tabela fina (papel, recurso, ação). Fonte única de verdade para o
/// menu administrativo e para a aplicação no servidor.
pub fn role_allows(role: Role, resource: Resource, action: ResourceAction) -> bool {
    use Resource::*;
    use ResourceAction::*;

    if role == Role::Administrador {
        return true;
    }

    match (role, resource) {
        // SUB_MASTER: atua entre tenants, mas só sobre empresas,
        // administradores e auditoria.
        (Role::SubMaster, Companies | Administrators) => true,
        (Role::SubMaster, Audit) => matches!(action, Read),

        // MASTER_DIST: dono do tenant, controle total dentro dele.
        (Role::MasterDist, Companies) => matches!(action, Read | Update),
        (Role::MasterDist, Administrators) => false,
        (Role::MasterDist, Audit | Reports) => matches!(action, Read),
        (Role::MasterDist, _) => true,

        // FINANCEIRO: visão financeira do tenant.
        (Role::Financeiro, Financials) => true,
        (Role::Financeiro, Orders | Reports) => matches!(action, Read),

        // LEITURA: somente leitura de relatórios e cadastros.
        (
            Role::Leitura,
            Categories | Customers | Orders | Products | Reports,
        ) => matches!(action, Read),

        _ => false,
    }
}

/// Seções que o papel pode navegar; alimenta o menu do painel.
pub fn accessible_sections(role: Role) -> Vec<Resource> {
    ALL_RESOURCES
        .into_iter()
        .filter(|r| role_allows(role, *r, ResourceAction::Read))
        .collect()
}

/// Filtro de tenant para consultas: `None` libera tudo (papéis de
/// plataforma), senão restringe à empresa da sessão. Nunca confiar em
/// company_id vindo do cliente para escopo de leitura.
pub fn company_filter(session: &Session) -> Option<Uuid> {
    if session.role.is_platform_wide() {
        None
    } else {
        session.company_id
    }
}

/// Empresa a carimbar em um registro novo. Papéis de plataforma devem
/// sempre indicar a empresa explicitamente; sessões presas a um tenant
/// só podem carimbar a própria empresa, e um id estranho responde
/// NotFound sem confirmar que a empresa existe.
pub fn company_id_for_create(
    session: &Session,
    explicit: Option<Uuid>,
) -> Result<Uuid, AppError> {
    match explicit {
        Some(id) => {
            if can_access_company(company_filter(session), id) {
                Ok(id)
            } else {
                Err(AppError::NotFound("Empresa"))
            }
        }
        None => session.company_id.ok_or(AppError::MissingCompanyId),
    }
}

/// Autoriza operações sobre entidades já presas a uma empresa (ex.:
/// upload de imagem de um produto existente).
pub fn can_access_company(user_company_id: Option<Uuid>, target_company_id: Uuid) -> bool {
    match user_company_id {
        None => true,
        Some(id) => id == target_company_id,
    }
}

/// Versão `Result` de `role_allows`, para uso direto nos serviços.
pub fn require(session: &Session, resource: Resource, action: ResourceAction) -> Result<(), AppError> {
    if role_allows(session.role, resource, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role, company_id: Option<Uuid>) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role,
            company_id,
            company_name: "Bebidas Sul".to_string(),
            company_slug: "bebidas-sul".to_string(),
        }
    }

    #[test]
    fn administrador_passes_every_check() {
        assert!(has_permission(Role::Administrador, &[]));
        for resource in ALL_RESOURCES {
            assert!(role_allows(Role::Administrador, resource, ResourceAction::Create));
        }
    }

    #[test]
    fn leitura_cannot_create_categories() {
        assert!(!role_allows(Role::Leitura, Resource::Categories, ResourceAction::Create));
        assert!(role_allows(Role::Leitura, Resource::Categories, ResourceAction::Read));

        let s = session(Role::Leitura, Some(Uuid::new_v4()));
        assert!(matches!(
            require(&s, Resource::Categories, ResourceAction::Create),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn master_dist_owns_tenant_resources() {
        assert!(role_allows(Role::MasterDist, Resource::Categories, ResourceAction::Create));
        assert!(role_allows(Role::MasterDist, Resource::Orders, ResourceAction::Update));
        assert!(role_allows(Role::MasterDist, Resource::Users, ResourceAction::Create));
        // mas não administra outros tenants nem cria empresas
        assert!(!role_allows(Role::MasterDist, Resource::Companies, ResourceAction::Create));
        assert!(!role_allows(Role::MasterDist, Resource::Administrators, ResourceAction::Read));
    }

    #[test]
    fn financeiro_reads_orders_but_does_not_touch_catalog() {
        assert!(role_allows(Role::Financeiro, Resource::Financials, ResourceAction::Create));
        assert!(role_allows(Role::Financeiro, Resource::Orders, ResourceAction::Read));
        assert!(!role_allows(Role::Financeiro, Resource::Orders, ResourceAction::Update));
        assert!(!role_allows(Role::Financeiro, Resource::Products, ResourceAction::Read));
    }

    #[test]
    fn company_filter_is_open_for_platform_roles_only() {
        let company = Uuid::new_v4();
        assert_eq!(company_filter(&session(Role::Administrador, None)), None);
        assert_eq!(company_filter(&session(Role::SubMaster, None)), None);
        assert_eq!(
            company_filter(&session(Role::MasterDist, Some(company))),
            Some(company)
        );
        assert_eq!(
            company_filter(&session(Role::Leitura, Some(company))),
            Some(company)
        );
    }

    #[test]
    fn create_stamp_defaults_to_session_company() {
        let own = Uuid::new_v4();
        let s = session(Role::MasterDist, Some(own));
        assert_eq!(company_id_for_create(&s, None).unwrap(), own);
        assert_eq!(company_id_for_create(&s, Some(own)).unwrap(), own);
    }

    #[test]
    fn tenant_session_cannot_stamp_foreign_company() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let s = session(Role::MasterDist, Some(own));
        assert!(matches!(
            company_id_for_create(&s, Some(other)),
            Err(AppError::NotFound(_))
        ));
        // Papéis de plataforma seguem livres para indicar qualquer empresa.
        let p = session(Role::SubMaster, None);
        assert_eq!(company_id_for_create(&p, Some(other)).unwrap(), other);
    }

    #[test]
    fn platform_create_without_company_is_a_configuration_error() {
        let s = session(Role::Administrador, None);
        assert!(matches!(
            company_id_for_create(&s, None),
            Err(AppError::MissingCompanyId)
        ));
        assert!(company_id_for_create(&s, Some(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn can_access_company_allows_platform_and_same_tenant() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(can_access_company(None, a));
        assert!(can_access_company(Some(a), a));
        assert!(!can_access_company(Some(a), b));
    }

    #[test]
    fn menu_sections_follow_the_same_table() {
        let leitura = accessible_sections(Role::Leitura);
        assert!(leitura.contains(&Resource::Reports));
        assert!(!leitura.contains(&Resource::Financials));
        assert_eq!(accessible_sections(Role::Administrador).len(), ALL_RESOURCES.len());
    }
}
