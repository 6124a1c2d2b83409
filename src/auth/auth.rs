use crate::error::AnalyticsError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

/// Caller identity, placed in request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub company_id: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ErrorUnauthorized("Missing token"))),
        }
    }
}

impl AuthUser {
    pub fn require_company(&self, company_id: &str) -> Result<(), AnalyticsError> {
        if self.company_id == company_id {
            Ok(())
        } else {
            Err(AnalyticsError::Forbidden)
        }
    }

    /// Employees may read their own insights; owners, admins and managers
    /// may read anyone's in their company.
    pub fn require_insight_access(
        &self,
        company_id: &str,
        employee_id: &str,
    ) -> Result<(), AnalyticsError> {
        self.require_company(company_id)?;
        if self.user_id == employee_id || self.role.can_review_employees() {
            Ok(())
        } else {
            Err(AnalyticsError::Forbidden)
        }
    }
}
