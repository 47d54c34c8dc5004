//! Authenticated principal
//!
//! Customers and staff live in separate account tables; a request carries
//! exactly one of them. Operations receive the principal explicitly instead of
//! looking up a session.

use shared::models::{Customer, PrincipalInfo, Role, StaffAccount};
use shared::{AppError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPrincipal {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffPrincipal {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Customer(CustomerPrincipal),
    Staff(StaffPrincipal),
}

impl From<Customer> for CustomerPrincipal {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
        }
    }
}

impl From<StaffAccount> for StaffPrincipal {
    fn from(account: StaffAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

impl Principal {
    pub fn id(&self) -> i64 {
        match self {
            Self::Customer(c) => c.id,
            Self::Staff(s) => s.id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Customer(_) => Role::Customer,
            Self::Staff(_) => Role::Staff,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff(_))
    }

    pub fn info(&self) -> PrincipalInfo {
        let (id, name, email) = match self {
            Self::Customer(c) => (c.id, &c.name, &c.email),
            Self::Staff(s) => (s.id, &s.name, &s.email),
        };
        PrincipalInfo {
            id,
            name: name.clone(),
            email: email.clone(),
            role: self.role(),
        }
    }

    /// The customer behind this request, or 403
    pub fn customer(&self) -> Result<&CustomerPrincipal, AppError> {
        match self {
            Self::Customer(c) => Ok(c),
            Self::Staff(_) => Err(AppError::new(ErrorCode::CustomerRequired)),
        }
    }

    /// The staff member behind this request, or 403
    pub fn staff(&self) -> Result<&StaffPrincipal, AppError> {
        match self {
            Self::Staff(s) => Ok(s),
            Self::Customer(_) => Err(AppError::new(ErrorCode::StaffRequired)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_accessors() {
        let customer = Principal::Customer(CustomerPrincipal {
            id: 3,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        });
        assert_eq!(customer.role(), Role::Customer);
        assert!(customer.customer().is_ok());
        assert_eq!(
            customer.staff().unwrap_err().code,
            ErrorCode::StaffRequired
        );

        let staff = Principal::Staff(StaffPrincipal {
            id: 1,
            name: "Chef".into(),
            email: "chef@example.com".into(),
        });
        assert!(staff.is_staff());
        assert_eq!(staff.info().role, Role::Staff);
        assert_eq!(staff.customer().unwrap_err().code, ErrorCode::CustomerRequired);
    }
}
