//! Role and ownership guards
//!
//! Pure pass-through checks: each returns the identity unchanged on success
//! so it can sit in front of any handler.

use crate::models::{Product, Review, UserRole};

use super::{AuthError, ForbiddenReason};

/// Anything the guards can authorize
pub trait Identity {
    fn user_id(&self) -> i64;
    fn role(&self) -> UserRole;
}

impl<T: Identity + ?Sized> Identity for &T {
    fn user_id(&self) -> i64 {
        (**self).user_id()
    }

    fn role(&self) -> UserRole {
        (**self).role()
    }
}

/// A resource with a single owning user
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Product {
    fn owner_id(&self) -> i64 {
        self.seller_id
    }
}

impl Owned for Review {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// Whether `held` satisfies `required`
///
/// Roles are disjoint: admin does not imply seller or buyer.
fn role_matches(held: UserRole, required: UserRole) -> bool {
    match (held, required) {
        (UserRole::Buyer, UserRole::Buyer) => true,
        (UserRole::Seller, UserRole::Seller) => true,
        (UserRole::Admin, UserRole::Admin) => true,
        (UserRole::Buyer, _) | (UserRole::Seller, _) | (UserRole::Admin, _) => false,
    }
}

/// Fail with `Forbidden` unless the identity holds `required`
pub fn require_role<I: Identity>(identity: I, required: UserRole) -> Result<I, AuthError> {
    if role_matches(identity.role(), required) {
        Ok(identity)
    } else {
        tracing::warn!(
            user_id = identity.user_id(),
            role = %identity.role(),
            required = %required,
            "Role check failed"
        );
        Err(AuthError::Forbidden(ForbiddenReason::Role(required)))
    }
}

pub fn require_admin<I: Identity>(identity: I) -> Result<I, AuthError> {
    require_role(identity, UserRole::Admin)
}

pub fn require_seller<I: Identity>(identity: I) -> Result<I, AuthError> {
    require_role(identity, UserRole::Seller)
}

pub fn require_buyer<I: Identity>(identity: I) -> Result<I, AuthError> {
    require_role(identity, UserRole::Buyer)
}

/// Fail with `Forbidden` unless the identity owns the resource
pub fn require_owner<'a, R: Owned, I: Identity>(
    resource: &R,
    identity: &'a I,
) -> Result<&'a I, AuthError> {
    if resource.owner_id() == identity.user_id() {
        Ok(identity)
    } else {
        tracing::warn!(
            user_id = identity.user_id(),
            owner_id = resource.owner_id(),
            "Ownership check failed"
        );
        Err(AuthError::Forbidden(ForbiddenReason::Ownership))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestIdentity {
        id: i64,
        role: UserRole,
    }

    impl Identity for TestIdentity {
        fn user_id(&self) -> i64 {
            self.id
        }

        fn role(&self) -> UserRole {
            self.role
        }
    }

    struct Thing(i64);

    impl Owned for Thing {
        fn owner_id(&self) -> i64 {
            self.0
        }
    }

    const ROLES: [UserRole; 3] = [UserRole::Buyer, UserRole::Seller, UserRole::Admin];

    #[test]
    fn test_require_role_matrix() {
        for held in ROLES {
            for required in ROLES {
                let identity = TestIdentity { id: 7, role: held };
                let result = require_role(identity.clone(), required);

                if held == required {
                    assert_eq!(result.unwrap(), identity);
                } else {
                    assert!(matches!(
                        result,
                        Err(AuthError::Forbidden(ForbiddenReason::Role(r))) if r == required
                    ));
                }
            }
        }
    }

    #[test]
    fn test_named_guards() {
        let admin = TestIdentity {
            id: 1,
            role: UserRole::Admin,
        };
        assert!(require_admin(admin.clone()).is_ok());
        assert!(require_seller(admin.clone()).is_err());
        assert!(require_buyer(admin).is_err());

        let seller = TestIdentity {
            id: 2,
            role: UserRole::Seller,
        };
        assert!(require_seller(seller).is_ok());
    }

    #[test]
    fn test_require_owner() {
        let seller = TestIdentity {
            id: 5,
            role: UserRole::Seller,
        };

        assert!(require_owner(&Thing(5), &seller).is_ok());
        assert!(matches!(
            require_owner(&Thing(6), &seller),
            Err(AuthError::Forbidden(ForbiddenReason::Ownership))
        ));
    }
}
