//! Administrative capability gate
//!
//! Admin-only mutations (currency registration, swap activation, admin
//! handover) take an [`AdminCap`] argument. The only way to obtain one is
//! [`AdminGate::authorize`], so the check and the mutation it guards always
//! happen within the same call.

use core_kernel::HolderId;

use crate::error::CoverError;

/// Proof that the caller of the current operation is the admin
#[derive(Debug)]
pub struct AdminCap {
    holder: HolderId,
}

impl AdminCap {
    /// The admin this capability was issued to
    pub fn holder(&self) -> HolderId {
        self.holder
    }
}

/// Holds the admin identity and issues capabilities
#[derive(Debug, Clone)]
pub struct AdminGate {
    admin: HolderId,
}

impl AdminGate {
    pub fn new(admin: HolderId) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> HolderId {
        self.admin
    }

    /// Issues a capability if `caller` is the admin
    pub fn authorize(&self, caller: HolderId, action: &'static str) -> Result<AdminCap, CoverError> {
        if caller != self.admin {
            return Err(CoverError::unauthorized(caller, action));
        }
        Ok(AdminCap { holder: caller })
    }

    /// Hands the admin role to another holder
    pub fn transfer(&mut self, cap: AdminCap, new_admin: HolderId) -> HolderId {
        let previous = cap.holder;
        self.admin = new_admin;
        previous
    }
}
