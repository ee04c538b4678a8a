//! Roles and capabilities
//!
//! The role set is closed. Each workflow entry point asks for a
//! [`Capability`]; [`Role::has_capability`] is the single policy table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Director,
    #[serde(rename = "Marketing Manager")]
    MarketingManager,
    #[serde(rename = "Store Keeper")]
    StoreKeeper,
    #[serde(rename = "Printing Operator")]
    PrintingOperator,
    Cashier,
    Accountant,
}

/// Guarded workflow action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create and cancel sales orders
    ManageOrders,
    /// Create printing jobs
    SchedulePrintJobs,
    /// Move printing jobs through their statuses
    OperatePrinting,
    /// Issue invoices
    ManageInvoices,
    /// Record customer payments
    RecordPayments,
    /// Receive goods and report damage
    ReceiveStock,
    /// List damaged and reusable serials
    InspectDamage,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Director,
        Role::MarketingManager,
        Role::StoreKeeper,
        Role::PrintingOperator,
        Role::Cashier,
        Role::Accountant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Director => "Director",
            Self::MarketingManager => "Marketing Manager",
            Self::StoreKeeper => "Store Keeper",
            Self::PrintingOperator => "Printing Operator",
            Self::Cashier => "Cashier",
            Self::Accountant => "Accountant",
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        use Role::*;
        match capability {
            Capability::ManageOrders => matches!(self, Admin | Director | MarketingManager),
            Capability::SchedulePrintJobs => matches!(self, Admin | Director),
            Capability::OperatePrinting => matches!(self, Admin | Director | PrintingOperator),
            Capability::ManageInvoices => matches!(self, Admin | Director | MarketingManager),
            Capability::RecordPayments => matches!(self, Admin | Director | Cashier),
            Capability::ReceiveStock => matches!(self, Admin | StoreKeeper),
            Capability::InspectDamage => matches!(self, Admin | Director | StoreKeeper),
        }
    }

    /// Cancelling after serials were printed writes stock off as damaged.
    pub fn can_cancel_after_print(&self) -> bool {
        matches!(self, Role::Admin | Role::Director | Role::MarketingManager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown role name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRole(trimmed.to_string()))
    }
}

/// Authenticated caller of a workflow operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.has_capability(capability)
    }
}
