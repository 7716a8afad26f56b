//! Domain records supplied by the caller, lookup indexes, and CSV loading
//!
//! Records are read-only inputs: no analyzer mutates them.

mod policy;
mod commission;
mod expense;
mod index;
pub mod loader;

pub use policy::{Policy, PolicyStatus, ProductType, ClientSnapshot, UNKNOWN};
pub use commission::{Commission, CommissionStatus, DEFAULT_ADVANCE_MONTHS};
pub use expense::{Expense, UNCATEGORIZED};
pub use index::{Carrier, CarrierDirectory, CommissionIndex, PolicyIndex};
pub use loader::{
    load_policies, load_policies_from_reader, load_commissions, load_commissions_from_reader,
    load_expenses, load_expenses_from_reader, load_carriers,
};
