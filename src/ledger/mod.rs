//! Event statement domain model.

pub mod event;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod lines;
pub mod share;

pub use event::EventInfo;
pub use ledger::{
    EventLedger, DEFAULT_PARTNER_NAME, EVENT_DATE_FORMAT, TEMPLATE_EVENT_NAME, TEMPLATE_LOCATION,
};
pub use lines::{ExpenseLine, ExpenseSummary, RevenueLine};
pub use share::ProfitShare;
