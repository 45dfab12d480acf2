//! One handler system per event kind. The runner selects the handler with a
//! run condition on [crate::clock::CurrentEvent]; each handler also checks
//! the kind itself so it can be run alone in tests.

pub mod arrival;
pub mod free_room;
pub mod tick;
pub mod timeout;
pub mod treated;
pub mod triage;
