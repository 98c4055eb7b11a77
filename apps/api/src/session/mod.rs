// Per-session conversation state: log, usage counters, checklists, profile.
// State transitions go through accounting::reduce; store only locks and applies.

pub mod accounting;
pub mod handlers;
pub mod models;
pub mod store;
