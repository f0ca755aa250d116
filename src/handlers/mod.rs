// handlers/mod.rs - Handler tiers
//
// Public (no session) → Protected (session resolved by middleware::require_session)
pub mod public;
pub mod protected;
