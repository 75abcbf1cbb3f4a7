//! Database models with SQLx `FromRow` derives

mod membership;

pub use membership::MembershipModel;
