//! Core data model types for pulse_registry

mod merchant;
mod pincode;

pub use merchant::MerchantId;
pub use pincode::Pincode;
