//! Merchant and buyer operations on a registry
//!
//! Every operation takes the registry explicitly; there is no ambient
//! registry instance.

mod maintenance;

pub use maintenance::{
    add_merchant, add_pincode, is_serviceable, merchants_for, remove_merchant,
    remove_merchant_in_universe, remove_pincode, update_merchant, update_pincode,
};
