pub mod seen;

pub use seen::SeenIdSet;
