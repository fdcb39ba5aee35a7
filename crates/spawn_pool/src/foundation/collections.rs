//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to an object living in a [`HandleMap`]
    pub struct ObjectId;

    /// Stable handle to a grouping container
    pub struct ContainerId;
}

/// Handle-based map using slot map for stable references
///
/// Removed slots bump their generation, so stale handles never alias a
/// newer object.
pub type HandleMap<K, T> = SlotMap<K, T>;
