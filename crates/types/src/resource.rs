//! Schema trait shared by all stored entities.
//!
//! The generic repository is parameterized over this trait instead of
//! dispatching on runtime metadata: each entity declares its key prefix,
//! parent relationship, unique field, and writable fields at the type level.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Schema contract for a persisted entity.
///
/// Key layout produced from these declarations:
/// - `{key_prefix}:{id}` → serialized entity
/// - `{key_prefix}:{parent_prefix}:{parent_id}:{id}` → entity ID (listing index)
/// - `{key_prefix}:{unique_prefix}:{value}` → entity ID (uniqueness index)
pub trait Resource:
    Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static
{
    /// Human-readable kind, used in error messages (e.g., `"project"`)
    const KIND: &'static str;

    /// Storage key prefix for primary records
    fn key_prefix() -> &'static str;

    /// Storage key prefix for the parent listing index (e.g., `"user"`)
    fn parent_prefix() -> &'static str;

    /// Primary ID
    fn id(&self) -> i64;

    /// Parent ID, if this entity is currently attached to a parent
    fn parent_id(&self) -> Option<i64>;

    /// Reattach or detach the parent reference
    fn set_parent_id(&mut self, parent_id: Option<i64>);

    /// Prefix for the uniqueness index, if the entity has a unique field
    fn unique_prefix() -> Option<&'static str> {
        None
    }

    /// Current value of the unique field, if any
    fn unique_value(&self) -> Option<String> {
        None
    }

    /// Field names a patch request may set
    fn writable_fields() -> &'static [&'static str];

    /// Writable fields stored as one delimited string but exposed to the
    /// API as JSON string arrays
    fn list_fields() -> &'static [&'static str] {
        &[]
    }

    /// Bump `updated_at` to now
    fn touch(&mut self);

    /// Validate field-level invariants
    fn validate(&self) -> Result<()>;

    /// Order a listing before returning it (default: storage order)
    fn sort_listing(_items: &mut [Self]) {}
}
