use crate::academic::EntityKind;

/// Returns the cache key for a single entity: `"<kind>:<id>"`.
///
/// # Examples
///
/// ```
/// use academia_core::academic::EntityKind;
/// use academia_core::cache::entity_key;
///
/// assert_eq!(entity_key(EntityKind::Faculty, 12), "faculty:12");
/// ```
pub fn entity_key(kind: EntityKind, id: i64) -> String {
    format!("{}:{}", kind.as_str(), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_per_kind() {
        assert_eq!(entity_key(EntityKind::University, 1), "university:1");
        assert_eq!(entity_key(EntityKind::Faculty, 25), "faculty:25");
        assert_eq!(entity_key(EntityKind::Specialty, 300), "specialty:300");
    }

    #[test]
    fn test_keys_are_namespaced_by_kind() {
        // Same numeric identity in different tables must not collide.
        assert_ne!(
            entity_key(EntityKind::University, 7),
            entity_key(EntityKind::Faculty, 7)
        );
        assert_ne!(
            entity_key(EntityKind::Faculty, 7),
            entity_key(EntityKind::Specialty, 7)
        );
    }
}
