//! Identity and equality filter construction.
//!
//! Lookups name a key and a string value. The keys `"_id"` and `"id"` address the document
//! identifier and the value is decoded as a 24-character hex [`ObjectId`]; any other key becomes
//! a literal equality match on that field.

use bson::{Document, doc, oid::ObjectId};

use crate::{
    error::{CrudError, CrudResult},
    record::NIL_OBJECT_ID,
};

/// How a lookup value that is not valid hex is treated when addressing the identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// Undecodable values fall back to the nil identifier, so the lookup simply finds nothing.
    #[default]
    Lenient,
    /// Undecodable values are rejected with [`CrudError::InvalidId`] before the store is queried.
    Strict,
}

/// Returns `true` when `key` addresses the document identifier.
pub fn is_identity_key(key: &str) -> bool {
    matches!(key, "_id" | "id")
}

/// Filter matching exactly the document with identifier `id`.
pub fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}

/// Builds the lookup filter for `by == value`.
///
/// # Errors
///
/// [`CrudError::InvalidId`] when `by` is an identity key, `value` is not valid hex and the
/// policy is [`IdPolicy::Strict`].
pub fn lookup_filter(by: &str, value: &str, policy: IdPolicy) -> CrudResult<Document> {
    if !is_identity_key(by) {
        return Ok(doc! { by: value });
    }

    let id = match (ObjectId::parse_str(value), policy) {
        (Ok(id), _) => id,
        (Err(_), IdPolicy::Lenient) => NIL_OBJECT_ID,
        (Err(_), IdPolicy::Strict) => return Err(CrudError::InvalidId(value.to_string())),
    };

    Ok(id_filter(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keys_decode_hex() {
        let id = ObjectId::new();

        for key in ["_id", "id"] {
            let filter = lookup_filter(key, &id.to_hex(), IdPolicy::Lenient).unwrap();
            assert_eq!(filter, doc! { "_id": id });
        }
    }

    #[test]
    fn other_keys_match_literally() {
        let filter = lookup_filter("email", "ada@example.com", IdPolicy::Strict).unwrap();
        assert_eq!(filter, doc! { "email": "ada@example.com" });

        let filter = lookup_filter("ID", "not-hex", IdPolicy::Strict).unwrap();
        assert_eq!(filter, doc! { "ID": "not-hex" });
    }

    #[test]
    fn lenient_malformed_hex_targets_nil() {
        let filter = lookup_filter("id", "definitely-not-hex", IdPolicy::Lenient).unwrap();
        assert_eq!(filter, doc! { "_id": NIL_OBJECT_ID });

        let filter = lookup_filter("_id", "", IdPolicy::default()).unwrap();
        assert_eq!(filter, doc! { "_id": NIL_OBJECT_ID });
    }

    #[test]
    fn strict_malformed_hex_is_rejected() {
        assert_eq!(
            lookup_filter("_id", "abc", IdPolicy::Strict),
            Err(CrudError::InvalidId("abc".into()))
        );
    }
}
