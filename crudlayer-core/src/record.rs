//! Core traits for records stored in a collection.
//!
//! A record is any serde-serializable value carrying exactly one identifier field of type
//! [`ObjectId`]. The identifier is always chosen by the caller; the store never generates one.

use bson::{Bson, Document, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{CrudError, CrudResult};

/// The nil identifier: twelve zero bytes.
pub const NIL_OBJECT_ID: ObjectId = ObjectId::from_bytes([0; 12]);

/// Trait that all records passed to a collection must implement.
///
/// Usually derived with `#[derive(Record)]` from the `crudlayer` crate, which picks the field
/// annotated `#[record(id)]` (or the field named `id`).
///
/// # Example
///
/// ```ignore
/// use crudlayer::{Record, bson::oid::ObjectId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct User {
///     #[serde(rename = "_id")]
///     pub id: ObjectId,
///     pub name: String,
/// }
///
/// impl Record for User {
///     fn id(&self) -> ObjectId { self.id }
///     fn set_id(&mut self, id: ObjectId) { self.id = id; }
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Returns this record's identifier.
    fn id(&self) -> ObjectId;

    /// Replaces this record's identifier.
    fn set_id(&mut self, id: ObjectId);

    /// Returns `true` when the identifier is not the nil sentinel.
    fn has_id(&self) -> bool {
        self.id() != NIL_OBJECT_ID
    }

    /// Assigns a freshly generated identifier if the current one is nil, and returns the
    /// identifier the record ends up with.
    fn ensure_id(&mut self) -> ObjectId {
        if !self.has_id() {
            self.set_id(ObjectId::new());
        }
        self.id()
    }
}

/// Conversion helpers between records and BSON documents.
///
/// Implemented for every [`Record`].
pub trait RecordExt: Record {
    /// Converts the record into the document sent to the store.
    ///
    /// The document always carries `_id` equal to [`Record::id`].
    ///
    /// # Errors
    ///
    /// [`CrudError::ValueNotStruct`] if the record does not serialize to a document.
    fn to_document(&self) -> CrudResult<Document>;

    /// Decodes a record from a stored document.
    fn from_document(document: Document) -> CrudResult<Self>;
}

impl<R: Record> RecordExt for R {
    fn to_document(&self) -> CrudResult<Document> {
        let mut document = match serialize_to_bson(self)? {
            Bson::Document(document) => document,
            _ => return Err(CrudError::ValueNotStruct),
        };

        if !document.contains_key("_id") {
            document.insert("_id", self.id());
        }

        Ok(document)
    }

    fn from_document(document: Document) -> CrudResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(document))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serializer};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(rename = "_id")]
        id: ObjectId,
        body: String,
    }

    impl Record for Note {
        fn id(&self) -> ObjectId {
            self.id
        }

        fn set_id(&mut self, id: ObjectId) {
            self.id = id;
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    struct Bare {
        id: ObjectId,
    }

    impl Serialize for Bare {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.id.to_hex())
        }
    }

    impl Record for Bare {
        fn id(&self) -> ObjectId {
            self.id
        }

        fn set_id(&mut self, id: ObjectId) {
            self.id = id;
        }
    }

    #[test]
    fn nil_sentinel() {
        assert_eq!(NIL_OBJECT_ID.to_hex(), "000000000000000000000000");
        let note = Note { id: NIL_OBJECT_ID, body: String::new() };
        assert!(!note.has_id());
    }

    #[test]
    fn ensure_id_only_fills_nil() {
        let mut note = Note { id: NIL_OBJECT_ID, body: "hi".into() };
        let assigned = note.ensure_id();
        assert_ne!(assigned, NIL_OBJECT_ID);
        assert_eq!(note.ensure_id(), assigned);
    }

    #[test]
    fn document_conversion() {
        let note = Note { id: ObjectId::new(), body: "hello".into() };
        let document = note.to_document().unwrap();
        assert_eq!(document.get_object_id("_id").unwrap(), note.id);
        assert_eq!(Note::from_document(document).unwrap(), note);
    }

    #[test]
    fn scalar_record_is_not_struct() {
        let bare = Bare { id: ObjectId::new() };
        assert_eq!(bare.to_document(), Err(CrudError::ValueNotStruct));
    }
}
