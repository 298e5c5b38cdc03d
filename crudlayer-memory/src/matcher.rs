//! Equality filter evaluation for in-memory documents.

use bson::{Bson, Document};

/// Returns `true` when every `key: value` pair of `filter` equals the value found in
/// `document` at that key. Keys may address nested documents with dots (`"address.city"`).
///
/// An empty filter matches every document.
pub(crate) fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| lookup(document, key) == Some(expected))
}

fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = current.as_document()?.get(segment)?;
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn equality_on_top_level_fields() {
        let id = ObjectId::new();
        let document = doc! { "_id": id, "name": "Ada", "age": 36 };

        assert!(matches(&document, &doc! { "_id": id }));
        assert!(matches(&document, &doc! { "name": "Ada" }));
        assert!(matches(&document, &doc! {}));
        assert!(!matches(&document, &doc! { "name": "Grace" }));
        assert!(!matches(&document, &doc! { "missing": "x" }));
    }

    #[test]
    fn values_must_match_in_type() {
        let document = doc! { "age": 36 };
        assert!(!matches(&document, &doc! { "age": "36" }));
    }

    #[test]
    fn dotted_paths_reach_nested_documents() {
        let document = doc! { "address": { "city": "London" } };

        assert!(matches(&document, &doc! { "address.city": "London" }));
        assert!(!matches(&document, &doc! { "address.city.zip": "N1" }));
    }
}
