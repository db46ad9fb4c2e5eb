use super::types::ComponentDefinition;
use serde_json::Value;
use std::borrow::Cow;

/// Walk `reference` (e.g. `#/components/schemas/Pet`) through `root`.
///
/// The leading `#` (or empty) segment is discarded; every other segment is a
/// key lookup. JSON-pointer escapes (`~1`, `~0`) are honoured. Returns `None`
/// as soon as a segment is missing.
#[must_use]
pub fn resolve_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let mut segments = reference.split('/');
    match segments.next() {
        Some("#") | Some("") => {}
        _ => return None,
    }
    segments.try_fold(root, |node, segment| {
        node.as_object()?.get(unescape(segment).as_ref())
    })
}

fn unescape(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Lookup-only view of the contract's reusable definitions.
///
/// Components are never expanded in place, so self-referencing or mutually
/// referencing schemas cost nothing until a value actually descends into them.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRegistry<'a> {
    root: &'a Value,
}

impl<'a> SchemaRegistry<'a> {
    #[must_use]
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<&'a Value> {
        resolve_ref(self.root, reference)
    }

    /// Resolve `reference` into a component definition (must be an object node).
    #[must_use]
    pub fn component(&self, reference: &str) -> Option<ComponentDefinition<'a>> {
        self.resolve(reference).and_then(ComponentDefinition::new)
    }
}
