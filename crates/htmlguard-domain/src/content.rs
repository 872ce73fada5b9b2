//! Capabilities the content repository exposes to policies.

/// Declared value type of a property definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Long,
    Double,
    Decimal,
    Boolean,
    Date,
    Binary,
    Reference,
    Other,
}

/// Editor widget a property definition is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    RichText,
    SmallText,
    TextArea,
    Choicelist,
    Other,
}

/// The `(declared type, selector)` pair describing a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyKind {
    pub declared_type: ValueType,
    pub selector: Selector,
}

impl PropertyKind {
    pub const RICH_TEXT: PropertyKind = PropertyKind {
        declared_type: ValueType::String,
        selector: Selector::RichText,
    };

    pub fn new(declared_type: ValueType, selector: Selector) -> Self {
        Self {
            declared_type,
            selector,
        }
    }

    /// Only string properties edited through the rich-text selector carry markup.
    pub fn is_rich_text(&self) -> bool {
        self.declared_type == ValueType::String && self.selector == Selector::RichText
    }
}

/// A resolved content node, as seen by scope matching.
pub trait ContentNode {
    /// True when the node is of `node_type`, directly or through inheritance or mixins.
    fn has_type(&self, node_type: &str) -> bool;

    /// Kind of the named property, or `None` when the node has no definition for it.
    fn property_kind(&self, property: &str) -> Option<PropertyKind>;

    /// Whether the acting principal holds `permission` on this node.
    fn has_permission(&self, _permission: &str) -> bool {
        false
    }
}

impl<T: ContentNode + ?Sized> ContentNode for &T {
    fn has_type(&self, node_type: &str) -> bool {
        (**self).has_type(node_type)
    }

    fn property_kind(&self, property: &str) -> Option<PropertyKind> {
        (**self).property_kind(property)
    }

    fn has_permission(&self, permission: &str) -> bool {
        (**self).has_permission(permission)
    }
}
