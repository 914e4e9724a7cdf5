use super::*;

pub const QUANTITY_SELECTOR_TAG: &str = "quantity-selector";
pub const CART_QUANTITY_SELECTOR_TAG: &str = "cart-quantity-selector";

/// Tag-name registry for quantity components. Registration is idempotent:
/// defining an already-defined tag is a no-op, mirroring the
/// register-if-not-already-present guard host pages use.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    definitions: HashMap<String, QuantityPolicy>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the two stock components defined: the product-page
    /// selector (relative max) and the cart-page selector (absolute max).
    pub fn with_builtin_components() -> Self {
        let mut registry = Self::new();
        registry.define_if_absent(QUANTITY_SELECTOR_TAG, QuantityPolicy::AddToCart);
        registry.define_if_absent(CART_QUANTITY_SELECTOR_TAG, QuantityPolicy::CartTotal);
        registry
    }

    /// Returns true when the tag was newly defined, false when a definition
    /// was already present (the existing definition wins).
    pub fn define_if_absent(&mut self, tag: &str, policy: QuantityPolicy) -> bool {
        let key = tag.to_ascii_lowercase();
        match self.definitions.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(policy);
                true
            }
        }
    }

    pub fn policy_for(&self, tag: &str) -> Option<QuantityPolicy> {
        self.definitions.get(&tag.to_ascii_lowercase()).copied()
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(&tag.to_ascii_lowercase())
    }
}
