use super::*;

/// Live state of a mounted quantity selector, read back from the widget's
/// attributes and numeric input on every interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentValues {
    pub value: i64,
    pub min: i64,
    pub max: Option<i64>,
    pub step: i64,
    pub cart_quantity_already_present: i64,
}

impl CurrentValues {
    pub const DEFAULT_MIN: i64 = 0;
    pub const DEFAULT_STEP: i64 = 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStates {
    pub minus_disabled: bool,
    pub plus_disabled: bool,
}

/// Which reading of `max` a selector enforces.
///
/// `AddToCart` is the product-page reading: `max` bounds how many more units
/// may still be added on top of what the cart already holds. `CartTotal` is
/// the cart-page reading: `max` is the ceiling on the total quantity, and the
/// value may drop all the way to zero (zero means "remove this line item",
/// interpreted by the host page, not by this crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityPolicy {
    AddToCart,
    CartTotal,
}

impl QuantityPolicy {
    /// The upper bound enforced on the next step, after policy is applied.
    /// `None` means unbounded.
    pub fn effective_max(self, values: &CurrentValues) -> Option<i64> {
        match self {
            // Relative reading: how many more can be added. Floored at `min`
            // so an oversubscribed cart cannot drag the value below the
            // lower bound on the next increase.
            Self::AddToCart => values.max.map(|max| {
                max.saturating_sub(values.cart_quantity_already_present)
                    .max(values.min)
            }),
            // Absolute reading: the cart ceiling, verbatim.
            Self::CartTotal => values.max,
        }
    }

    /// Floor applied by a decrease step.
    pub fn lower_bound(self, values: &CurrentValues) -> i64 {
        match self {
            Self::AddToCart => values.min,
            Self::CartTotal => 0,
        }
    }

    pub fn button_states(self, values: &CurrentValues) -> ButtonStates {
        let minus_disabled = match self {
            Self::AddToCart => values.value <= values.min,
            // Cart buttons are always client-managed; the minus button is
            // disabled only at exactly zero.
            Self::CartTotal => values.value <= 0,
        };
        let plus_disabled = self
            .effective_max(values)
            .map(|limit| values.value >= limit)
            .unwrap_or(false);
        ButtonStates {
            minus_disabled,
            plus_disabled,
        }
    }

    pub fn apply_increase(self, values: &CurrentValues) -> i64 {
        let stepped = values.value.saturating_add(values.step);
        match self.effective_max(values) {
            Some(limit) => stepped.min(limit),
            None => stepped,
        }
    }

    pub fn apply_decrease(self, values: &CurrentValues) -> i64 {
        let floored = values
            .value
            .saturating_sub(values.step)
            .max(self.lower_bound(values));
        match self {
            // The base control never clamps a decrease from above; an
            // out-of-range value heals on the next increase instead.
            Self::AddToCart => floored,
            Self::CartTotal => match self.effective_max(values) {
                Some(limit) => floored.min(limit),
                None => floored,
            },
        }
    }
}

pub(crate) fn parse_quantity_field(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::MalformedNumber {
            field: field.to_string(),
            raw: raw.to_string(),
        })
}
