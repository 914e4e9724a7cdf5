use super::*;

pub(crate) const MINUS_BUTTON_REF: &str = "minusButton";
pub(crate) const PLUS_BUTTON_REF: &str = "plusButton";
pub(crate) const QUANTITY_INPUT_REF: &str = "quantityInput";

/// A widget element upgraded into a live control: its policy plus the
/// resolved `ref` elements the handlers read and write.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ControlBinding {
    pub(crate) root: NodeId,
    pub(crate) policy: QuantityPolicy,
    pub(crate) minus_button: NodeId,
    pub(crate) plus_button: NodeId,
    pub(crate) quantity_input: NodeId,
}

/// One interaction event delivered to a step handler. Handlers ignore the
/// event unless the target is a concrete interactive element, and mark the
/// default action suppressed before touching any state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepEvent {
    pub(crate) target: Option<NodeId>,
    pub(crate) default_prevented: bool,
}

impl StepEvent {
    pub(crate) fn targeting(node: NodeId) -> Self {
        Self {
            target: Some(node),
            default_prevented: false,
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Change notification emitted once per successful step or direct edit,
/// after the input's value has been written. The host page's line-item
/// component interprets `value == 0` as "remove this line"; this crate only
/// records the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityChange {
    pub control: String,
    pub value: i64,
}

pub(crate) fn resolve_binding(
    dom: &Dom,
    root: NodeId,
    policy: QuantityPolicy,
) -> Result<ControlBinding> {
    Ok(ControlBinding {
        root,
        policy,
        minus_button: resolve_ref(dom, root, MINUS_BUTTON_REF)?,
        plus_button: resolve_ref(dom, root, PLUS_BUTTON_REF)?,
        quantity_input: resolve_ref(dom, root, QUANTITY_INPUT_REF)?,
    })
}

fn resolve_ref(dom: &Dom, root: NodeId, name: &str) -> Result<NodeId> {
    dom.descendants(root)
        .into_iter()
        .find(|node| dom.attr(*node, "ref").map(|r| r == name).unwrap_or(false))
        .ok_or_else(|| {
            Error::SelectorNotFound(format!(
                "[ref={name}] inside <{}>",
                dom.tag_name(root).unwrap_or("?")
            ))
        })
}

/// Reads the control's live state back from the DOM. The numeric input owns
/// `value`/`min`/`max`/`step`; the widget root carries the host page's
/// `data-cart-quantity` context. Absent attributes fall back to defaults;
/// non-integer text is the one error a step can surface.
pub(crate) fn current_values(dom: &Dom, binding: &ControlBinding) -> Result<CurrentValues> {
    let value = control::parse_quantity_field("value", dom.value(binding.quantity_input)?)?;
    let min = match dom.attr(binding.quantity_input, "min") {
        Some(raw) => control::parse_quantity_field("min", raw)?,
        None => CurrentValues::DEFAULT_MIN,
    };
    let max = match dom.attr(binding.quantity_input, "max") {
        Some(raw) => Some(control::parse_quantity_field("max", raw)?),
        None => None,
    };
    let step = match dom.attr(binding.quantity_input, "step") {
        Some(raw) => control::parse_quantity_field("step", raw)?,
        None => CurrentValues::DEFAULT_STEP,
    };
    if step <= 0 {
        return Err(Error::MalformedNumber {
            field: "step".into(),
            raw: step.to_string(),
        });
    }
    let cart_quantity_already_present = match dom.attr(binding.root, "data-cart-quantity") {
        Some(raw) => control::parse_quantity_field("data-cart-quantity", raw)?,
        None => 0,
    };
    Ok(CurrentValues {
        value,
        min,
        max,
        step,
        cart_quantity_already_present,
    })
}

pub(crate) fn control_name(dom: &Dom, binding: &ControlBinding) -> String {
    dom.attr(binding.root, "id")
        .map(str::to_string)
        .unwrap_or_else(|| dom.tag_name(binding.root).unwrap_or("?").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: &str = r#"
        <cart-quantity-selector id="line-9" data-cart-quantity="4">
          <button ref="minusButton">-</button>
          <input ref="quantityInput" value="2" min="0" max="8" step="2">
          <button ref="plusButton">+</button>
        </cart-quantity-selector>
        "#;

    #[test]
    fn resolves_refs_and_reads_values() -> Result<()> {
        let dom = dom::parse_html(WIDGET)?;
        let root = dom.select_one("#line-9")?;
        let binding = resolve_binding(&dom, root, QuantityPolicy::CartTotal)?;
        let values = current_values(&dom, &binding)?;
        assert_eq!(
            values,
            CurrentValues {
                value: 2,
                min: 0,
                max: Some(8),
                step: 2,
                cart_quantity_already_present: 4,
            }
        );
        assert_eq!(control_name(&dom, &binding), "line-9");
        Ok(())
    }

    #[test]
    fn missing_ref_fails_mounting() -> Result<()> {
        let dom = dom::parse_html(
            r#"
            <cart-quantity-selector id="broken">
              <button ref="minusButton">-</button>
              <input ref="quantityInput" value="1">
            </cart-quantity-selector>
            "#,
        )?;
        let root = dom.select_one("#broken")?;
        match resolve_binding(&dom, root, QuantityPolicy::CartTotal) {
            Err(Error::SelectorNotFound(selector)) => {
                assert!(selector.contains(PLUS_BUTTON_REF), "selector: {selector}");
            }
            other => panic!("expected missing ref error, got: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn absent_attributes_fall_back_to_defaults() -> Result<()> {
        let dom = dom::parse_html(
            r#"
            <quantity-selector>
              <button ref="minusButton">-</button>
              <input ref="quantityInput" value="7">
              <button ref="plusButton">+</button>
            </quantity-selector>
            "#,
        )?;
        let root = dom.select_one("quantity-selector")?;
        let binding = resolve_binding(&dom, root, QuantityPolicy::AddToCart)?;
        let values = current_values(&dom, &binding)?;
        assert_eq!(values.min, 0);
        assert_eq!(values.max, None);
        assert_eq!(values.step, 1);
        assert_eq!(values.cart_quantity_already_present, 0);
        assert_eq!(control_name(&dom, &binding), "quantity-selector");
        Ok(())
    }

    #[test]
    fn non_positive_step_is_malformed() -> Result<()> {
        let dom = dom::parse_html(
            r#"
            <quantity-selector id="q">
              <button ref="minusButton">-</button>
              <input ref="quantityInput" value="1" step="0">
              <button ref="plusButton">+</button>
            </quantity-selector>
            "#,
        )?;
        let root = dom.select_one("#q")?;
        let binding = resolve_binding(&dom, root, QuantityPolicy::AddToCart)?;
        match current_values(&dom, &binding) {
            Err(Error::MalformedNumber { field, .. }) => assert_eq!(field, "step"),
            other => panic!("expected malformed step, got: {other:?}"),
        }
        Ok(())
    }
}
