use super::*;

/// Host-page harness: parses a fragment, upgrades registered widget tags
/// into live controls, and exposes the interaction surface tests drive.
#[derive(Debug)]
pub struct Harness {
    pub(crate) dom: Dom,
    pub(crate) registry: ComponentRegistry,
    pub(crate) controls: Vec<ControlBinding>,
    pub(crate) change_events: Vec<QuantityChange>,
    pub(crate) trace: bool,
    pub(crate) trace_logs: Vec<String>,
    pub(crate) trace_log_limit: usize,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_registry(html, ComponentRegistry::with_builtin_components())
    }

    pub fn from_html_with_registry(html: &str, registry: ComponentRegistry) -> Result<Self> {
        let dom = dom::parse_html(html)?;

        let mut controls = Vec::new();
        for node in dom.descendants(dom.root()) {
            let Some(tag) = dom.tag_name(node) else {
                continue;
            };
            if let Some(policy) = registry.policy_for(tag) {
                controls.push(component::resolve_binding(&dom, node, policy)?);
            }
        }

        Ok(Self {
            dom,
            registry,
            controls,
            change_events: Vec::new(),
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
        })
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidArgument(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    /// Drains the change notifications recorded since the last call, in
    /// dispatch order.
    pub fn take_change_events(&mut self) -> Vec<QuantityChange> {
        std::mem::take(&mut self.change_events)
    }

    /// Clicks the element addressed by `selector`. Disabled elements swallow
    /// the click; otherwise a step event targeting the element is routed to
    /// the owning control's handler, minus or plus depending on which button
    /// subtree the target sits in.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let Some(index) = self.control_index_for(target) else {
            return Ok(());
        };

        let mut event = StepEvent::targeting(target);
        let binding = self.controls[index];
        if self.dom.is_ancestor_or_self(binding.minus_button, target) {
            self.decrease_quantity(index, &mut event)?;
        } else if self.dom.is_ancestor_or_self(binding.plus_button, target) {
            self.increase_quantity(index, &mut event)?;
        }

        // A handled step prevents the button's default form submission;
        // anything else falls through with no default action to run.
        if !event.default_prevented {
            self.push_trace(format!("click {selector} fell through"));
        }
        Ok(())
    }

    /// Delivers a named step event directly to the control owning the
    /// target, bypassing the disabled-attribute guard the way a synthetic
    /// event dispatch does. Unknown event names find no listener and are a
    /// no-op.
    pub fn dispatch(&mut self, selector: &str, event_name: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        let Some(index) = self.control_index_for(target) else {
            return Ok(());
        };

        let mut event = StepEvent::targeting(target);
        match event_name {
            "increase" => self.increase_quantity(index, &mut event),
            "decrease" => self.decrease_quantity(index, &mut event),
            _ => Ok(()),
        }
    }

    /// Direct numeric-field edit. The raw text is always written, without
    /// correction. Only text that parses as an integer counts as a
    /// successful edit: it is announced and button states refresh; anything
    /// else sits in the field until the next step surfaces it as malformed.
    pub fn set_value(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        self.dom.set_value(target, text)?;

        let Some(index) = self.control_index_for(target) else {
            return Ok(());
        };
        let binding = self.controls[index];
        if target != binding.quantity_input {
            return Ok(());
        }

        if let Ok(new_value) = control::parse_quantity_field("value", text) {
            self.on_quantity_change(index, new_value);
            self.update_button_states(index)?;
        }
        Ok(())
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.dom.select_one(selector)?;
        Ok(self.dom.value(target)?.to_string())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let actual = self.value(selector)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }

    pub fn assert_disabled(&self, selector: &str) -> Result<()> {
        self.assert_disabled_state(selector, true)
    }

    pub fn assert_enabled(&self, selector: &str) -> Result<()> {
        self.assert_disabled_state(selector, false)
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.dom.select_one(selector).map(|_| ())
    }

    fn assert_disabled_state(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        let actual = self.dom.disabled(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: state_name(expected).to_string(),
                actual: state_name(actual).to_string(),
            });
        }
        Ok(())
    }

    fn control_index_for(&self, node: NodeId) -> Option<usize> {
        self.controls
            .iter()
            .position(|binding| self.dom.is_ancestor_or_self(binding.root, node))
    }

    pub(crate) fn increase_quantity(&mut self, index: usize, event: &mut StepEvent) -> Result<()> {
        let Some(target) = event.target else {
            return Ok(());
        };
        if !self.dom.is_interactive(target) {
            return Ok(());
        }
        event.prevent_default();

        let binding = self.controls[index];
        let values = component::current_values(&self.dom, &binding)?;
        let new_value = binding.policy.apply_increase(&values);

        self.dom
            .set_value(binding.quantity_input, &new_value.to_string())?;
        self.on_quantity_change(index, new_value);
        self.update_button_states(index)?;
        Ok(())
    }

    pub(crate) fn decrease_quantity(&mut self, index: usize, event: &mut StepEvent) -> Result<()> {
        let Some(target) = event.target else {
            return Ok(());
        };
        if !self.dom.is_interactive(target) {
            return Ok(());
        }
        event.prevent_default();

        let binding = self.controls[index];
        let values = component::current_values(&self.dom, &binding)?;
        let new_value = binding.policy.apply_decrease(&values);

        self.dom
            .set_value(binding.quantity_input, &new_value.to_string())?;
        self.on_quantity_change(index, new_value);
        self.update_button_states(index)?;
        Ok(())
    }

    fn on_quantity_change(&mut self, index: usize, new_value: i64) {
        let binding = self.controls[index];
        let control = component::control_name(&self.dom, &binding);
        self.push_trace(format!("quantity-change {control} -> {new_value}"));
        self.change_events.push(QuantityChange {
            control,
            value: new_value,
        });
    }

    pub(crate) fn update_button_states(&mut self, index: usize) -> Result<()> {
        let binding = self.controls[index];
        let values = component::current_values(&self.dom, &binding)?;
        let states = binding.policy.button_states(&values);
        self.dom.set_disabled(binding.minus_button, states.minus_disabled);
        self.dom.set_disabled(binding.plus_button, states.plus_disabled);
        Ok(())
    }

    fn push_trace(&mut self, entry: String) {
        if !self.trace {
            return;
        }
        self.trace_logs.push(entry);
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
    }
}

fn state_name(disabled: bool) -> &'static str {
    if disabled { "disabled" } else { "enabled" }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CART_WIDGET: &str = r#"
        <cart-quantity-selector id="line-1">
          <button id="minus" ref="minusButton">-</button>
          <input id="qty" ref="quantityInput" value="2" min="0" max="5" step="1">
          <button id="plus" ref="plusButton">+</button>
          <span id="label">qty</span>
        </cart-quantity-selector>
        "#;

    #[test]
    fn handlers_ignore_events_without_a_concrete_interactive_target() -> Result<()> {
        let mut harness = Harness::from_html(CART_WIDGET)?;

        let mut event = StepEvent {
            target: None,
            default_prevented: false,
        };
        harness.decrease_quantity(0, &mut event)?;
        assert!(!event.default_prevented);
        harness.assert_value("#qty", "2")?;

        let label = harness.dom.select_one("#label")?;
        let mut event = StepEvent::targeting(label);
        harness.decrease_quantity(0, &mut event)?;
        assert!(!event.default_prevented);
        harness.assert_value("#qty", "2")?;
        assert!(harness.take_change_events().is_empty());
        Ok(())
    }

    #[test]
    fn handled_steps_suppress_the_default_action() -> Result<()> {
        let mut harness = Harness::from_html(CART_WIDGET)?;
        let minus = harness.dom.select_one("#minus")?;
        let mut event = StepEvent::targeting(minus);
        harness.decrease_quantity(0, &mut event)?;
        assert!(event.default_prevented);
        harness.assert_value("#qty", "1")?;
        Ok(())
    }

    #[test]
    fn trace_logs_record_change_notifications_and_stay_bounded() -> Result<()> {
        let mut harness = Harness::from_html(CART_WIDGET)?;
        harness.enable_trace(true);
        harness.set_trace_log_limit(2)?;

        harness.click("#plus")?;
        harness.click("#plus")?;
        harness.click("#minus")?;

        let logs = harness.take_trace_logs();
        assert_eq!(
            logs,
            vec![
                "quantity-change line-1 -> 4".to_string(),
                "quantity-change line-1 -> 3".to_string(),
            ]
        );
        assert!(harness.take_trace_logs().is_empty());
        Ok(())
    }

    #[test]
    fn unknown_dispatch_event_finds_no_listener() -> Result<()> {
        let mut harness = Harness::from_html(CART_WIDGET)?;
        harness.dispatch("#minus", "wheel")?;
        harness.assert_value("#qty", "2")?;
        assert!(harness.take_change_events().is_empty());
        Ok(())
    }

    #[test]
    fn custom_tags_can_be_registered_before_mounting() -> Result<()> {
        let mut registry = ComponentRegistry::with_builtin_components();
        registry.define_if_absent("bulk-stepper", QuantityPolicy::CartTotal);
        let mut harness = Harness::from_html_with_registry(
            r#"
            <bulk-stepper id="b">
              <button id="down" ref="minusButton">-</button>
              <input id="amount" ref="quantityInput" value="1" max="9">
              <button id="up" ref="plusButton">+</button>
            </bulk-stepper>
            "#,
            registry,
        )?;
        assert_eq!(harness.control_count(), 1);
        assert!(harness.registry().is_defined("bulk-stepper"));
        harness.click("#down")?;
        harness.assert_value("#amount", "0")?;
        harness.assert_disabled("#down")?;
        Ok(())
    }
}
