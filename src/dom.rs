use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) disabled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        let element_id = attrs.get("id").cloned();
        let node = self.create_node(
            Some(parent),
            NodeType::Element(Element {
                tag_name,
                attrs,
                value,
                disabled,
            }),
        );
        if let Some(id) = element_id {
            self.id_index.entry(id).or_insert(node);
        }
        node
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(ref element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(ref mut element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|element| element.tag_name.as_str())
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<&str> {
        self.element(node_id)
            .map(|element| element.value.as_str())
            .ok_or_else(|| Error::SelectorNotFound("value target is not an element".into()))
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::SelectorNotFound("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id)
            .map(|element| element.disabled)
            .unwrap_or(false)
    }

    pub(crate) fn set_disabled(&mut self, node_id: NodeId, disabled: bool) {
        if let Some(element) = self.element_mut(node_id) {
            element.disabled = disabled;
        }
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    /// Depth-first walk of the subtree rooted at `node_id`, excluding the
    /// root itself, in document order.
    pub(crate) fn descendants(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node_id.0]
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(current) = stack.pop() {
            found.push(current);
            for child in self.nodes[current.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        found
    }

    pub(crate) fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// A concrete interactive element, in the sense interaction events care
    /// about: buttons and form inputs.
    pub(crate) fn is_interactive(&self, node_id: NodeId) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };
        element.tag_name.eq_ignore_ascii_case("button")
            || element.tag_name.eq_ignore_ascii_case("input")
            || element.tag_name.eq_ignore_ascii_case("select")
            || element.tag_name.eq_ignore_ascii_case("textarea")
    }

    /// Only `#id` and bare tag-name selectors are supported; the harness
    /// needs nothing richer.
    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        if let Some(id) = selector.strip_prefix('#') {
            return self
                .id_index
                .get(id)
                .copied()
                .ok_or_else(|| Error::SelectorNotFound(selector.to_string()));
        }

        if !selector.is_empty()
            && selector
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            let wanted = selector.to_ascii_lowercase();
            return self
                .descendants(self.root)
                .into_iter()
                .find(|node| {
                    self.tag_name(*node)
                        .map(|tag| tag == wanted)
                        .unwrap_or(false)
                })
                .ok_or_else(|| Error::SelectorNotFound(selector.to_string()));
        }

        Err(Error::UnsupportedSelector(selector.to_string()))
    }
}

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link", "source", "wbr"];

fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|void| tag.eq_ignore_ascii_case(void))
}

fn is_tag_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}

fn is_attr_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || byte == b':'
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.len() >= at + needle.len() && &bytes[at..at + needle.len()] == needle
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || bytes.len() < needle.len() {
        return None;
    }
    (from..=bytes.len() - needle.len()).find(|&i| &bytes[i..i + needle.len()] == needle)
}

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut stack = vec![dom.root()];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_at(bytes, i, b"<!--") {
            if let Some(end) = find_subslice(bytes, i + 4, b"-->") {
                i = end + 3;
            } else {
                return Err(Error::HtmlParse("unclosed HTML comment".into()));
            }
            continue;
        }

        if bytes[i] == b'<' {
            if starts_with_at(bytes, i, b"</") {
                let (tag, next) = parse_end_tag(html, i)?;
                i = next;

                while stack.len() > 1 {
                    let top = *stack
                        .last()
                        .ok_or_else(|| Error::HtmlParse("invalid stack state".into()))?;
                    let top_tag = dom.tag_name(top).unwrap_or("");
                    let matched = top_tag.eq_ignore_ascii_case(&tag);
                    stack.pop();
                    if matched {
                        break;
                    }
                }
                continue;
            }

            let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;

            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
            let node = dom.create_element(parent, tag.clone(), attrs);

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        let text_start = i;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }

        if let Some(text) = html.get(text_start..i) {
            if !text.trim().is_empty() {
                let parent = *stack
                    .last()
                    .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
                dom.create_text(parent, text.to_string());
            }
        }
    }

    Ok(dom)
}

fn parse_start_tag(html: &str, at: usize) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = at;
    if bytes.get(i) != Some(&b'<') {
        return Err(Error::HtmlParse("expected '<'".into()));
    }
    i += 1;

    skip_ws(bytes, &mut i);
    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }

    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid tag name".into()))?
        .to_ascii_lowercase();

    if tag.is_empty() {
        return Err(Error::HtmlParse("empty tag name".into()));
    }

    let mut attrs = HashMap::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(Error::HtmlParse("unclosed start tag".into()));
        }

        if bytes[i] == b'>' {
            i += 1;
            break;
        }

        if bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'>' {
            self_closing = true;
            i += 2;
            break;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }

        let name = html
            .get(name_start..i)
            .ok_or_else(|| Error::HtmlParse("invalid attribute name".into()))?
            .to_ascii_lowercase();

        if name.is_empty() {
            return Err(Error::HtmlParse(format!(
                "unexpected character in tag <{tag}>"
            )));
        }

        skip_ws(bytes, &mut i);
        if bytes.get(i) != Some(&b'=') {
            attrs.insert(name, String::new());
            continue;
        }
        i += 1;
        skip_ws(bytes, &mut i);

        let value = if bytes.get(i) == Some(&b'"') || bytes.get(i) == Some(&b'\'') {
            let quote = bytes[i];
            i += 1;
            let value_start = i;
            while i < bytes.len() && bytes[i] != quote {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(Error::HtmlParse(format!(
                    "unclosed attribute value in <{tag}>"
                )));
            }
            let value = html
                .get(value_start..i)
                .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
                .to_string();
            i += 1;
            value
        } else {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                i += 1;
            }
            html.get(value_start..i)
                .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
                .to_string()
        };

        attrs.insert(name, value);
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    skip_ws(bytes, &mut i);
    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid end tag".into()))?
        .to_ascii_lowercase();
    skip_ws(bytes, &mut i);
    if bytes.get(i) != Some(&b'>') {
        return Err(Error::HtmlParse(format!("unclosed end tag </{tag}>")));
    }
    Ok((tag, i + 1))
}
