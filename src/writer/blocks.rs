//! Emit the `Screen1.bky` blocks file.
//!
//! Top-level blocks come out in a fixed order (globals, procedures, event
//! handlers), each one lower on the canvas than the last. Bodies are
//! lowered recursively; siblings are linked by nesting each following
//! block inside a `<next>` of the one before it.

use tracing::warn;
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::catalog::Catalog;
use crate::error::GenerateResult;
use crate::literal::{Literal, classify};
use crate::model::{Event, ParsedCode, Procedure, Variable};
use crate::processor::ast::Action;

pub const BLOCKLY_NS: &str = "https://developers.google.com/blockly/xml";

const LEFT: u32 = 20;
const TOP: u32 = 20;
const VARIABLE_STEP: u32 = 100;
const BLOCK_STEP: u32 = 150;

fn attr(mut el: Element, key: &str, value: impl Into<String>) -> Element {
    el.attributes.insert(key.to_string(), value.into());
    el
}

fn child(mut el: Element, node: Element) -> Element {
    el.children.push(XMLNode::Element(node));
    el
}

fn block(block_type: &str) -> Element {
    attr(Element::new("block"), "type", block_type)
}

/// `<title name="...">text</title>`
fn title(name: &str, text: &str) -> Element {
    let mut el = attr(Element::new("title"), "name", name);
    el.children.push(XMLNode::Text(text.to_string()));
    el
}

fn wrapper(tag: &str, name: &str, inner: Element) -> Element {
    child(attr(Element::new(tag), "name", name), inner)
}

pub struct BlocksWriter<'a> {
    ir: &'a ParsedCode,
    catalog: &'a Catalog<'a>,
}

impl<'a> BlocksWriter<'a> {
    pub fn new(ir: &'a ParsedCode, catalog: &'a Catalog<'a>) -> Self {
        Self { ir, catalog }
    }

    /// Builds the whole `<xml>` document.
    pub fn build(&self) -> Element {
        let mut root = attr(Element::new("xml"), "xmlns", BLOCKLY_NS);
        let mut y = TOP;

        for variable in &self.ir.variables {
            root = child(root, self.global_declaration(variable, y));
            y += VARIABLE_STEP;
        }
        for procedure in &self.ir.procedures {
            root = child(root, self.procedure_definition(procedure, y));
            y += BLOCK_STEP;
        }
        for event in &self.ir.events {
            root = child(root, self.event_handler(event, y));
            y += BLOCK_STEP;
        }
        root
    }

    fn placed(block_type: &str, y: u32) -> Element {
        attr(attr(block(block_type), "x", LEFT.to_string()), "y", y.to_string())
    }

    fn global_declaration(&self, variable: &Variable, y: u32) -> Element {
        let el = child(Self::placed("global_declaration", y), title("NAME", &variable.name));
        child(el, self.value("VALUE", &variable.value))
    }

    fn procedure_definition(&self, procedure: &Procedure, y: u32) -> Element {
        let mut mutation = Element::new("mutation");
        for param in &procedure.parameters {
            mutation = child(mutation, attr(Element::new("arg"), "name", param.as_str()));
        }
        let mut el = child(Self::placed("procedures_defnoreturn", y), mutation);
        el = child(el, title("NAME", &procedure.name));
        match self.statement("STACK", &procedure.actions, 1) {
            Some(stack) => child(el, stack),
            None => el,
        }
    }

    fn event_handler(&self, event: &Event, y: u32) -> Element {
        let kind = self.catalog.classify(&event.component);
        let mutation = Element::new("mutation");
        let mutation = attr(mutation, "component_type", kind.type_name);
        let mutation = attr(mutation, "instance_name", event.component.as_str());
        let mutation = attr(mutation, "event_name", event.event.as_str());
        let mutation = attr(mutation, "is_generic", "false");

        let mut el = child(Self::placed("component_event", y), mutation);
        el = child(el, title("COMPONENT_SELECTOR", &event.component));
        match self.statement("DO", &event.actions, 1) {
            Some(body) => child(el, body),
            None => el,
        }
    }

    /// `<statement name=...>` around a chained body, or nothing for an
    /// empty (or entirely skipped) body.
    fn statement(&self, name: &str, actions: &[Action], depth: usize) -> Option<Element> {
        self.chain(actions, depth)
            .map(|first| wrapper("statement", name, first))
    }

    /// Lowers `actions` and links them through `<next>`.
    fn chain(&self, actions: &[Action], depth: usize) -> Option<Element> {
        let mut blocks: Vec<Element> = actions
            .iter()
            .filter_map(|action| self.action(action, depth))
            .collect();
        let mut tail = blocks.pop()?;
        while let Some(prev) = blocks.pop() {
            tail = child(prev, wrapper_next(tail));
        }
        Some(tail)
    }

    fn action(&self, action: &Action, depth: usize) -> Option<Element> {
        if let Some(field) = action.missing_field() {
            warn!(kind = action.kind(), field, depth, "skipping incomplete action");
            return None;
        }

        let el = match action {
            Action::Define { .. } => return None,
            Action::SetProperty {
                component,
                property,
                value,
            } => {
                let kind = self.catalog.classify(component);
                let is_generic = if kind.is_extension() { "true" } else { "false" };
                let mutation = Element::new("mutation");
                let mutation = attr(mutation, "component_type", kind.type_name);
                let mutation = attr(mutation, "set_or_get", "set");
                let mutation = attr(mutation, "property_name", property.as_str());
                let mutation = attr(mutation, "is_generic", is_generic);
                let mutation = attr(mutation, "instance_name", component.as_str());

                let el = child(block("component_set_get"), mutation);
                let el = child(el, title("COMPONENT_SELECTOR", component));
                child(el, self.value("VALUE", value))
            }
            Action::Assign { variable, value } => {
                let el = child(block("lexical_variable_set"), title("VAR", variable));
                child(el, self.value("VALUE", value))
            }
            Action::Call {
                component,
                parameters,
                ..
            } if action.is_procedure_call() && !self.ir.components.contains(component) => {
                self.procedure_call(component, parameters)
            }
            Action::Call {
                component,
                method,
                parameters,
            } => {
                let kind = self.catalog.classify(component);
                let mutation = Element::new("mutation");
                let mutation = attr(mutation, "component_type", kind.type_name);
                let mutation = attr(mutation, "method_name", method.as_str());
                let mutation = attr(mutation, "is_generic", "false");
                let mutation = attr(mutation, "instance_name", component.as_str());

                let mut el = child(block("component_method"), mutation);
                el = child(el, title("COMPONENT_SELECTOR", component));
                self.arguments(el, parameters)
            }
            Action::If {
                condition,
                actions,
                else_actions,
            } => {
                let else_body = self.statement("ELSE", else_actions, depth + 1);
                let mut el = block("controls_if");
                if else_body.is_some() {
                    el = child(el, attr(Element::new("mutation"), "else", "1"));
                }
                el = child(el, self.value("IF0", condition));
                if let Some(body) = self.statement("DO0", actions, depth + 1) {
                    el = child(el, body);
                }
                match else_body {
                    Some(body) => child(el, body),
                    None => el,
                }
            }
            Action::While { condition, actions } => {
                let mut el = child(block("controls_whileUntil"), title("MODE", "WHILE"));
                el = child(el, self.value("BOOL", condition));
                match self.statement("DO", actions, depth + 1) {
                    Some(body) => child(el, body),
                    None => el,
                }
            }
            Action::ForEach {
                item,
                list,
                actions,
            } => {
                let list_get = child(block("lexical_variable_get"), title("VAR", list));
                let mut el = child(block("controls_forEach"), title("VAR", item));
                el = child(el, wrapper("value", "LIST", list_get));
                match self.statement("DO", actions, depth + 1) {
                    Some(body) => child(el, body),
                    None => el,
                }
            }
        };
        Some(el)
    }

    fn procedure_call(&self, name: &str, parameters: &[String]) -> Element {
        // Slots are named after the declaration; any extra call-site
        // arguments get positional names so every ARG<i> has a slot.
        let declared = self
            .ir
            .procedure(name)
            .map(|p| p.parameters.as_slice())
            .unwrap_or_default();
        let slots = declared.len().max(parameters.len());
        let arg_names: Vec<String> = (0..slots)
            .map(|i| declared.get(i).cloned().unwrap_or_else(|| format!("arg{i}")))
            .collect();

        let mut mutation = attr(Element::new("mutation"), "name", name);
        for arg in &arg_names {
            mutation = child(mutation, attr(Element::new("arg"), "name", arg.as_str()));
        }
        let el = child(block("procedures_callnoreturn"), mutation);
        let el = child(el, title("PROCNAME", name));
        self.arguments(el, parameters)
    }

    fn arguments(&self, mut el: Element, parameters: &[String]) -> Element {
        for (i, param) in parameters.iter().enumerate() {
            el = child(el, self.value(&format!("ARG{i}"), param));
        }
        el
    }

    /// `<value name=...>` holding a classified literal.
    fn value(&self, name: &str, literal: &str) -> Element {
        wrapper("value", name, self.literal(literal))
    }

    fn literal(&self, text: &str) -> Element {
        match classify(text, self.catalog.config()) {
            Literal::Color { block: ty, argb } => child(block(&ty), title("COLOR", &argb)),
            Literal::Number(n) => child(block("math_number"), title("NUM", &n)),
            Literal::Boolean(b) => {
                child(block("logic_boolean"), title("BOOL", if b { "TRUE" } else { "FALSE" }))
            }
            Literal::Text(t) => child(block("text"), title("TEXT", &t)),
        }
    }
}

fn wrapper_next(inner: Element) -> Element {
    child(Element::new("next"), inner)
}

pub fn build_blocks(ir: &ParsedCode, catalog: &Catalog<'_>) -> Element {
    BlocksWriter::new(ir, catalog).build()
}

/// Serialises the document, indented, without an XML declaration.
pub fn render_blocks(root: &Element) -> GenerateResult<String> {
    let mut out = Vec::new();
    let config = EmitterConfig::new()
        .perform_indent(true)
        .write_document_declaration(false);
    root.write_with_config(&mut out, config)?;
    String::from_utf8(out)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
