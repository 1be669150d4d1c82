//! The line grammar, as an ordered list of rules.
//!
//! Each rule looks at one trimmed source line and either recognises it or
//! passes. `classify_line` tries the rules top to bottom and the first
//! match wins, so the order of `RULES` is part of the grammar.

use super::lexer::{Scanner, split_args, strip_quotes, strip_trailing_keyword};

/// What a single line says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    EventHeader { component: String, event: String },
    VariableDecl { name: String, value: String },
    ProcedureHeader { name: String, parameters: Vec<String> },
    SetProperty { component: String, property: String, value: String },
    Assign { variable: String, value: String },
    ComponentCall { component: String, method: String, parameters: Vec<String> },
    ProcedureCall { name: String, parameters: Vec<String> },
    ElseIf { condition: String },
    Else,
    If { condition: String },
    ForEach { item: String, list: String },
    While { condition: String },
    /// `End If`, `EndWhile`, stray `Else…` – closes blocks, nothing else.
    Noise,
}

pub struct Rule {
    pub name: &'static str,
    pub matcher: fn(&str) -> Option<Line>,
}

pub const RULES: &[Rule] = &[
    Rule { name: "event-header", matcher: event_header },
    // `Define x as v` before `Define x`: the procedure form is anchored at
    // end of line, but keeping declarations first makes the intent plain.
    Rule { name: "variable-decl", matcher: variable_decl },
    Rule { name: "procedure-header", matcher: procedure_header },
    // Property set must run before variable assign. Both start with `Set`;
    // the assign form additionally refuses a subject followed by `.`.
    Rule { name: "set-property", matcher: set_property },
    Rule { name: "assign", matcher: assign },
    // Dotted and parenthesised calls are separate grammars producing the
    // same action shape.
    Rule { name: "component-call", matcher: component_call },
    Rule { name: "procedure-call", matcher: procedure_call },
    Rule { name: "else-if", matcher: else_if },
    Rule { name: "else", matcher: else_line },
    Rule { name: "if", matcher: if_line },
    Rule { name: "for-each", matcher: for_each },
    Rule { name: "while", matcher: while_line },
    // Last: anything starting with Else/End that nothing above accepted.
    Rule { name: "block-noise", matcher: noise },
];

/// Runs the rules in order. `None` means invalid syntax.
pub fn classify_line(text: &str) -> Option<Line> {
    RULES.iter().find_map(|rule| (rule.matcher)(text))
}

/// `ident.ident`
fn dotted<'a>(s: &mut Scanner<'a>) -> Option<(&'a str, &'a str)> {
    let owner = s.identifier()?;
    if !s.eat('.') {
        return None;
    }
    let member = s.identifier()?;
    Some((owner, member))
}

/// `ws to ws <value>` up to end of line.
fn to_value(s: &mut Scanner<'_>) -> Option<String> {
    if !s.skip_ws() || !s.keyword_ws("to") || s.is_empty() {
        return None;
    }
    Some(strip_quotes(s.rest()).to_string())
}

/// `(<args>)` closing the line.
fn paren_args(s: &mut Scanner<'_>) -> Option<Vec<String>> {
    if !s.eat('(') {
        return None;
    }
    let inner = s.rest().strip_suffix(')')?;
    if inner.contains(')') {
        return None;
    }
    Some(split_args(inner))
}

// (On|When) <Component>.<Event> [do]
fn event_header(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !(s.keyword_ws("on") || s.keyword_ws("when")) {
        return None;
    }
    let (component, event) = dotted(&mut s)?;
    if s.skip_ws() && !s.keyword("do") {
        return None;
    }
    s.is_empty().then(|| Line::EventHeader {
        component: component.to_string(),
        event: event.to_string(),
    })
}

// Define <Name> as <Value>
fn variable_decl(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("define") {
        return None;
    }
    let name = s.identifier()?;
    if !s.skip_ws() || !s.keyword_ws("as") || s.is_empty() {
        return None;
    }
    Some(Line::VariableDecl {
        name: name.to_string(),
        value: strip_quotes(s.rest()).to_string(),
    })
}

// Define <Name>[(<params>)]
fn procedure_header(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("define") {
        return None;
    }
    let name = s.identifier()?;
    let parameters = if s.is_empty() {
        Vec::new()
    } else {
        paren_args(&mut s)?
    };
    Some(Line::ProcedureHeader {
        name: name.to_string(),
        parameters,
    })
}

// Set <Component>.<Property> to <Value>
fn set_property(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("set") {
        return None;
    }
    let (component, property) = dotted(&mut s)?;
    let value = to_value(&mut s)?;
    Some(Line::SetProperty {
        component: component.to_string(),
        property: property.to_string(),
        value,
    })
}

// Set <Name> to <Value>, subject without a dot
fn assign(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("set") {
        return None;
    }
    let variable = s.identifier()?;
    if s.rest().starts_with('.') {
        return None;
    }
    let value = to_value(&mut s)?;
    Some(Line::Assign {
        variable: variable.to_string(),
        value,
    })
}

// Call <Component>.<Method> [with <args>]
fn component_call(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("call") {
        return None;
    }
    let (component, method) = dotted(&mut s)?;
    let parameters = if s.is_empty() {
        Vec::new()
    } else {
        if !s.skip_ws() || !s.keyword_ws("with") || s.is_empty() {
            return None;
        }
        split_args(s.rest())
    };
    Some(Line::ComponentCall {
        component: component.to_string(),
        method: method.to_string(),
        parameters,
    })
}

// Call <Name>(<args>)
fn procedure_call(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("call") {
        return None;
    }
    let name = s.identifier()?;
    let parameters = paren_args(&mut s)?;
    Some(Line::ProcedureCall {
        name: name.to_string(),
        parameters,
    })
}

// Else If <cond> then
fn else_if(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("else") || !s.keyword_ws("if") {
        return None;
    }
    let condition = strip_trailing_keyword(s.rest(), "then")?;
    Some(Line::ElseIf {
        condition: condition.to_string(),
    })
}

fn else_line(text: &str) -> Option<Line> {
    text.eq_ignore_ascii_case("else").then_some(Line::Else)
}

// If <cond> then
fn if_line(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("if") {
        return None;
    }
    let condition = strip_trailing_keyword(s.rest(), "then")?;
    Some(Line::If {
        condition: condition.to_string(),
    })
}

// For each <item> in <list> do
fn for_each(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("for") || !s.keyword_ws("each") {
        return None;
    }
    let item = s.identifier()?;
    if !s.skip_ws() || !s.keyword_ws("in") {
        return None;
    }
    let list = s.identifier()?;
    if !s.skip_ws() || !s.keyword("do") || !s.is_empty() {
        return None;
    }
    Some(Line::ForEach {
        item: item.to_string(),
        list: list.to_string(),
    })
}

// While <cond> do
fn while_line(text: &str) -> Option<Line> {
    let mut s = Scanner::new(text);
    if !s.keyword_ws("while") {
        return None;
    }
    let condition = strip_trailing_keyword(s.rest(), "do")?;
    Some(Line::While {
        condition: condition.to_string(),
    })
}

fn noise(text: &str) -> Option<Line> {
    let starts_with = |prefix: &str| {
        text.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    (starts_with("else") || starts_with("end")).then_some(Line::Noise)
}
