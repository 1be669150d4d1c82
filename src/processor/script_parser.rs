//! Parser that walks source lines and builds the `ParsedCode` IR.
//!
//! Parsing is total: a line that fits no rule, or an action with nowhere
//! to go, becomes a `Diagnostic` and the walk carries on.

use std::collections::BTreeSet;

use tracing::debug;

use super::ast::Action;
use super::lexer::{SourceLine, source_lines};
use super::rules::{Line, classify_line};
use super::scope::{Frame, FrameKind, Root, ScopeStack};
use crate::model::{Diagnostic, Event, ParsedCode, Procedure, Variable};

pub const INVALID_SYNTAX: &str = "Invalid syntax - see documentation for supported commands";
pub const NO_SCOPE: &str =
    "Action found without preceding event handler, procedure, or control structure";
pub const ELSE_WITHOUT_IF: &str = "Else without matching If";

/// Parses a whole pseudo-code document.
pub fn parse_pseudo_code(src: &str) -> ParsedCode {
    let mut parser = Parser::default();
    for line in source_lines(src) {
        parser.line(&line);
    }
    parser.finish()
}

#[derive(Default)]
struct Parser {
    scopes: ScopeStack,
    events: Vec<Event>,
    procedures: Vec<Procedure>,
    variables: Vec<Variable>,
    components: BTreeSet<String>,
    errors: Vec<Diagnostic>,
}

impl Parser {
    fn line(&mut self, line: &SourceLine<'_>) {
        let Some(kind) = classify_line(line.text) else {
            self.error(line, INVALID_SYNTAX);
            return;
        };

        match kind {
            Line::EventHeader { component, event } => {
                debug!(line = line.number, %component, %event, "event handler");
                self.close_all();
                self.components.insert(component.clone());
                self.scopes
                    .push(Frame::new(line.indent, FrameKind::Event { component, event }));
            }
            Line::ProcedureHeader { name, parameters } => {
                debug!(line = line.number, %name, params = parameters.len(), "procedure");
                self.close_all();
                self.scopes.push(Frame::new(
                    line.indent,
                    FrameKind::Procedure { name, parameters },
                ));
            }
            Line::VariableDecl { name, value } => {
                self.close_to(line.indent);
                // Inside a body the action is only recorded; the global
                // declaration below is what gets emitted.
                let define = Action::Define {
                    variable: name.clone(),
                    value: value.clone(),
                };
                if self.scopes.add_action(define).is_err() {
                    debug!(line = line.number, %name, "top-level declaration");
                }
                self.variables.push(Variable { name, value });
            }
            Line::SetProperty {
                component,
                property,
                value,
            } => self.action(
                line,
                Some(component.clone()),
                Action::SetProperty {
                    component,
                    property,
                    value,
                },
            ),
            Line::Assign { variable, value } => {
                self.action(line, None, Action::Assign { variable, value })
            }
            Line::ComponentCall {
                component,
                method,
                parameters,
            } => self.action(
                line,
                Some(component.clone()),
                Action::Call {
                    component,
                    method,
                    parameters,
                },
            ),
            Line::ProcedureCall { name, parameters } => self.action(
                line,
                None,
                Action::Call {
                    component: name.clone(),
                    method: name,
                    parameters,
                },
            ),
            Line::If { condition } => self.open(
                line,
                FrameKind::If {
                    condition,
                    arms: Vec::new(),
                    in_else: false,
                },
            ),
            Line::While { condition } => self.open(line, FrameKind::While { condition }),
            Line::ForEach { item, list } => self.open(line, FrameKind::ForEach { item, list }),
            Line::ElseIf { condition } => {
                self.close_deeper(line.indent);
                if !self.scopes.else_if(line.indent, condition) {
                    self.unmatched_else(line);
                }
            }
            Line::Else => {
                self.close_deeper(line.indent);
                if !self.scopes.else_branch(line.indent) {
                    self.unmatched_else(line);
                }
            }
            Line::Noise => self.close_to(line.indent),
        }
    }

    /// Adds `action` to the innermost scope. `component` is registered
    /// only once the action is accepted.
    fn action(&mut self, line: &SourceLine<'_>, component: Option<String>, action: Action) {
        self.close_to(line.indent);
        match self.scopes.add_action(action) {
            Ok(()) => {
                if let Some(component) = component {
                    self.components.insert(component);
                }
            }
            Err(_) => self.error(line, NO_SCOPE),
        }
    }

    fn open(&mut self, line: &SourceLine<'_>, kind: FrameKind) {
        self.close_to(line.indent);
        if !self.scopes.push(Frame::new(line.indent, kind)) {
            self.error(line, NO_SCOPE);
        }
    }

    fn unmatched_else(&mut self, line: &SourceLine<'_>) {
        self.error(line, ELSE_WITHOUT_IF);
        self.close_to(line.indent);
    }

    fn close_to(&mut self, indent: usize) {
        let roots = self.scopes.close_to(indent);
        self.store(roots);
    }

    fn close_deeper(&mut self, indent: usize) {
        let roots = self.scopes.close_deeper(indent);
        self.store(roots);
    }

    fn close_all(&mut self) {
        let roots = self.scopes.close_all();
        self.store(roots);
    }

    fn store(&mut self, roots: Vec<Root>) {
        for root in roots {
            match root {
                Root::Event(event) => self.events.push(event),
                Root::Procedure(procedure) => self.procedures.push(procedure),
            }
        }
    }

    fn error(&mut self, line: &SourceLine<'_>, message: &str) {
        debug!(line = line.number, text = line.text, "{message}");
        self.errors.push(Diagnostic {
            line: line.number,
            message: message.to_string(),
        });
    }

    fn finish(mut self) -> ParsedCode {
        self.close_all();
        debug!(
            events = self.events.len(),
            procedures = self.procedures.len(),
            variables = self.variables.len(),
            errors = self.errors.len(),
            "parsed pseudo-code"
        );
        ParsedCode {
            events: self.events,
            variables: self.variables,
            procedures: self.procedures,
            components: self.components.into_iter().collect(),
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(component: &str, property: &str, value: &str) -> Action {
        Action::SetProperty {
            component: component.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_single_event() {
        let parsed = parse_pseudo_code("On Button1.Click do\n    Set Label1.Text to \"Hi\"\n");
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(
            parsed.events,
            vec![Event {
                component: "Button1".into(),
                event: "Click".into(),
                actions: vec![set("Label1", "Text", "Hi")],
            }]
        );
        assert_eq!(parsed.components, vec!["Button1", "Label1"]);
    }

    #[test]
    fn test_dotted_call_registers_component_even_when_names_repeat() {
        let parsed = parse_pseudo_code(
            "Define Tick\n    Set Label1.Text to \"t\"\nOn Button1.Click do\n    Call Clock1.Clock1\n    Call Tick()\n",
        );
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.components, vec!["Button1", "Clock1", "Label1"]);
    }

    #[test]
    fn test_if_else_at_same_indent() {
        let src = "\
On Button1.Click do
    If counter > 5 then
        Set Label3.Text to \"High\"
    Else
        Set Label3.Text to \"Low\"
    Set Label1.Text to counter
";
        let parsed = parse_pseudo_code(src);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(
            parsed.events[0].actions,
            vec![
                Action::If {
                    condition: "counter > 5".into(),
                    actions: vec![set("Label3", "Text", "High")],
                    else_actions: vec![set("Label3", "Text", "Low")],
                },
                set("Label1", "Text", "counter"),
            ]
        );
    }

    #[test]
    fn test_else_if_nests() {
        let src = "\
On GestureDetector1.Swipe do
    If direction = \"left\" then
        Set Label5.Text to \"Left\"
    Else If direction = \"right\" then
        Set Label5.Text to \"Right\"
";
        let parsed = parse_pseudo_code(src);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let Action::If { else_actions, .. } = &parsed.events[0].actions[0] else {
            panic!("expected if");
        };
        assert_eq!(
            else_actions,
            &vec![Action::If {
                condition: "direction = \"right\"".into(),
                actions: vec![set("Label5", "Text", "Right")],
                else_actions: vec![],
            }]
        );
    }

    #[test]
    fn test_loops_nest_inside_conditionals() {
        let src = "\
On Screen1.Initialize do
    If ready then
        While counter < 3 do
            Set counter to counter + 1
        For each name in names do
            Call Notifier1.ShowAlert with name
";
        let parsed = parse_pseudo_code(src);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let Action::If { actions, .. } = &parsed.events[0].actions[0] else {
            panic!("expected if");
        };
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::While { .. }));
        assert!(matches!(&actions[1], Action::ForEach { actions, .. } if actions.len() == 1));
        assert_eq!(parsed.components, vec!["Notifier1", "Screen1"]);
    }

    #[test]
    fn test_procedures_and_variables() {
        let src = "\
Define counter as 0
Define ShowMessage(text)
    Set Label2.Text to text
    Call Player1.Start
On Button2.Click do
    Call ShowMessage(\"hello\")
";
        let parsed = parse_pseudo_code(src);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(
            parsed.variables,
            vec![Variable {
                name: "counter".into(),
                value: "0".into()
            }]
        );
        assert_eq!(parsed.procedures.len(), 1);
        assert_eq!(parsed.procedures[0].parameters, vec!["text"]);
        assert_eq!(parsed.procedures[0].actions.len(), 2);
        assert_eq!(
            parsed.events[0].actions,
            vec![Action::Call {
                component: "ShowMessage".into(),
                method: "ShowMessage".into(),
                parameters: vec!["hello".into()],
            }]
        );
        // Procedure names are not components.
        assert_eq!(parsed.components, vec!["Button2", "Label2", "Player1"]);
    }

    #[test]
    fn test_define_inside_body_is_recorded_and_global() {
        let src = "On Button1.Click do\n    Define total as 10\n";
        let parsed = parse_pseudo_code(src);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.variables.len(), 1);
        assert!(matches!(parsed.events[0].actions[0], Action::Define { .. }));
    }

    #[test]
    fn test_actions_outside_scope_are_diagnostics() {
        let src = "Set Label1.Text to \"x\"\nOn Button1.Click do\n    Set x to 1\nSet y to 2\n";
        let parsed = parse_pseudo_code(src);
        let lines: Vec<_> = parsed.errors.iter().map(|e| (e.line, e.message.as_str())).collect();
        assert_eq!(lines, vec![(1, NO_SCOPE), (4, NO_SCOPE)]);
        assert_eq!(parsed.events[0].actions.len(), 1);
        // Rejected lines do not contribute components.
        assert_eq!(parsed.components, vec!["Button1"]);
    }

    #[test]
    fn test_invalid_lines_keep_structure() {
        let src = "On Button1.Click do\nthis is nonsense\n    Set x to 1\n";
        let parsed = parse_pseudo_code(src);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
        assert_eq!(parsed.errors[0].message, INVALID_SYNTAX);
        assert_eq!(parsed.events[0].actions.len(), 1);
    }

    #[test]
    fn test_else_after_loop_is_reported() {
        let src = "\
On Button1.Click do
    While busy do
        Set x to 1
    Else
        Set x to 2
";
        let parsed = parse_pseudo_code(src);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 4);
        assert_eq!(parsed.errors[0].message, ELSE_WITHOUT_IF);
    }

    #[test]
    fn test_end_lines_are_noise() {
        let src = "\
On Button1.Click do
    If a then
        Set x to 1
    End If
    Set y to 2
End
";
        let parsed = parse_pseudo_code(src);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.events[0].actions.len(), 2);
    }

    #[test]
    fn test_new_event_flushes_previous() {
        let src = "On Button1.Click do\n    Set x to 1\nOn Button2.Click do\n    Set y to 2\n";
        let parsed = parse_pseudo_code(src);
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.events[0].component, "Button1");
        assert_eq!(parsed.events[1].component, "Button2");
    }

    #[test]
    fn test_reparse_is_identical() {
        let src = "Define a as 1\nOn Button1.Click do\n    Set Label1.Text to a\n";
        assert_eq!(parse_pseudo_code(src), parse_pseudo_code(src));
    }
}
