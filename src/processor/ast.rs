//! Action tree for one event handler or procedure body.
//!
//! Actions own their nested bodies, so a parsed program is always a tree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
    /// `Set Label1.Text to "Hi"` – assign a component property.
    SetProperty {
        component: String,
        property: String,
        value: String,
    },

    /// `Set counter to counter + 1` – assign a variable.
    Assign { variable: String, value: String },

    /// `Call Player1.Start [with a, b]` or `Call ShowMessage(text)`.
    ///
    /// Procedure calls carry the procedure name in both `component` and
    /// `method`.
    Call {
        component: String,
        method: String,
        #[serde(default)]
        parameters: Vec<String>,
    },

    /// `Define counter as 0` seen inside a body. The global declaration in
    /// `ParsedCode::variables` is what gets emitted.
    Define { variable: String, value: String },

    /// `If <cond> then` with its `Else If` / `Else` arms folded into
    /// `else_actions`.
    If {
        condition: String,
        #[serde(default)]
        actions: Vec<Action>,
        #[serde(default)]
        else_actions: Vec<Action>,
    },

    /// `While <cond> do`
    While {
        condition: String,
        #[serde(default)]
        actions: Vec<Action>,
    },

    /// `For each <item> in <list> do`
    ForEach {
        item: String,
        list: String,
        #[serde(default)]
        actions: Vec<Action>,
    },
}

impl Action {
    /// Short tag used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetProperty { .. } => "set_property",
            Action::Assign { .. } => "assign",
            Action::Call { .. } => "call",
            Action::Define { .. } => "define",
            Action::If { .. } => "if",
            Action::While { .. } => "while",
            Action::ForEach { .. } => "for_each",
        }
    }

    /// A procedure call names the procedure twice; a component method call
    /// names a component and one of its methods.
    pub fn is_procedure_call(&self) -> bool {
        matches!(self, Action::Call { component, method, .. } if component == method)
    }

    /// Returns the name of the first required identifier that is empty, if
    /// any. Such actions cannot be lowered to blocks.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Action::SetProperty {
                component,
                property,
                ..
            } => {
                if component.is_empty() {
                    Some("component")
                } else if property.is_empty() {
                    Some("property")
                } else {
                    None
                }
            }
            Action::Assign { variable, .. } | Action::Define { variable, .. } => {
                variable.is_empty().then_some("variable")
            }
            Action::Call {
                component, method, ..
            } => {
                if component.is_empty() {
                    Some("component")
                } else if method.is_empty() {
                    Some("method")
                } else {
                    None
                }
            }
            Action::If { condition, .. } | Action::While { condition, .. } => {
                condition.is_empty().then_some("condition")
            }
            Action::ForEach { item, list, .. } => {
                if item.is_empty() {
                    Some("item")
                } else if list.is_empty() {
                    Some("list")
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Action;

    #[test]
    fn procedure_calls_repeat_the_name() {
        let proc_call = Action::Call {
            component: "ShowMessage".into(),
            method: "ShowMessage".into(),
            parameters: vec!["message".into()],
        };
        let method_call = Action::Call {
            component: "Player1".into(),
            method: "Start".into(),
            parameters: vec![],
        };
        assert!(proc_call.is_procedure_call());
        assert!(!method_call.is_procedure_call());
    }

    #[test]
    fn missing_fields_are_reported() {
        let action = Action::SetProperty {
            component: "Label1".into(),
            property: String::new(),
            value: "x".into(),
        };
        assert_eq!(action.missing_field(), Some("property"));

        let ok = Action::ForEach {
            item: "name".into(),
            list: "names".into(),
            actions: vec![],
        };
        assert_eq!(ok.missing_field(), None);
    }

    #[test]
    fn serialises_with_type_tag() {
        let action = Action::If {
            condition: "x > 1".into(),
            actions: vec![],
            else_actions: vec![Action::Assign {
                variable: "x".into(),
                value: "0".into(),
            }],
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "if");
        assert_eq!(json["elseActions"][0]["type"], "assign");
    }
}
