//! Explicit stack of open blocks.
//!
//! Every header line pushes a `Frame` tagged with the indentation it was
//! written at. A later line at the same or a smaller indentation closes
//! that frame; closing a control-flow frame turns it into an `Action` in
//! its parent, closing an event or procedure frame hands it back as a
//! `Root`. None of this looks at source text, so it can be driven directly
//! from tests.

use std::mem;

use super::ast::Action;
use crate::model::{Event, Procedure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Event {
        component: String,
        event: String,
    },
    Procedure {
        name: String,
        parameters: Vec<String>,
    },
    /// `actions` of the frame hold the branch being filled; earlier
    /// `If`/`Else If` arms are parked in `arms`.
    If {
        condition: String,
        arms: Vec<(String, Vec<Action>)>,
        in_else: bool,
    },
    While {
        condition: String,
    },
    ForEach {
        item: String,
        list: String,
    },
}

impl FrameKind {
    pub fn is_root(&self) -> bool {
        matches!(self, FrameKind::Event { .. } | FrameKind::Procedure { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub indent: usize,
    pub kind: FrameKind,
    pub actions: Vec<Action>,
}

impl Frame {
    pub fn new(indent: usize, kind: FrameKind) -> Self {
        Self {
            indent,
            kind,
            actions: Vec::new(),
        }
    }
}

/// A finished top-level block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    Event(Event),
    Procedure(Procedure),
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a block. Control-flow frames need an enclosing frame; `false`
    /// means there was none and nothing was pushed.
    pub fn push(&mut self, frame: Frame) -> bool {
        if !frame.kind.is_root() && self.frames.is_empty() {
            return false;
        }
        self.frames.push(frame);
        true
    }

    /// Appends to the innermost open block. Gives the action back when no
    /// block is open.
    pub fn add_action(&mut self, action: Action) -> Result<(), Action> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.actions.push(action);
                Ok(())
            }
            None => Err(action),
        }
    }

    /// Closes every frame opened at `indent` or deeper.
    pub fn close_to(&mut self, indent: usize) -> Vec<Root> {
        self.close_while(|frame| frame.indent >= indent)
    }

    /// Closes every frame opened strictly deeper than `indent`.
    pub fn close_deeper(&mut self, indent: usize) -> Vec<Root> {
        self.close_while(|frame| frame.indent > indent)
    }

    pub fn close_all(&mut self) -> Vec<Root> {
        self.close_while(|_| true)
    }

    /// Switches the `If` frame at exactly `indent` to a new `Else If` arm.
    pub fn else_if(&mut self, indent: usize, condition: String) -> bool {
        let Some(frame) = self.matching_if(indent) else {
            return false;
        };
        let body = mem::take(&mut frame.actions);
        if let FrameKind::If {
            condition: current,
            arms,
            ..
        } = &mut frame.kind
        {
            let finished = mem::replace(current, condition);
            arms.push((finished, body));
        }
        true
    }

    /// Switches the `If` frame at exactly `indent` to its `Else` branch.
    pub fn else_branch(&mut self, indent: usize) -> bool {
        let Some(frame) = self.matching_if(indent) else {
            return false;
        };
        let body = mem::take(&mut frame.actions);
        if let FrameKind::If {
            condition,
            arms,
            in_else,
        } = &mut frame.kind
        {
            arms.push((mem::take(condition), body));
            *in_else = true;
        }
        true
    }

    fn matching_if(&mut self, indent: usize) -> Option<&mut Frame> {
        self.frames.last_mut().filter(|frame| {
            frame.indent == indent && matches!(frame.kind, FrameKind::If { in_else: false, .. })
        })
    }

    fn close_while<F: Fn(&Frame) -> bool>(&mut self, pred: F) -> Vec<Root> {
        let mut roots = Vec::new();
        while let Some(frame) = self.frames.last() {
            if !pred(frame) {
                break;
            }
            let Some(frame) = self.frames.pop() else {
                break;
            };
            match finish(frame) {
                Finished::Root(root) => roots.push(root),
                Finished::Action(action) => {
                    // Control frames are only ever pushed above another frame.
                    if let Some(parent) = self.frames.last_mut() {
                        parent.actions.push(action);
                    }
                }
            }
        }
        roots
    }
}

enum Finished {
    Root(Root),
    Action(Action),
}

fn finish(frame: Frame) -> Finished {
    let Frame { kind, actions, .. } = frame;
    match kind {
        FrameKind::Event { component, event } => Finished::Root(Root::Event(Event {
            component,
            event,
            actions,
        })),
        FrameKind::Procedure { name, parameters } => Finished::Root(Root::Procedure(Procedure {
            name,
            parameters,
            actions,
        })),
        FrameKind::If {
            condition,
            mut arms,
            in_else,
        } => {
            let mut else_actions = Vec::new();
            if in_else {
                else_actions = actions;
            } else {
                arms.push((condition, actions));
            }
            // Fold `Else If` arms into nested `If`s, innermost last.
            let mut arms = arms.into_iter();
            let (condition, actions) = arms.next().unwrap_or_default();
            for (condition, actions) in arms.rev() {
                else_actions = vec![Action::If {
                    condition,
                    actions,
                    else_actions,
                }];
            }
            Finished::Action(Action::If {
                condition,
                actions,
                else_actions,
            })
        }
        FrameKind::While { condition } => Finished::Action(Action::While { condition, actions }),
        FrameKind::ForEach { item, list } => {
            Finished::Action(Action::ForEach { item, list, actions })
        }
    }
}
