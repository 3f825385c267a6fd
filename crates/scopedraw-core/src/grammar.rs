//! Placement and nesting rules between scope kinds and attribute categories.
//!
//! Every check runs at the point of use (scope entry or action), never at output time.

use crate::attr::{Attribute, Category};
use crate::error::{Error, GrammarViolation, Result};
use crate::paper::Paper;
use crate::scope::ScopeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Move,
    Line,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Move => "move",
            ActionKind::Line => "line",
        }
    }
}

/// Validates a scope about to be entered at `depth` inside `parent` (`None` for the outermost
/// scope).
pub fn validate(
    parent: Option<ScopeKind>,
    kind: ScopeKind,
    attributes: &[Attribute],
    depth: usize,
) -> Result<()> {
    if let Some(outer) = parent {
        check_nesting(outer, kind)?;
    }
    check_placement(attributes, depth)?;
    if depth == 0 {
        bootstrap(attributes)?;
    }
    Ok(())
}

/// Bootstrap and Output attributes are only valid at depth 0.
pub fn check_placement(attributes: &[Attribute], depth: usize) -> Result<()> {
    if depth == 0 {
        return Ok(());
    }
    match attributes
        .iter()
        .find(|attr| attr.category() != Category::State)
    {
        Some(attr) => Err(Error::Placement {
            attribute: attr.name(),
            category: attr.category(),
            depth,
        }),
        None => Ok(()),
    }
}

/// `with` scopes hold nested scopes only; `draw`/`paint` scopes hold actions only.
pub fn check_nesting(outer: ScopeKind, inner: ScopeKind) -> Result<()> {
    match outer {
        ScopeKind::With => Ok(()),
        ScopeKind::Draw | ScopeKind::Paint => {
            Err(GrammarViolation::ScopeInsidePath { outer, inner }.into())
        }
    }
}

pub fn check_action(scope: ScopeKind, action: ActionKind) -> Result<()> {
    match scope {
        ScopeKind::With => Err(GrammarViolation::ActionInWith {
            action: action.name(),
        }
        .into()),
        ScopeKind::Draw | ScopeKind::Paint => Ok(()),
    }
}

/// The Paper that establishes the surface; the last one wins when several are given.
pub fn bootstrap(attributes: &[Attribute]) -> Result<&Paper> {
    attributes
        .iter()
        .rev()
        .find_map(|attr| match attr {
            Attribute::Paper(paper) => Some(paper),
            _ => None,
        })
        .ok_or(Error::MissingBootstrap)
}
