use crate::catches::CatchId;
use std::fmt;
use std::str::FromStr;

/// Attribute carrying the action kind on popup buttons.
pub const ACTION_ATTRIBUTE: &str = "data-catch-action";
/// Attribute carrying the catch id on popup buttons.
pub const CATCH_ID_ATTRIBUTE: &str = "data-catch-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Edit,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Edit => "edit",
            ActionKind::Delete => "delete",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            ActionKind::Edit => "Edit",
            ActionKind::Delete => "Delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(ActionKind::Edit),
            "delete" => Ok(ActionKind::Delete),
            other => Err(format!("unknown catch action '{other}'")),
        }
    }
}

/// Tagged per-marker action, attached to popup buttons as structured data
/// and decoded by the document-level click delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatchAction {
    pub kind: ActionKind,
    pub catch_id: CatchId,
}

impl CatchAction {
    pub fn new(kind: ActionKind, catch_id: CatchId) -> Self {
        Self { kind, catch_id }
    }

    pub fn attributes(&self) -> [(&'static str, String); 2] {
        [
            (ACTION_ATTRIBUTE, self.kind.as_str().to_string()),
            (CATCH_ID_ATTRIBUTE, self.catch_id.to_string()),
        ]
    }

    /// Decodes the attribute pair read from a clicked element. Elements
    /// missing either attribute, or carrying unknown values, yield `None`.
    pub fn from_attributes(kind: Option<&str>, catch_id: Option<&str>) -> Option<Self> {
        let kind = kind?.parse().ok()?;
        let catch_id = CatchId::parse_lenient(catch_id?)?;
        Some(Self { kind, catch_id })
    }
}
