use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository workspace holding content that is still being edited.
pub const EDIT_WORKSPACE: &str = "default";
/// Repository workspace holding published content.
pub const LIVE_WORKSPACE: &str = "live";

/// What happens to markup that does not conform to a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Non-conforming content fails validation; the caller must block the write.
    #[serde(alias = "REJECT", alias = "Reject")]
    Reject,
    /// Non-conforming markup is stripped and the cleaned value is stored.
    #[serde(alias = "SANITIZE", alias = "Sanitize")]
    Sanitize,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Reject => "reject",
            Strategy::Sanitize => "sanitize",
        }
    }

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("reject") {
            Some(Strategy::Reject)
        } else if name.eq_ignore_ascii_case("sanitize") {
            Some(Strategy::Sanitize)
        } else {
            None
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two workspaces a site configuration carries a policy for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Workspace {
    Edit,
    Live,
}

impl Workspace {
    /// Map a repository workspace name. Returns `None` for names that are neither
    /// [`EDIT_WORKSPACE`] nor [`LIVE_WORKSPACE`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            EDIT_WORKSPACE => Some(Workspace::Edit),
            LIVE_WORKSPACE => Some(Workspace::Live),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Workspace::Edit => EDIT_WORKSPACE,
            Workspace::Live => LIVE_WORKSPACE,
        }
    }

    /// Key used for this workspace in configuration documents.
    pub fn config_key(&self) -> &'static str {
        match self {
            Workspace::Edit => "editWorkspace",
            Workspace::Live => "liveWorkspace",
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
