use crate::policy::{Policy, PolicyError};
use crate::spec::ConfigurationDocument;
use htmlguard_types::Workspace;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}: {source}", .workspace.config_key())]
pub struct CompileError {
    pub workspace: Workspace,
    #[source]
    pub source: PolicyError,
}

/// Edit and live policies compiled from one configuration document.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    edit: Arc<Policy>,
    live: Arc<Policy>,
}

/// Compile both workspaces of `document`. Nothing is returned unless both compile.
pub fn compile_site(document: &ConfigurationDocument) -> Result<SiteConfig, CompileError> {
    let compile = |workspace: Workspace| {
        Policy::compile(&document.formats, document.policy_spec(workspace))
            .map(Arc::new)
            .map_err(|source| CompileError { workspace, source })
    };
    Ok(SiteConfig {
        edit: compile(Workspace::Edit)?,
        live: compile(Workspace::Live)?,
    })
}

impl SiteConfig {
    pub fn policy(&self, workspace: Workspace) -> &Arc<Policy> {
        match workspace {
            Workspace::Edit => &self.edit,
            Workspace::Live => &self.live,
        }
    }

    /// Policy for a repository workspace name. Names other than the edit and live workspaces
    /// fall back to the live policy.
    pub fn policy_for(&self, workspace_name: &str) -> &Arc<Policy> {
        match Workspace::from_name(workspace_name) {
            Some(workspace) => self.policy(workspace),
            None => {
                tracing::warn!(
                    workspace = workspace_name,
                    "unknown workspace, using the live workspace policy"
                );
                &self.live
            }
        }
    }
}
