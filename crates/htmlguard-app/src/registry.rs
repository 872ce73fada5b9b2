use htmlguard_domain::spec::ConfigurationDocument;
use htmlguard_domain::{CompileError, Policy, SiteConfig, compile_site};
use htmlguard_settings::{ConfigError, DocumentFormat, global_default, load_document};
use htmlguard_types::Strategy;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Which slot of the registry a configuration document fills.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigTarget {
    Site(String),
    GlobalCustom,
    GlobalDefault,
}

impl ConfigTarget {
    /// Map a file-style identity such as `org.jahia.modules.htmlfiltering.site-acme.yml`.
    ///
    /// Directory and extension are ignored. `…global.custom` and `…global.default` name the
    /// global tiers; anything else names the site after the first `-`.
    pub fn from_identity(identity: &str) -> Option<Self> {
        let base = identity.rsplit(['/', '\\']).next().unwrap_or(identity);
        let base = match base.rsplit_once('.') {
            Some((stem, ext))
                if matches!(
                    ext.to_ascii_lowercase().as_str(),
                    "yml" | "yaml" | "toml" | "json" | "cfg"
                ) =>
            {
                stem
            }
            _ => base,
        };

        if base.ends_with("global.custom") {
            return Some(ConfigTarget::GlobalCustom);
        }
        if base.ends_with("global.default") {
            return Some(ConfigTarget::GlobalDefault);
        }
        let (_, site_key) = base.split_once('-')?;
        let site_key = site_key.trim();
        (!site_key.is_empty()).then(|| ConfigTarget::Site(site_key.to_string()))
    }
}

impl fmt::Display for ConfigTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigTarget::Site(key) => write!(f, "site '{key}'"),
            ConfigTarget::GlobalCustom => f.write_str("global custom"),
            ConfigTarget::GlobalDefault => f.write_str("global default"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("configuration identity '{0}' names neither a site nor a global tier")]
    UnknownIdentity(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Looks up the policy that governs a `(site, workspace)` pair.
pub trait PolicyResolver {
    /// Site configuration first, then the global-custom tier, then the global-default tier.
    fn resolve_policy(&self, site_key: &str, workspace: &str) -> Option<Arc<Policy>>;

    /// As [`resolve_policy`](Self::resolve_policy), but only a policy with `strategy`.
    fn resolve_policy_for_strategy(
        &self,
        site_key: &str,
        workspace: &str,
        strategy: Strategy,
    ) -> Option<Arc<Policy>> {
        self.resolve_policy(site_key, workspace)
            .filter(|policy| policy.strategy() == strategy)
    }
}

/// Process-wide policy store.
///
/// Writers compile outside the locks and publish with a single replacement, so readers see
/// either the previous or the new [`SiteConfig`], never a partial one.
#[derive(Debug, Default)]
pub struct PolicyRegistry {
    sites: RwLock<BTreeMap<String, Arc<SiteConfig>>>,
    global_custom: RwLock<Option<Arc<SiteConfig>>>,
    global_default: RwLock<Option<Arc<SiteConfig>>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in preset installed as the global default.
    pub fn with_global_default() -> Result<Self, UpdateError> {
        let registry = Self::new();
        let document = global_default()?;
        registry.install(&ConfigTarget::GlobalDefault, &document)?;
        Ok(registry)
    }

    /// Compile `document` and publish it for `target`. On error the previous configuration of
    /// `target` stays in effect.
    pub fn install(
        &self,
        target: &ConfigTarget,
        document: &ConfigurationDocument,
    ) -> Result<(), UpdateError> {
        let site = Arc::new(compile_site(document)?);
        match target {
            ConfigTarget::Site(key) => {
                self.sites.write().insert(key.clone(), site);
            }
            ConfigTarget::GlobalCustom => *self.global_custom.write() = Some(site),
            ConfigTarget::GlobalDefault => *self.global_default.write() = Some(site),
        }
        Ok(())
    }

    /// Decode, validate, compile and publish a raw document for `target`.
    pub fn update(
        &self,
        target: &ConfigTarget,
        text: &str,
        format: DocumentFormat,
    ) -> Result<(), UpdateError> {
        let outcome = load_document(text, format)
            .map_err(UpdateError::from)
            .and_then(|document| self.install(target, &document));
        match &outcome {
            Ok(()) => tracing::info!(target = %target, "configuration updated"),
            Err(err) => tracing::error!(
                target = %target,
                error = %err,
                "configuration rejected, previous configuration kept"
            ),
        }
        outcome
    }

    /// Remove the configuration of `target`. Returns whether one was present.
    pub fn delete(&self, target: &ConfigTarget) -> bool {
        let removed = match target {
            ConfigTarget::Site(key) => self.sites.write().remove(key).is_some(),
            ConfigTarget::GlobalCustom => self.global_custom.write().take().is_some(),
            ConfigTarget::GlobalDefault => self.global_default.write().take().is_some(),
        };
        if removed {
            tracing::info!(target = %target, "configuration deleted");
        }
        removed
    }

    /// Entry point for the configuration loader: a document updates, `None` deletes.
    pub fn on_configuration_changed(
        &self,
        identity: &str,
        document: Option<&str>,
    ) -> Result<(), UpdateError> {
        let Some(target) = ConfigTarget::from_identity(identity) else {
            tracing::error!(identity, "ignoring configuration with unrecognized identity");
            return Err(UpdateError::UnknownIdentity(identity.to_string()));
        };
        match document {
            Some(text) => self.update(&target, text, DocumentFormat::from_identity(identity)),
            None => {
                self.delete(&target);
                Ok(())
            }
        }
    }

    pub fn site_config(&self, target: &ConfigTarget) -> Option<Arc<SiteConfig>> {
        match target {
            ConfigTarget::Site(key) => self.sites.read().get(key).cloned(),
            ConfigTarget::GlobalCustom => self.global_custom.read().clone(),
            ConfigTarget::GlobalDefault => self.global_default.read().clone(),
        }
    }

    pub fn has_config(&self, target: &ConfigTarget) -> bool {
        self.site_config(target).is_some()
    }

    /// Keys of every site with its own configuration, sorted.
    pub fn site_keys(&self) -> Vec<String> {
        self.sites.read().keys().cloned().collect()
    }

    fn select(&self, site_key: &str) -> Option<(ConfigTarget, Arc<SiteConfig>)> {
        let site = ConfigTarget::Site(site_key.to_string());
        [site, ConfigTarget::GlobalCustom, ConfigTarget::GlobalDefault]
            .into_iter()
            .find_map(|target| self.site_config(&target).map(|config| (target, config)))
    }
}

impl PolicyResolver for PolicyRegistry {
    fn resolve_policy(&self, site_key: &str, workspace: &str) -> Option<Arc<Policy>> {
        let Some((tier, config)) = self.select(site_key) else {
            tracing::debug!(site_key, workspace, "no policy configured");
            return None;
        };
        tracing::debug!(site_key, workspace, tier = %tier, "resolved policy");
        Some(Arc::clone(config.policy_for(workspace)))
    }
}
