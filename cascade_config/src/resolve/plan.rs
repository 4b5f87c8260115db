//! Ordered list of fragments merged for one configuration directory.

/// How failures of a fragment are handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentPolicy {
    /// A missing or broken file aborts the load.
    Required,
    /// A missing or broken file contributes an empty mapping.
    Optional,
    /// Loaded as required, but any failure is logged as a warning and the
    /// fragment contributes an empty mapping.
    WarnOnFailure,
}

/// Which of the configured extensions may back a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionFilter {
    /// Every configured extension.
    All,
    /// Only extensions whose loader computes values from the environment.
    EnvironmentAware,
}

/// One entry of the merge precedence list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentSlot {
    /// File name without extension, such as `local-production`.
    pub name: String,
    /// Failure handling for this fragment.
    pub policy: FragmentPolicy,
    /// Extensions eligible for this fragment.
    pub extensions: ExtensionFilter,
}

impl FragmentSlot {
    fn new(name: impl Into<String>, policy: FragmentPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            extensions: ExtensionFilter::All,
        }
    }
}

/// Name of the fragment overriding values from environment variables.
pub const ENV_OVERRIDES_FRAGMENT: &str = "custom-environment-variables";

/// Compute the fragments to merge, lowest precedence first.
///
/// Empty `environment` or `variant` strings are treated as not given.
///
/// # Examples
///
/// ```rust
/// use cascade_config::resolve::fragment_plan;
///
/// let names: Vec<String> = fragment_plan(Some("production"), None)
///     .into_iter()
///     .map(|slot| slot.name)
///     .collect();
/// assert_eq!(
///     names,
///     ["default", "production", "local", "local-production", "custom-environment-variables"]
/// );
/// ```
#[must_use]
pub fn fragment_plan(environment: Option<&str>, variant: Option<&str>) -> Vec<FragmentSlot> {
    use FragmentPolicy::{Optional, Required, WarnOnFailure};

    let environment = environment.filter(|name| !name.is_empty());
    let variant = variant.filter(|name| !name.is_empty());

    let mut plan = vec![FragmentSlot::new("default", Required)];
    if let Some(variant) = variant {
        plan.push(FragmentSlot::new(format!("default-{variant}"), Optional));
    }
    if let Some(environment) = environment {
        plan.push(FragmentSlot::new(environment, WarnOnFailure));
        if let Some(variant) = variant {
            plan.push(FragmentSlot::new(
                format!("{environment}-{variant}"),
                Optional,
            ));
        }
    }
    plan.push(FragmentSlot::new("local", Optional));
    if let Some(variant) = variant {
        plan.push(FragmentSlot::new(format!("local-{variant}"), Optional));
    }
    if let Some(environment) = environment {
        plan.push(FragmentSlot::new(format!("local-{environment}"), Optional));
    }
    plan.push(FragmentSlot {
        extensions: ExtensionFilter::EnvironmentAware,
        ..FragmentSlot::new(ENV_OVERRIDES_FRAGMENT, Optional)
    });
    plan
}
