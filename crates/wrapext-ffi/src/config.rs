use wrapext_dispatch::ExtensionConfig;

/// Overrides the registered component identifier.
pub const COMPONENT_ID_ENV: &str = "WRAPEXT_COMPONENT_ID";
/// `0`/`false` logs notifications instead of showing native dialogs.
pub const NATIVE_DIALOGS_ENV: &str = "WRAPEXT_NATIVE_DIALOGS";

/// Extension settings for a library loaded by the host, read from the
/// environment on top of [`ExtensionConfig::default`].
pub fn config_from_env() -> ExtensionConfig {
    config_from_values(
        std::env::var(COMPONENT_ID_ENV).ok().as_deref(),
        std::env::var(NATIVE_DIALOGS_ENV).ok().as_deref(),
    )
}

pub(crate) fn config_from_values(
    component_id: Option<&str>,
    native_dialogs: Option<&str>,
) -> ExtensionConfig {
    let mut config = ExtensionConfig::default();
    if let Some(component_id) = component_id.map(str::trim).filter(|id| !id.is_empty()) {
        config.component_id = component_id.to_string();
    }
    if let Some(flag) = native_dialogs.and_then(parse_flag) {
        config.native_dialogs = flag;
    }
    config
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use wrapext_dispatch::DEFAULT_COMPONENT_ID;

    use super::*;

    #[test]
    fn unset_uses_defaults() {
        assert_eq!(config_from_values(None, None), ExtensionConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let config = config_from_values(Some(" my_addon "), Some("off"));
        assert_eq!(config.component_id, "my_addon");
        assert!(!config.native_dialogs);
    }

    #[test]
    fn blank_component_id_is_ignored() {
        let config = config_from_values(Some("  "), Some("maybe"));
        assert_eq!(config.component_id, DEFAULT_COMPONENT_ID);
        assert_eq!(config.native_dialogs, ExtensionConfig::default().native_dialogs);
    }
}
