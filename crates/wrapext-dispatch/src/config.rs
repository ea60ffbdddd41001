/// SDK contract version declared to the host during construction.
pub const SDK_VERSION: i32 = 1;

/// Component identifier used when none is configured. The JavaScript side
/// must register the same identifier.
pub const DEFAULT_COMPONENT_ID: &str = "wrapext_sample";

/// Controls extension registration and action behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Messaging namespace registered with the host. Must not collide with any
    /// other extension's identifier.
    pub component_id: String,
    /// Contract version passed to `set_sdk_version`.
    pub sdk_version: i32,
    /// When true, actions that notify the user show a native dialog; otherwise
    /// they log the notification.
    pub native_dialogs: bool,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            component_id: DEFAULT_COMPONENT_ID.to_string(),
            sdk_version: SDK_VERSION,
            native_dialogs: cfg!(windows),
        }
    }
}

impl ExtensionConfig {
    pub fn with_component_id(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = component_id.into();
        self
    }

    pub fn with_native_dialogs(mut self, enabled: bool) -> Self {
        self.native_dialogs = enabled;
        self
    }
}
