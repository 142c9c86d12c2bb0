// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_INSTANCE_LABEL, SessionId, prompt_for_label};

/// Host supplied configuration for one terminal instance. Read once, when the surface
/// is mounted.
///
/// Deserializes from camelCase JSON so a host can pass the same object it hands its
/// UI layer, e.g. `{"instanceId": "left", "showWelcome": true}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerminalProps {
    pub instance_id: Option<String>,
    pub show_welcome: bool,
    /// Fixed prompt label. Without it the prompt follows the active session.
    pub prompt_label: Option<String>,
}

impl TerminalProps {
    pub fn new() -> Self { Self::default() }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn with_show_welcome(mut self, show_welcome: bool) -> Self {
        self.show_welcome = show_welcome;
        self
    }

    pub fn with_prompt_label(mut self, prompt_label: impl Into<String>) -> Self {
        self.prompt_label = Some(prompt_label.into());
        self
    }

    pub fn instance_label(&self) -> &str {
        self.instance_id.as_deref().unwrap_or(DEFAULT_INSTANCE_LABEL)
    }

    /// Prompt text for the given active session: the fixed label if one is set, else
    /// the session id, else the instance label.
    pub fn prompt(&self, active_session_id: Option<&SessionId>) -> String {
        let label = self
            .prompt_label
            .as_deref()
            .or(active_session_id.map(SessionId::as_str))
            .unwrap_or(self.instance_label());
        prompt_for_label(label)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_instance_label_falls_back_to_default() {
        assert_eq!(TerminalProps::default().instance_label(), "default");
        assert_eq!(
            TerminalProps::new().with_instance_id("left").instance_label(),
            "left"
        );
    }

    #[test]
    fn test_prompt_resolution_order() {
        let props = TerminalProps::new().with_instance_id("left");
        let t1 = SessionId::from("t1");
        assert_eq!(props.prompt(None), "left:~$ ");
        assert_eq!(props.prompt(Some(&t1)), "t1:~$ ");
        assert_eq!(
            props.with_prompt_label("eigent").prompt(Some(&t1)),
            "eigent:~$ "
        );
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let props: TerminalProps =
            serde_json::from_str(r#"{"instanceId":"right","showWelcome":true}"#).unwrap();
        assert_eq!(
            props,
            TerminalProps::new()
                .with_instance_id("right")
                .with_show_welcome(true)
        );
        let empty: TerminalProps = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TerminalProps::default());
    }
}
