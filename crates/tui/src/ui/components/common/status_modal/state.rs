use composer_types::Severity;

/// Content of the blocking notification shown after a submission attempt.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusModalState {
    title: String,
    message: String,
    severity: Severity,
}

impl StatusModalState {
    /// Show the server's status text.
    pub fn show_status(&mut self, status: impl Into<String>) {
        self.title = "Composition saved".to_string();
        self.message = status.into();
        self.severity = Severity::Info;
    }

    /// Show a failure that kept the composition from being saved.
    pub fn show_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = message.into();
        self.severity = Severity::Error;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}
