/// Reviewer decision parsed from free-form feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Approve,
    Exit,
    Revise(String),
}

impl Feedback {
    /// Case-insensitive keyword match. "approve" wins over "exit".
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("approve") {
            Self::Approve
        } else if lowered.contains("exit") {
            Self::Exit
        } else {
            Self::Revise(text.to_string())
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Exit => "exit",
            Self::Revise(_) => "revise",
        }
    }
}
