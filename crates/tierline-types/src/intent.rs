//! The closed set of intent categories and the classifier output shape.

use serde::{Deserialize, Serialize};

/// A user-request intent category.
///
/// This is a closed enumeration: the classifier validates provider
/// output against it and substitutes [`Intent::GeneralChat`] for
/// anything unrecognized. Wire names are SCREAMING_SNAKE_CASE
/// (e.g. "SEND_MESSAGE").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    // Communication
    SendMessage,
    ReplyMessage,
    DraftMessage,
    ReadMessages,
    // Document creation
    CreateDocx,
    CreateXlsx,
    CreatePdf,
    CreatePptx,
    CreateText,
    // Research
    WebSearch,
    Summarize,
    Compare,
    FactCheck,
    // Code
    WriteCode,
    DebugCode,
    ExplainCode,
    DeployCode,
    GitOperation,
    // Scheduling
    SetReminder,
    SetRecurring,
    BookAppointment,
    CheckCalendar,
    // File operations
    ReadFile,
    EditFile,
    OrganizeFiles,
    ConvertFile,
    DownloadFile,
    // System
    Status,
    MemoryUpdate,
    PreferenceSet,
    Help,
    Feedback,
    // General
    GeneralChat,
}

impl Intent {
    /// Every intent category, in declaration order. Used to enumerate
    /// the closed set in classification prompts.
    pub const ALL: [Intent; 33] = [
        Intent::SendMessage,
        Intent::ReplyMessage,
        Intent::DraftMessage,
        Intent::ReadMessages,
        Intent::CreateDocx,
        Intent::CreateXlsx,
        Intent::CreatePdf,
        Intent::CreatePptx,
        Intent::CreateText,
        Intent::WebSearch,
        Intent::Summarize,
        Intent::Compare,
        Intent::FactCheck,
        Intent::WriteCode,
        Intent::DebugCode,
        Intent::ExplainCode,
        Intent::DeployCode,
        Intent::GitOperation,
        Intent::SetReminder,
        Intent::SetRecurring,
        Intent::BookAppointment,
        Intent::CheckCalendar,
        Intent::ReadFile,
        Intent::EditFile,
        Intent::OrganizeFiles,
        Intent::ConvertFile,
        Intent::DownloadFile,
        Intent::Status,
        Intent::MemoryUpdate,
        Intent::PreferenceSet,
        Intent::Help,
        Intent::Feedback,
        Intent::GeneralChat,
    ];

    /// The wire name of this intent (e.g. "SET_REMINDER").
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SendMessage => "SEND_MESSAGE",
            Intent::ReplyMessage => "REPLY_MESSAGE",
            Intent::DraftMessage => "DRAFT_MESSAGE",
            Intent::ReadMessages => "READ_MESSAGES",
            Intent::CreateDocx => "CREATE_DOCX",
            Intent::CreateXlsx => "CREATE_XLSX",
            Intent::CreatePdf => "CREATE_PDF",
            Intent::CreatePptx => "CREATE_PPTX",
            Intent::CreateText => "CREATE_TEXT",
            Intent::WebSearch => "WEB_SEARCH",
            Intent::Summarize => "SUMMARIZE",
            Intent::Compare => "COMPARE",
            Intent::FactCheck => "FACT_CHECK",
            Intent::WriteCode => "WRITE_CODE",
            Intent::DebugCode => "DEBUG_CODE",
            Intent::ExplainCode => "EXPLAIN_CODE",
            Intent::DeployCode => "DEPLOY_CODE",
            Intent::GitOperation => "GIT_OPERATION",
            Intent::SetReminder => "SET_REMINDER",
            Intent::SetRecurring => "SET_RECURRING",
            Intent::BookAppointment => "BOOK_APPOINTMENT",
            Intent::CheckCalendar => "CHECK_CALENDAR",
            Intent::ReadFile => "READ_FILE",
            Intent::EditFile => "EDIT_FILE",
            Intent::OrganizeFiles => "ORGANIZE_FILES",
            Intent::ConvertFile => "CONVERT_FILE",
            Intent::DownloadFile => "DOWNLOAD_FILE",
            Intent::Status => "STATUS",
            Intent::MemoryUpdate => "MEMORY_UPDATE",
            Intent::PreferenceSet => "PREFERENCE_SET",
            Intent::Help => "HELP",
            Intent::Feedback => "FEEDBACK",
            Intent::GeneralChat => "GENERAL_CHAT",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the
    /// closed set -- callers substitute [`Intent::GeneralChat`].
    pub fn parse(name: &str) -> Option<Intent> {
        Intent::ALL.iter().copied().find(|i| i.as_str() == name)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of intent classification and entity extraction.
///
/// Produced once per request by the classifier and consumed by the
/// planner; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// The classified intent. Defaults to general chat on ambiguity.
    pub intent: Intent,
    /// Extracted entities (topic, format, framework, ...).
    pub entities: serde_json::Map<String, serde_json::Value>,
    /// Quick complexity score for the message, 1-10.
    pub complexity_score: u8,
    /// Tier recommended by the complexity score, 1-4.
    pub recommended_tier: u8,
    /// Detected language code (e.g. "en", "hi").
    pub language: String,
    /// Tools typically required for this intent.
    pub requires_tools: Vec<String>,
    /// Raw provider response text, kept for audit.
    pub raw_response: String,
}

impl Default for ParsedIntent {
    fn default() -> Self {
        Self {
            intent: Intent::GeneralChat,
            entities: serde_json::Map::new(),
            complexity_score: 3,
            recommended_tier: 1,
            language: "en".to_string(),
            requires_tools: Vec::new(),
            raw_response: String::new(),
        }
    }
}
