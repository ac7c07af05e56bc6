//! Intent classification: model-backed with a keyword fallback.

use tracing::warn;

use tierline_llm::{GenerateOptions, ModelRouter};
use tierline_types::{Intent, ParsedIntent};

use crate::complexity::quick_score;
use crate::fenced::parse_with_fences;

/// Tools typically required to fulfill each intent.
const INTENT_TOOLS: &[(Intent, &[&str])] = &[
    (Intent::WriteCode, &["code_tools", "file_manager"]),
    (Intent::DebugCode, &["code_tools", "file_manager"]),
    (Intent::ExplainCode, &["code_tools"]),
    (Intent::DeployCode, &["code_tools", "deploy_tool"]),
    (Intent::GitOperation, &["git_manager"]),
    (Intent::WebSearch, &["web_search"]),
    (Intent::Summarize, &["web_search"]),
    (Intent::Compare, &["web_search"]),
    (Intent::CreateDocx, &["document_maker", "file_manager"]),
    (Intent::CreateXlsx, &["document_maker", "file_manager"]),
    (Intent::CreatePdf, &["document_maker", "file_manager"]),
    (Intent::CreatePptx, &["document_maker", "file_manager"]),
    (Intent::CreateText, &["file_manager"]),
    (Intent::SetReminder, &["scheduler"]),
    (Intent::SetRecurring, &["scheduler"]),
    (Intent::ReadFile, &["file_manager"]),
    (Intent::EditFile, &["file_manager"]),
    (Intent::SendMessage, &["messenger"]),
    (Intent::Status, &["system"]),
    (Intent::Help, &["system"]),
];

/// Tools typically needed for an intent. Unlisted intents need none.
pub fn required_tools(intent: Intent) -> Vec<String> {
    INTENT_TOOLS
        .iter()
        .find(|(i, _)| *i == intent)
        .map(|(_, tools)| tools.iter().map(|t| t.to_string()).collect())
        .unwrap_or_default()
}

const CLASSIFIER_SYSTEM: &str = "You are a precise intent classifier. Output only valid JSON.";

fn classification_prompt(message: &str) -> String {
    let categories = Intent::ALL
        .iter()
        .map(|i| i.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Analyze the user's message and output a JSON object with these fields:\n\
         - \"intent\": One of the following categories: {categories}\n\
         - \"entities\": A dict of extracted entities (topic, format, language, framework, etc.)\n\
         - \"content_length\": \"short\", \"medium\", or \"long\" expected output length\n\
         \n\
         User message: {message}\n\
         \n\
         Respond with ONLY valid JSON, no other text."
    )
}

/// Classify a user message.
///
/// Asks the router at a low complexity budget and parses the JSON
/// reply; unknown intent names and unparseable replies fall back to
/// keyword classification, so this always produces a usable result.
pub async fn classify_intent(text: &str, language: &str, router: &ModelRouter) -> ParsedIntent {
    let complexity = quick_score(text);

    let options = GenerateOptions {
        complexity_score: 2,
        system: Some(CLASSIFIER_SYSTEM.to_string()),
        max_tokens: 200,
        temperature: 0.1,
        ..GenerateOptions::default()
    };
    let response = router.generate(&classification_prompt(text), &options).await;

    if response.success {
        match parse_with_fences(&response.text) {
            Ok(data) => {
                let intent = data
                    .get("intent")
                    .and_then(|v| v.as_str())
                    .and_then(Intent::parse)
                    .unwrap_or(Intent::GeneralChat);
                let entities = data
                    .get("entities")
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_default();

                return ParsedIntent {
                    intent,
                    entities,
                    complexity_score: complexity.score,
                    recommended_tier: complexity.recommended_tier,
                    language: language.to_string(),
                    requires_tools: required_tools(intent),
                    raw_response: response.text,
                };
            }
            Err(err) => {
                warn!(error = %err, "intent response was not valid JSON, using keyword fallback");
            }
        }
    }

    keyword_classify(text, language, complexity.score, complexity.recommended_tier)
}

/// Keyword-based classification, used when no model is available or
/// the model's reply cannot be parsed. First matching rule wins.
pub fn keyword_classify(
    text: &str,
    language: &str,
    complexity_score: u8,
    recommended_tier: u8,
) -> ParsedIntent {
    let lower = text.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    let intent = if has(&[
        "write code",
        "write a function",
        "write a script",
        "write a program",
        "create function",
        "create a function",
        "create a script",
        "build",
        "implement",
        "function to",
        "python function",
        "javascript function",
        "class for",
        "module for",
    ]) {
        Intent::WriteCode
    } else if has(&["debug", "fix", "error", "bug"]) {
        Intent::DebugCode
    } else if has(&["explain code", "what does this"]) {
        Intent::ExplainCode
    } else if has(&["search", "find", "look up", "google"]) {
        Intent::WebSearch
    } else if has(&["summarize", "summary", "tldr"]) {
        Intent::Summarize
    } else if has(&["docx", "word document"]) {
        Intent::CreateDocx
    } else if has(&["xlsx", "spreadsheet", "excel"]) {
        Intent::CreateXlsx
    } else if has(&["pdf"]) {
        Intent::CreatePdf
    } else if has(&["pptx", "presentation", "slides"]) {
        Intent::CreatePptx
    } else if has(&["remind", "reminder", "alarm"]) {
        Intent::SetReminder
    } else if has(&["read file", "open file", "show file"]) {
        Intent::ReadFile
    } else if has(&["edit file", "modify file", "change file"]) {
        Intent::EditFile
    } else if has(&["status", "health", "cost"]) {
        Intent::Status
    } else if has(&["help", "what can you do"]) {
        Intent::Help
    } else if has(&["remember", "my name is"]) {
        Intent::MemoryUpdate
    } else if has(&["git", "commit", "push", "pull request"]) {
        Intent::GitOperation
    } else {
        Intent::GeneralChat
    };

    ParsedIntent {
        intent,
        entities: serde_json::Map::new(),
        complexity_score,
        recommended_tier,
        language: language.to_string(),
        requires_tools: required_tools(intent),
        raw_response: String::new(),
    }
}
