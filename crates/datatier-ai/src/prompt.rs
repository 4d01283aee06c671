//! Prompt building and response parsing for column classification

use datatier_core::ClassificationRequest;
use serde::Deserialize;

use crate::config::ResponseFormat;
use crate::error::RemoteError;

const TAXONOMY: &str = r#"You are a senior data classification officer working for the Saudi National Data Management Office (NDMO). Given a column name and a small sample of its values, your task is to classify the sensitivity and impact of this data based on both:
- The Saudi NDMO Data Classification Policy
- The Saudi Personal Data Protection Law (PDPL)

Classify each column into only one of the following Impact Levels:
- Top Secret: Highly sensitive data; unauthorized disclosure could threaten national security or cause severe damage to the Kingdom's strategic interests.
- Confidential: Sensitive data; unauthorized disclosure could cause significant harm to the state or organizations.
- Restricted: Data requiring special protection; unauthorized disclosure does not pose a serious threat.
- Public: Data that can be shared with the public without restrictions.
"#;

/// System prompt describing the taxonomy and the expected reply shape.
pub fn system_prompt(format: ResponseFormat) -> String {
    let instructions = match format {
        ResponseFormat::Json => {
            r#"
Respond in the following JSON format only:
{
  "column": "ColumnName",
  "classification": "Public | Restricted | Confidential | Top Secret",
  "justification": "Short explanation for classification based on Saudi regulations."
}
"#
        }
        ResponseFormat::Delimited => {
            r#"
Respond with a single line of the form `Label: reason`, where Label is exactly one of Public, Restricted, Confidential, Top Secret and reason is one sentence.
"#
        }
    };
    format!(
        "{}{}If in doubt, always choose the safer classification.",
        TAXONOMY, instructions
    )
}

/// Build the user message for one column.
pub fn build_user_prompt(request: &ClassificationRequest) -> String {
    format!(
        "Column name: {}\nSample values: {}",
        request.column_name(),
        format_samples(request.samples())
    )
}

fn format_samples(samples: &[String]) -> String {
    let quoted: Vec<String> = samples
        .iter()
        .map(|s| format!("'{}'", s.replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Label text and justification extracted from a model reply. The label is
/// not validated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub label_text: String,
    pub justification: String,
}

#[derive(Deserialize)]
struct JsonReply {
    classification: String,
    #[serde(alias = "reason")]
    justification: String,
}

/// Parse a JSON-shaped reply, tolerating markdown code fences.
pub fn parse_json_response(response: &str) -> Result<ParsedReply, RemoteError> {
    let trimmed = response.trim();
    let reply: JsonReply = match serde_json::from_str(trimmed) {
        Ok(reply) => reply,
        Err(e) if !trimmed.contains("```") => return Err(e.into()),
        Err(_) => serde_json::from_str(strip_code_fence(trimmed))?,
    };
    Ok(ParsedReply {
        label_text: reply.classification.trim().to_string(),
        justification: reply.justification,
    })
}

fn strip_code_fence(response: &str) -> &str {
    let body = match response.split_once("```json") {
        Some((_, rest)) => rest,
        None => response.split_once("```").map(|(_, rest)| rest).unwrap_or(response),
    };
    body.split("```").next().unwrap_or(body).trim()
}

/// Parse a `Label: reason` reply. Without a `:` the whole text is the label.
pub fn parse_delimited_response(response: &str) -> ParsedReply {
    let content = response.trim();
    match content.split_once(':') {
        Some((label, reason)) => ParsedReply {
            label_text: label.trim().to_string(),
            justification: reason.trim().to_string(),
        },
        None => ParsedReply {
            label_text: content.to_string(),
            justification: String::new(),
        },
    }
}
