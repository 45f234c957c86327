// src/services/chatbot.rs
use uuid::Uuid;

use crate::error::AppError;
use crate::message::ChatRequest;
use crate::services::llm_client::LanguageModel;
use crate::services::session_manager::SessionManager;

/// Instruction template. The model picks one of four categories; the reply is passed
/// through untouched.
pub const PROMPT_TEMPLATE: &str = r#"Classify the given user question into one of the specified categories based on its nature, including all defined categories.

- 'generate name suggestions': If the question is related to this product's functionalities AND the user wants to generate names suggestions
- 'create name report': If the question is related to this product's functionalities AND the user wants to understand meaning/etymology of the name
- 'generate ideas': If the question is related to this product's functionalities AND the user wants to generate ideas for cool creative names

If the question does not fit into any of these categories, return 'not related'.

# Steps

1. Analyze the user question.
2. Determine which category the question fits into based on its structure, keywords and relevancy to the {product_information}
3. Return the corresponding category or 'Not related' if none apply.

# Output Format

- Return only the category word: 'generate name suggestions' or 'create name report' or 'generate ideas' or 'not related'
- Do not include any extra text or quotes in the output.

# Examples

- **Example 1**
  * Question: I'm looking to name my child. Will you be able to help me?
  * Response: generate name suggestions

- **Example 2**
  * Question: Give me some ideas to call my child.
  * Response: generate name suggestions

- **Example 3**
  * Question: I'm looking for cool names
  * Response: generate name suggestions

- **Example 4**
  * Question: I'm looking to understand the process of child birth
  * Response: not related

- **Example 5**
  * Question: What is the purpose of life?
  * Response: not related

- **Example 6**
  * Question: What is the first thing to do after giving birth to a child?
  * Response: not related

- **Example 7**
 * Question: What is the meaning of the name - Maya?
 * Response: create name report

- **Example 8**
 * Question: What is the origin of the name - John?
 * Response: create name report

- **Example 9**
 * Question: Give me ideas to generate cool names for my kid
 * Response: generate ideas

- **Example 10**
 * Question: Give me ideas to put into user preferences while generating ideas
 * Response: generate ideas

Use information from the conversation history only if relevant to the above user query, otherwise ignore the history.
Conversation history with the user:
{history}

User question: {question}

Production functionalities: {product_information}
"#;

pub const PRODUCT_INFORMATION: &str = "Name My Baby is a baby naming assistant application that helps parents find the perfect name for their child. The application provides:
1. AI-powered name suggestions based on user preferences
2. Detailed name reports with etymology, meaning, and cultural significance
3. Creative ideas for naming inspiration
4. Voice analysis to hear how names sound in different accents
5. Organization tools (shortlist, maybe, rejected buckets)

The application understands and responds to queries related to:
- Generating baby name suggestions
- Providing detailed reports about specific names (etymology, meaning, origin)
- Generating creative ideas for naming
- User preferences and customization";

/// Fill `{history}`, `{question}` and `{product_information}` in one pass.
/// Substituted text is never scanned again, so user input containing braces is inert.
pub fn render_prompt(history: &str, question: &str) -> String {
    let mut out = String::with_capacity(PROMPT_TEMPLATE.len() + history.len() + question.len() * 2);
    let mut rest = PROMPT_TEMPLATE;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = ["history", "question", "product_information"]
            .into_iter()
            .find(|name| tail[1..].starts_with(name) && tail[1 + name.len()..].starts_with('}'))
            .map(|name| {
                let text = match name {
                    "history" => history,
                    "question" => question,
                    _ => PRODUCT_INFORMATION,
                };
                (text, name.len() + 2)
            });

        match value {
            Some((text, consumed)) => {
                out.push_str(text);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Message text as stored and sent to the model, with the caller's user id appended.
pub fn annotate_message(message: &str, user_id: Option<&str>) -> String {
    match user_id {
        Some(id) => format!("{message} User ID: {id}"),
        None => message.to_string(),
    }
}

pub fn new_session_id() -> String {
    format!("session-{}", Uuid::new_v4())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub session_id: String,
    pub reply: String,
    /// Transcript length after this turn was recorded.
    pub turns: usize,
}

/// One request/response cycle. Nothing is written to the session store unless the
/// model call succeeds.
pub async fn respond(
    sessions: &SessionManager,
    model: &dyn LanguageModel,
    request: &ChatRequest,
) -> Result<TurnOutcome, AppError> {
    let message = request.effective_message().ok_or(AppError::MissingMessage)?;

    let session_id = request
        .session_id()
        .map(str::to_string)
        .unwrap_or_else(new_session_id);

    let transcript = sessions.get_or_create(&session_id).await;
    let history = sessions.render_history(&session_id).await;
    tracing::debug!(session_id = %session_id, prior_turns = transcript.len(), "resolved session");

    let question = annotate_message(message, request.user_id());
    let prompt = render_prompt(&history, &question);

    let reply = model.complete(&prompt).await.inspect_err(|e| {
        tracing::warn!(session_id = %session_id, error = %e, "language model call failed");
    })?;

    let turns = sessions.append_exchange(&session_id, question, reply.as_str()).await?;
    tracing::info!(session_id = %session_id, turns, "chat turn recorded");

    Ok(TurnOutcome { session_id, reply, turns })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_all_parts() {
        let prompt = render_prompt("Human: hi\nAI: not related", "find names User ID: u42");
        assert!(prompt.contains("Conversation history with the user:\nHuman: hi\nAI: not related\n"));
        assert!(prompt.contains("User question: find names User ID: u42\n"));
        assert!(prompt.contains("Production functionalities: Name My Baby is"));
        assert!(prompt.contains("relevancy to the Name My Baby is"));
        assert!(!prompt.contains("{history}"));
        assert!(!prompt.contains("{product_information}"));
    }

    #[test]
    fn placeholders_in_user_text_are_not_expanded() {
        let prompt = render_prompt("", "what is {history} and {product_information}?");
        assert!(prompt.contains("User question: what is {history} and {product_information}?"));
    }

    #[test]
    fn user_id_annotation() {
        assert_eq!(annotate_message("find names", Some("u42")), "find names User ID: u42");
        assert_eq!(annotate_message("find names", None), "find names");
    }

    #[test]
    fn fabricated_session_ids_are_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert!(a.starts_with("session-"));
        assert_ne!(a, b);
    }
}
