use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{reject, ProviderError};

const PROVIDER: &str = "openai";
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// What the caption generator is asked to write about. Tone and keywords
/// come from the workspace brand profile when one is selected.
#[derive(Debug, Clone)]
pub struct CaptionBrief {
    pub topic: String,
    pub platform: Option<String>,
    pub tone: Option<String>,
    pub keywords: Vec<String>,
    pub count: usize,
}

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "temperature": TEMPERATURE,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user },
                ],
            }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }

        let completion = response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ProviderError::Malformed {
                provider: PROVIDER,
                detail: "completion had no choices".to_string(),
            })
    }

    pub async fn generate_captions(
        &self,
        brief: &CaptionBrief,
    ) -> Result<Vec<String>, ProviderError> {
        let mut system = String::from(
            "You write social media captions. Reply with one caption per line, \
             no numbering and no commentary.",
        );
        if let Some(tone) = &brief.tone {
            system.push_str(&format!(" Write in a {} tone.", tone));
        }
        if !brief.keywords.is_empty() {
            system.push_str(&format!(
                " Work in these brand keywords where natural: {}.",
                brief.keywords.join(", ")
            ));
        }

        let platform = brief.platform.as_deref().unwrap_or("social media");
        let user = format!(
            "Write {} caption options for a {} post about: {}",
            brief.count, platform, brief.topic
        );

        let raw = self.chat(&system, &user).await?;
        let mut captions = parse_lines(&raw);
        captions.truncate(brief.count);
        Ok(captions)
    }

    pub async fn generate_hashtags(
        &self,
        content: &str,
        count: usize,
    ) -> Result<Vec<String>, ProviderError> {
        let system = "You suggest social media hashtags. Reply with hashtags only, \
                      separated by spaces.";
        let user = format!(
            "Suggest {} hashtags for this post:\n\n{}",
            count, content
        );

        let raw = self.chat(system, &user).await?;
        Ok(parse_hashtags(&raw, count))
    }
}

/// One item per line, tolerant of the numbering and bullets models add even
/// when told not to.
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            strip_list_marker(line.trim())
                .trim_matches('"')
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Drops "1.", "2)" numbering and "-"/"*" bullets. Digits only count as
/// numbering when a `.` or `)` follows, so a caption that opens with a year
/// keeps it.
fn strip_list_marker(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < line.len() {
        if let Some(numbered) = rest.strip_prefix(['.', ')']) {
            return numbered.trim_start();
        }
        return line;
    }
    line.trim_start_matches(['-', '*']).trim_start()
}

/// Pull hashtag tokens out of free-form model output, deduplicated
/// case-insensitively and capped at `limit`.
pub fn parse_hashtags(raw: &str, limit: usize) -> Vec<String> {
    let mut seen = Vec::new();
    let mut tags = Vec::new();
    for token in raw.split(|c: char| c.is_whitespace() || c == ',') {
        let word: String = token
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if word.is_empty() {
            continue;
        }
        let key = word.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        tags.push(format!("#{}", word));
        if tags.len() == limit {
            break;
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_strips_numbering_and_quotes() {
        let raw = "1. \"Fresh drops every Friday\"\n2) Your feed called. It wants this.\n- Weekend mode: on\n\n";
        assert_eq!(
            parse_lines(raw),
            vec![
                "Fresh drops every Friday".to_string(),
                "Your feed called. It wants this.".to_string(),
                "Weekend mode: on".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_lines_keeps_plain_lines() {
        assert_eq!(parse_lines("just one caption"), vec!["just one caption"]);
    }

    #[test]
    fn test_parse_lines_keeps_captions_that_open_with_digits() {
        assert_eq!(
            parse_lines("2026 predictions you need to see\n1. 10 reasons to switch"),
            vec![
                "2026 predictions you need to see".to_string(),
                "10 reasons to switch".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_hashtags_normalizes_and_dedupes() {
        let raw = "#Summer, summer #SALE\nvibes #Sale";
        assert_eq!(
            parse_hashtags(raw, 10),
            vec!["#Summer", "#SALE", "#vibes"]
        );
    }

    #[test]
    fn test_parse_hashtags_respects_limit() {
        let raw = "#a #b #c #d";
        assert_eq!(parse_hashtags(raw, 2), vec!["#a", "#b"]);
    }
}
