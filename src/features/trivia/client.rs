//! Open Trivia DB API client.
//!
//! The API serves question text with HTML entities; everything is decoded
//! before it reaches Discord.

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;

const CATEGORY_URL: &str = "https://opentdb.com/api_category.php";
const QUESTION_URL: &str = "https://opentdb.com/api.php";

/// A question category as listed by the API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TriviaCategory {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    trivia_categories: Vec<TriviaCategory>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    category: String,
    difficulty: String,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    response_code: u8,
    results: Vec<ApiQuestion>,
}

/// A decoded question with shuffled answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaQuestion {
    pub prompt: String,
    pub category: String,
    pub difficulty: String,
    pub answers: Vec<String>,
    /// Index of the correct entry in `answers`
    pub correct: usize,
}

#[derive(Clone)]
pub struct TriviaClient {
    http: reqwest::Client,
}

impl TriviaClient {
    pub fn new() -> Self {
        TriviaClient {
            http: reqwest::Client::new(),
        }
    }

    /// Fetch all categories. An "Any Category" pseudo-entry with id 0 is
    /// prepended for the select menu.
    pub async fn categories(&self) -> Result<Vec<TriviaCategory>> {
        let response: CategoriesResponse = self
            .http
            .get(CATEGORY_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut categories = vec![TriviaCategory {
            id: 0,
            name: "Any Category".to_string(),
        }];
        categories.extend(response.trivia_categories);
        Ok(categories)
    }

    /// Fetch `amount` questions (clamped to 1..=10). Category 0/None means
    /// any category; empty difficulty means any difficulty.
    pub async fn questions(
        &self,
        amount: u8,
        category: Option<u32>,
        difficulty: Option<&str>,
    ) -> Result<Vec<TriviaQuestion>> {
        let amount = amount.clamp(1, 10);

        let mut query: Vec<(&str, String)> = vec![("amount", amount.to_string())];
        if let Some(id) = category.filter(|&id| id != 0) {
            query.push(("category", id.to_string()));
        }
        if let Some(diff) = difficulty.filter(|d| !d.is_empty()) {
            query.push(("difficulty", diff.to_string()));
        }

        let response: QuestionsResponse = self
            .http
            .get(QUESTION_URL)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.response_code != 0 {
            bail!(
                "trivia API returned response code {}",
                response.response_code
            );
        }

        Ok(response.results.into_iter().map(into_question).collect())
    }
}

impl Default for TriviaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn into_question(api: ApiQuestion) -> TriviaQuestion {
    let correct_text = decode_entities(&api.correct_answer);
    let mut answers: Vec<String> = api
        .incorrect_answers
        .iter()
        .map(|a| decode_entities(a))
        .collect();
    answers.push(correct_text.clone());
    answers.shuffle(&mut rand::rng());

    let correct = answers
        .iter()
        .position(|a| *a == correct_text)
        .unwrap_or(0);

    TriviaQuestion {
        prompt: decode_entities(&api.question),
        category: decode_entities(&api.category),
        difficulty: api.difficulty,
        answers,
        correct,
    }
}

/// Decode the HTML entities the trivia API embeds in its payloads.
///
/// Handles the named entities that actually occur in the corpus plus decimal
/// and hex numeric references; unknown sequences pass through untouched.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // Entity names are short; anything further out is a bare ampersand
        let Some(end) = tail.find(';').filter(|&end| end <= 10) else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };

        let entity = &tail[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "ldquo" => Some('\u{201c}'),
            "rdquo" => Some('\u{201d}'),
            "lsquo" => Some('\u{2018}'),
            "rsquo" => Some('\u{2019}'),
            "hellip" => Some('\u{2026}'),
            "ndash" => Some('\u{2013}'),
            "mdash" => Some('\u{2014}'),
            "eacute" => Some('\u{e9}'),
            "deg" => Some('\u{b0}'),
            _ => {
                if let Some(num) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(num, 16).ok().and_then(char::from_u32)
                } else if let Some(num) = entity.strip_prefix('#') {
                    num.parse::<u32>().ok().and_then(char::from_u32)
                } else {
                    None
                }
            }
        };

        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode_entities("Rock &amp; Roll &quot;Hits&quot;"),
            "Rock & Roll \"Hits\""
        );
        assert_eq!(decode_entities("It&#039;s Pok&eacute;mon"), "It's Pokémon");
        assert_eq!(decode_entities("1 &lt; 2 &gt; 0"), "1 < 2 > 0");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
    }

    #[test]
    fn test_decode_leaves_unknown_sequences() {
        assert_eq!(decode_entities("AT&T rocks"), "AT&T rocks");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_into_question_tracks_correct_index() {
        let api = ApiQuestion {
            category: "General".to_string(),
            difficulty: "easy".to_string(),
            question: "2 + 2?".to_string(),
            correct_answer: "4".to_string(),
            incorrect_answers: vec!["3".to_string(), "5".to_string(), "22".to_string()],
        };

        for _ in 0..20 {
            let question = into_question(ApiQuestion {
                category: api.category.clone(),
                difficulty: api.difficulty.clone(),
                question: api.question.clone(),
                correct_answer: api.correct_answer.clone(),
                incorrect_answers: api.incorrect_answers.clone(),
            });
            assert_eq!(question.answers.len(), 4);
            assert_eq!(question.answers[question.correct], "4");
        }
    }

    #[test]
    fn test_questions_response_parses() {
        let payload = r#"{
            "response_code": 0,
            "results": [{
                "category": "Science &amp; Nature",
                "type": "multiple",
                "difficulty": "medium",
                "question": "What is H2O?",
                "correct_answer": "Water",
                "incorrect_answers": ["Air", "Fire", "Earth"]
            }]
        }"#;
        let parsed: QuestionsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.response_code, 0);
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].correct_answer, "Water");
    }

    #[test]
    fn test_categories_response_parses() {
        let payload = r#"{"trivia_categories":[{"id":9,"name":"General Knowledge"}]}"#;
        let parsed: CategoriesResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.trivia_categories[0].id, 9);
    }
}
