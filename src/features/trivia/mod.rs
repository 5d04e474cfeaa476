//! # Feature: Trivia
//!
//! Trivia rounds against the Open Trivia DB. A setup message collects category
//! and difficulty through select menus; the round itself walks a fixed list of
//! questions with answer buttons.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.3.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Playable rounds with category/difficulty selection

pub mod client;

pub use client::{decode_entities, TriviaCategory, TriviaClient, TriviaQuestion};

use dashmap::DashMap;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::core::constants::{BLURPLE, CONTRAST_COLOR};
use crate::core::response::truncate;

pub const TRIVIA_CATEGORY_SELECT: &str = "trivia_category";
pub const TRIVIA_DIFFICULTY_SELECT: &str = "trivia_difficulty";
pub const TRIVIA_START: &str = "trivia_start";
/// Answer buttons append the answer index: `trivia_answer_0` .. `trivia_answer_3`
pub const TRIVIA_ANSWER_PREFIX: &str = "trivia_answer_";

const SESSION_TTL: Duration = Duration::from_secs(300);

static SETUPS: OnceLock<DashMap<u64, TriviaSetup>> = OnceLock::new();
static ROUNDS: OnceLock<DashMap<u64, TriviaRound>> = OnceLock::new();

/// Setup sessions, keyed by the setup message id.
pub fn active_setups() -> &'static DashMap<u64, TriviaSetup> {
    SETUPS.get_or_init(DashMap::new)
}

/// Running rounds, keyed by the question message id.
pub fn active_rounds() -> &'static DashMap<u64, TriviaRound> {
    ROUNDS.get_or_init(DashMap::new)
}

/// Category/difficulty selection in progress.
pub struct TriviaSetup {
    pub author_id: u64,
    pub amount: u8,
    pub category: Option<u32>,
    pub difficulty: Option<String>,
    pub categories: Vec<TriviaCategory>,
    created: Instant,
}

impl TriviaSetup {
    pub fn new(author_id: u64, amount: u8, categories: Vec<TriviaCategory>) -> Self {
        TriviaSetup {
            author_id,
            amount,
            category: None,
            difficulty: None,
            categories,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() > SESSION_TTL
    }

    pub fn category_name(&self) -> &str {
        let id = self.category.unwrap_or(0);
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or("Any Category")
    }
}

/// Outcome of pressing an answer button.
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_text: String,
    pub finished: bool,
}

/// A running trivia round.
pub struct TriviaRound {
    pub author_id: u64,
    questions: Vec<TriviaQuestion>,
    index: usize,
    score: u32,
    created: Instant,
}

impl TriviaRound {
    pub fn new(author_id: u64, questions: Vec<TriviaQuestion>) -> Self {
        TriviaRound {
            author_id,
            questions,
            index: 0,
            score: 0,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() > SESSION_TTL
    }

    pub fn current(&self) -> &TriviaQuestion {
        &self.questions[self.index]
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// 1-based question number for display.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// Register the pressed answer and advance to the next question.
    pub fn answer(&mut self, choice: usize) -> AnswerOutcome {
        let question = &self.questions[self.index];
        let correct = choice == question.correct;
        let correct_text = question.answers[question.correct].clone();

        if correct {
            self.score += 1;
        }
        self.index += 1;

        AnswerOutcome {
            correct,
            correct_text,
            finished: self.index >= self.questions.len(),
        }
    }

    /// Embed for the current question.
    pub fn render(&self) -> CreateEmbed {
        let question = self.current();
        let mut embed = CreateEmbed::default();
        embed
            .title(format!("Trivia: Question {}/{}", self.position(), self.total()))
            .color(BLURPLE)
            .description(&question.prompt)
            .footer(|f| {
                f.text(format!(
                    "{} | {} | Score: {}",
                    question.category, question.difficulty, self.score
                ))
            });
        embed
    }

    /// Final score embed.
    pub fn render_final(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::default();
        embed
            .title("Trivia: Round Over")
            .color(CONTRAST_COLOR)
            .description(format!(
                "You answered **{}/{}** questions correctly.",
                self.score,
                self.total()
            ));
        embed
    }
}

/// Category and difficulty select menus plus the start button.
///
/// Discord caps select menus at 25 options; the category list is truncated to
/// fit, with "Any Category" always first.
pub fn create_setup_components(setup: &TriviaSetup) -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_select_menu(|menu| {
                menu.custom_id(TRIVIA_CATEGORY_SELECT)
                    .placeholder("Select a category")
                    .min_values(1)
                    .max_values(1)
                    .options(|options| {
                        for category in setup.categories.iter().take(25) {
                            options.create_option(|opt| {
                                opt.label(truncate(&category.name, 100))
                                    .value(category.id.to_string())
                                    .default_selection(
                                        category.id == setup.category.unwrap_or(0),
                                    )
                            });
                        }
                        options
                    })
            })
        })
        .create_action_row(|row| {
            row.create_select_menu(|menu| {
                menu.custom_id(TRIVIA_DIFFICULTY_SELECT)
                    .placeholder("Select a difficulty")
                    .min_values(1)
                    .max_values(1)
                    .options(|options| {
                        for (label, value) in [
                            ("Any", "any"),
                            ("Easy", "easy"),
                            ("Medium", "medium"),
                            ("Hard", "hard"),
                        ] {
                            options.create_option(|opt| {
                                opt.label(label).value(value).default_selection(
                                    setup.difficulty.as_deref().unwrap_or("any") == value,
                                )
                            });
                        }
                        options
                    })
            })
        })
        .create_action_row(|row| {
            row.create_button(|btn| {
                btn.custom_id(TRIVIA_START)
                    .label("Start")
                    .emoji('✅')
                    .style(ButtonStyle::Success)
            })
        })
        .to_owned()
}

/// One answer button per shuffled answer.
pub fn create_answer_buttons(question: &TriviaQuestion) -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            for (i, answer) in question.answers.iter().enumerate() {
                row.create_button(|btn| {
                    btn.custom_id(format!("{TRIVIA_ANSWER_PREFIX}{i}"))
                        .label(truncate(answer, 80))
                        .style(ButtonStyle::Primary)
                });
            }
            row
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> TriviaQuestion {
        TriviaQuestion {
            prompt: "prompt".to_string(),
            category: "General".to_string(),
            difficulty: "easy".to_string(),
            answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
        }
    }

    #[test]
    fn test_round_scores_and_advances() {
        let mut round = TriviaRound::new(1, vec![question(0), question(2)]);
        assert_eq!(round.position(), 1);

        let outcome = round.answer(0);
        assert!(outcome.correct);
        assert!(!outcome.finished);
        assert_eq!(round.position(), 2);

        let outcome = round.answer(1);
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_text, "c");
        assert!(outcome.finished);
        assert_eq!(round.score(), 1);
    }

    #[test]
    fn test_single_question_round_finishes_immediately() {
        let mut round = TriviaRound::new(1, vec![question(3)]);
        let outcome = round.answer(3);
        assert!(outcome.correct);
        assert!(outcome.finished);
        assert_eq!(round.score(), 1);
    }

    #[test]
    fn test_setup_category_name() {
        let categories = vec![
            TriviaCategory { id: 0, name: "Any Category".to_string() },
            TriviaCategory { id: 9, name: "General Knowledge".to_string() },
        ];
        let mut setup = TriviaSetup::new(1, 5, categories);
        assert_eq!(setup.category_name(), "Any Category");

        setup.category = Some(9);
        assert_eq!(setup.category_name(), "General Knowledge");
    }

    #[test]
    fn test_components_build() {
        let setup = TriviaSetup::new(
            1,
            5,
            vec![TriviaCategory { id: 0, name: "Any Category".to_string() }],
        );
        let _setup_components = create_setup_components(&setup);
        let _answer_components = create_answer_buttons(&question(0));
    }
}
