//! The poem flow.

use anyhow::ensure;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;

use super::Flow;
use super::FlowError;

/// The smallest sentence count a caller may request.
pub const MIN_SENTENCE_COUNT: u8 = 1;

/// The largest sentence count a caller may request.
pub const MAX_SENTENCE_COUNT: u8 = 10;

/// The largest sentence count picked when none is requested.
const MAX_RANDOM_SENTENCE_COUNT: u8 = 5;

/// Adjectives used when composing lines.
const ADJECTIVES: &[&str] = &[
    "quiet", "silver", "restless", "golden", "patient", "hollow", "bright", "ancient", "gentle",
    "wandering",
];

/// Nouns used when composing lines.
const NOUNS: &[&str] = &[
    "river", "lantern", "harbor", "meadow", "compiler", "thread", "mountain", "signal", "garden",
    "tide",
];

/// Verbs used when composing lines.
const VERBS: &[&str] = &[
    "whispers to", "drifts past", "waits beside", "sings of", "follows", "remembers", "outlasts",
    "leans toward",
];

/// Overrides for the poem flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PoemOverrides {
    /// The number of sentences in the poem (`1` to `10`).
    ///
    /// If not provided, a count between `1` and `5` is picked at random.
    #[serde(default)]
    pub sentence_count: Option<u8>,
}

/// The result of a poem flow execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PoemResult {
    /// The number of sentences in the poem.
    pub sentence_count: u8,
    /// The poem text, one sentence per line.
    pub poem: String,
}

/// A flow that writes a short poem.
#[derive(Debug)]
pub struct PoemFlow {
    /// The number of sentences to write.
    sentence_count: u8,
    /// The poem, once written.
    poem: Option<String>,
}

impl PoemFlow {
    /// Gets the number of sentences the flow will write.
    pub fn sentence_count(&self) -> u8 {
        self.sentence_count
    }
}

/// Picks a random word from a word list.
fn pick<'a>(rng: &mut impl Rng, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

/// Composes a single sentence.
fn compose_sentence(rng: &mut impl Rng) -> String {
    let sentence = format!(
        "the {} {} {} the {} {}.",
        pick(rng, ADJECTIVES),
        pick(rng, NOUNS),
        pick(rng, VERBS),
        pick(rng, ADJECTIVES),
        pick(rng, NOUNS),
    );

    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => sentence,
    }
}

impl Flow for PoemFlow {
    type Output = PoemResult;
    type Overrides = PoemOverrides;

    const NAME: &'static str = "poem_flow";

    fn new(overrides: Self::Overrides) -> Result<Self, FlowError> {
        let sentence_count = match overrides.sentence_count {
            Some(count) if (MIN_SENTENCE_COUNT..=MAX_SENTENCE_COUNT).contains(&count) => count,
            Some(count) => {
                return Err(FlowError::InvalidOverrides {
                    flow: Self::NAME,
                    message: format!(
                        "`sentence_count` must be between {MIN_SENTENCE_COUNT} and \
                         {MAX_SENTENCE_COUNT}, got {count}"
                    ),
                });
            }
            None => rand::rng().random_range(MIN_SENTENCE_COUNT..=MAX_RANDOM_SENTENCE_COUNT),
        };

        Ok(Self {
            sentence_count,
            poem: None,
        })
    }

    fn execute(&mut self) -> anyhow::Result<()> {
        ensure!(self.sentence_count > 0, "cannot write a poem with no sentences");

        let mut rng = rand::rng();
        let lines: Vec<_> = (0..self.sentence_count)
            .map(|_| compose_sentence(&mut rng))
            .collect();

        self.poem = Some(lines.join("\n"));
        Ok(())
    }

    fn result(&self) -> Option<Self::Output> {
        self.poem.as_ref().map(|poem| PoemResult {
            sentence_count: self.sentence_count,
            poem: poem.clone(),
        })
    }
}
