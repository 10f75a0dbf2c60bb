use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid deck: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("deck has no testimonials")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,

    /// Badge text; derived from `name` when omitted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub initials: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub highlight: String,

    pub body: String,
}

impl Testimonial {
    pub fn new(name: &str, highlight: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            initials: initials_for(name),
            highlight: highlight.to_string(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub testimonials: Vec<Testimonial>,
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, DeckError> {
        let mut deck: Deck = serde_yaml::from_str(contents)?;
        if deck.testimonials.is_empty() {
            return Err(DeckError::Empty);
        }
        for t in &mut deck.testimonials {
            if t.initials.trim().is_empty() {
                t.initials = initials_for(&t.name);
            }
        }
        Ok(deck)
    }

    /// Built-in deck shown when no file is given.
    pub fn sample() -> Self {
        Self {
            title: Some("What our families say".to_string()),
            testimonials: vec![
                Testimonial::new(
                    "Maya Richardson",
                    "From a C to an A- in one term",
                    "Our tutor figured out in the first session that Maya understood the \
                     algebra but kept losing marks on setup. Two months later she was \
                     explaining it to her friends.",
                ),
                Testimonial::new(
                    "Jonah Weiss",
                    "Finally enjoys reading",
                    "Jonah used to dread book reports. The weekly sessions turned them into \
                     something he looks forward to, and his school noticed within weeks.",
                ),
                Testimonial::new(
                    "Priya Natarajan",
                    "Top 5% on the entrance exam",
                    "The practice plan was structured around Priya's weak spots instead of \
                     generic drills. She walked into the exam calm and prepared.",
                ),
                Testimonial::new(
                    "Leo Marchetti",
                    "Confidence, not just grades",
                    "Leo stopped saying he was bad at maths. That change mattered more to \
                     us than any test score, though the scores came too.",
                ),
            ],
        }
    }
}

/// First letter of the first and last words, uppercased.
pub fn initials_for(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = words.next().and_then(|w| w.chars().next());
    let last = words.last().and_then(|w| w.chars().next());
    first
        .into_iter()
        .chain(last)
        .flat_map(char::to_uppercase)
        .collect()
}
