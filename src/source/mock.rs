use async_trait::async_trait;
use rand::RngExt;

use super::{QuoteError, QuoteSource};
use crate::quote::{Category, QuoteResult, RANDOM_CATEGORY};

/// One row of the built-in quote table.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub quote: &'static str,
    pub author: &'static str,
    pub image_url: &'static str,
}

const fn ex(quote: &'static str, author: &'static str, image_url: &'static str) -> Example {
    Example {
        quote,
        author,
        image_url,
    }
}

const COMFORT: &[Example] = &[
    ex(
        "Hard times always pass. And you will be stronger when they do.",
        "Paulo Coelho",
        "https://placekitten.com/500/500",
    ),
    ex(
        "The wound is the place where the light enters you.",
        "Rumi",
        "https://placekitten.com/500/501",
    ),
];

const MOTIVATION: &[Example] = &[
    ex(
        "If you don't do it now, you never will.",
        "Nike",
        "https://placekitten.com/501/500",
    ),
    ex(
        "Success is the sum of small efforts, repeated day in and day out.",
        "Robert Collier",
        "https://placekitten.com/501/501",
    ),
];

const HAPPINESS: &[Example] = &[
    ex(
        "Happiness is a habit. Cultivate it.",
        "Elbert Hubbard",
        "https://placekitten.com/502/500",
    ),
    ex(
        "When one door of happiness closes, another opens.",
        "Helen Keller",
        "https://placekitten.com/502/501",
    ),
];

const CHALLENGE: &[Example] = &[
    ex(
        "Without challenge there is no growth.",
        "George Bernard Shaw",
        "https://placekitten.com/503/500",
    ),
    ex(
        "Whether you think you can, or you think you can't, you're right.",
        "Henry Ford",
        "https://placekitten.com/503/501",
    ),
];

const SUCCESS: &[Example] = &[
    ex(
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
        "https://placekitten.com/504/500",
    ),
    ex(
        "Making today better than yesterday, that is true success.",
        "Ralph Waldo Emerson",
        "https://placekitten.com/504/501",
    ),
];

const LOVE: &[Example] = &[
    ex(
        "Love is the force that moves the world.",
        "Charlie Chaplin",
        "https://placekitten.com/505/500",
    ),
    ex(
        "Being loved is happiness, but loving is an even greater happiness.",
        "Leo Tolstoy",
        "https://placekitten.com/505/501",
    ),
];

const WISDOM: &[Example] = &[
    ex(
        "Knowledge is power.",
        "Francis Bacon",
        "https://placekitten.com/506/500",
    ),
    ex(
        "A wise man will make more opportunities than he finds.",
        "Francis Bacon",
        "https://placekitten.com/506/501",
    ),
];

const PEACE: &[Example] = &[
    ex(
        "Peace begins with a smile.",
        "Mother Teresa",
        "https://placekitten.com/507/500",
    ),
    ex(
        "In stillness you can find your true self.",
        "Ralph Waldo Emerson",
        "https://placekitten.com/507/501",
    ),
];

/// Built-in examples for a category.
pub fn examples(category: Category) -> &'static [Example] {
    match category {
        Category::Comfort => COMFORT,
        Category::Motivation => MOTIVATION,
        Category::Happiness => HAPPINESS,
        Category::Challenge => CHALLENGE,
        Category::Success => SUCCESS,
        Category::Love => LOVE,
        Category::Wisdom => WISDOM,
        Category::Peace => PEACE,
    }
}

/// Every built-in example across all categories.
pub fn all_examples() -> Vec<Example> {
    Category::ALL
        .into_iter()
        .flat_map(|c| examples(c).iter().copied())
        .collect()
}

/// Serves quotes from the built-in table. Used when no webhook is configured.
pub struct MockQuoteSource;

impl MockQuoteSource {
    /// Draw one quote without going through the async trait.
    pub fn draw(category: Option<Category>) -> QuoteResult {
        let pool: Vec<Example> = match category {
            Some(c) => examples(c).to_vec(),
            None => all_examples(),
        };

        let mut rng = rand::rng();
        let picked = pool[rng.random_range(0..pool.len())];

        QuoteResult {
            quote: Some(picked.quote.to_string()),
            author: Some(picked.author.to_string()),
            image_url: Some(picked.image_url.to_string()),
            category: Some(
                category
                    .map(|c| c.as_str())
                    .unwrap_or(RANDOM_CATEGORY)
                    .to_string(),
            ),
            timestamp: Some(crate::consts::now_iso8601()),
        }
    }
}

#[async_trait]
impl QuoteSource for MockQuoteSource {
    fn name(&self) -> &str {
        "built-in"
    }

    async fn fetch(&self, category: Option<Category>) -> Result<QuoteResult, QuoteError> {
        Ok(Self::draw(category))
    }
}
