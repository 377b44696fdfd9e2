use regex::{Regex, RegexBuilder};

/// Topic names and their keywords, in canonical order. Ranking ties resolve to the earlier topic.
pub const STANDARD_TOPICS: &[(&str, &[&str])] = &[
    (
        "Technology",
        &[
            "software", "technology", "computer", "digital", "app", "programming", "code",
            "developer", "tech", "gadget", "smartphone", "ai", "machine learning", "data",
            "cloud", "internet", "cyber", "hardware", "electronics",
        ],
    ),
    (
        "Politics",
        &[
            "politics", "government", "election", "president", "congress", "senate", "democrat",
            "republican", "policy", "vote", "political", "legislation", "law", "candidate",
            "campaign", "party", "administration",
        ],
    ),
    (
        "Business",
        &[
            "business", "company", "market", "stock", "finance", "economy", "investment",
            "startup", "entrepreneur", "revenue", "profit", "trade", "commerce", "retail",
            "sales", "corporate", "industry",
        ],
    ),
    (
        "Sports",
        &[
            "sports", "game", "team", "player", "score", "championship", "football",
            "basketball", "baseball", "soccer", "athlete", "coach", "tournament", "league",
        ],
    ),
    (
        "Entertainment",
        &[
            "entertainment", "movie", "film", "music", "celebrity", "actor", "actress",
            "show", "tv", "television", "streaming", "netflix", "concert", "album", "artist",
        ],
    ),
    (
        "Health",
        &[
            "health", "medical", "doctor", "hospital", "disease", "treatment", "medicine",
            "patient", "wellness", "fitness", "nutrition", "diet", "exercise", "healthcare",
        ],
    ),
    (
        "Science",
        &[
            "science", "research", "study", "scientist", "discovery", "experiment", "biology",
            "physics", "chemistry", "space", "nasa", "climate", "environment", "nature",
        ],
    ),
    (
        "Lifestyle",
        &[
            "lifestyle", "fashion", "travel", "food", "recipe", "cooking", "home", "garden",
            "decor", "beauty", "style", "trend", "vacation", "destination",
        ],
    ),
    (
        "E-commerce",
        &[
            "buy", "price", "product", "shop", "cart", "order", "shipping", "customer",
            "review", "rating", "deal", "discount", "amazon", "store", "purchase", "checkout",
        ],
    ),
    (
        "Outdoor",
        &[
            "outdoor", "camping", "hiking", "nature", "adventure", "trail", "backpack",
            "gear", "wilderness", "park", "mountain", "forest", "fishing", "climbing",
        ],
    ),
];

#[derive(Debug, Clone)]
pub struct Topic {
    name: String,
    keywords: Vec<String>,
    // None when the keyword list is empty; such a topic never matches.
    matcher: Option<Regex>,
}

impl Topic {
    fn compile(name: &str, keywords: &[&str]) -> Result<Self, regex::Error> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let matcher = if keywords.is_empty() {
            None
        } else {
            let alternation = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self {
            name: name.to_string(),
            keywords,
            matcher,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Non-overlapping, case-insensitive, whole-word keyword hits.
    pub fn count_matches(&self, text: &str) -> usize {
        self.matcher
            .as_ref()
            .map_or(0, |re| re.find_iter(text).count())
    }
}

/// Compiled keyword matchers per topic. Read-only once built; share it by reference.
#[derive(Debug, Clone)]
pub struct TopicDictionary {
    topics: Vec<Topic>,
}

impl TopicDictionary {
    pub fn standard() -> Result<Self, regex::Error> {
        Self::from_definitions(STANDARD_TOPICS)
    }

    pub fn from_definitions(definitions: &[(&str, &[&str])]) -> Result<Self, regex::Error> {
        let topics = definitions
            .iter()
            .map(|(name, keywords)| Topic::compile(name, keywords))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { topics })
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
