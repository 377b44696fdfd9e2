pub mod topics;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extract::PageMetadata;
pub use topics::TopicDictionary;

pub const MAX_TOPICS: usize = 5;
const CONFIDENCE_FLOOR: f64 = 0.3;
const RELEVANCE_RATIO: f64 = 0.3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicClassification {
    pub primary_topic: Option<String>,
    pub topics: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicScore {
    pub topic: String,
    pub matches: usize,
}

/// Rule-based multi-label scorer over a fixed keyword dictionary.
#[derive(Debug, Clone)]
pub struct Classifier {
    dictionary: TopicDictionary,
}

impl Classifier {
    pub fn new(dictionary: TopicDictionary) -> Self {
        Self { dictionary }
    }

    pub fn standard() -> Result<Self, regex::Error> {
        TopicDictionary::standard().map(Self::new)
    }

    pub fn dictionary(&self) -> &TopicDictionary {
        &self.dictionary
    }

    /// Topics with at least one hit, best first. Equal counts keep dictionary order.
    pub fn score(&self, text: &str) -> Vec<TopicScore> {
        let mut scores: Vec<TopicScore> = self
            .dictionary
            .topics()
            .iter()
            .filter_map(|t| {
                let matches = t.count_matches(text);
                (matches > 0).then(|| TopicScore {
                    topic: t.name().to_string(),
                    matches,
                })
            })
            .collect();
        // stable
        scores.sort_by(|a, b| b.matches.cmp(&a.matches));
        scores
    }

    pub fn classify(&self, metadata: &PageMetadata) -> TopicClassification {
        let scores = self.score(&metadata.weighted_text());
        let Some(primary) = scores.first() else {
            debug!("no topic keywords matched");
            return TopicClassification::default();
        };

        let total: usize = scores.iter().map(|s| s.matches).sum();
        let primary_score = primary.matches as f64;
        let confidence = (primary_score / total.max(1) as f64 + CONFIDENCE_FLOOR).min(1.0);
        let threshold = (primary_score * RELEVANCE_RATIO).max(1.0);

        let topics: Vec<String> = scores
            .iter()
            .take(MAX_TOPICS)
            .filter(|s| s.matches as f64 >= threshold)
            .map(|s| s.topic.clone())
            .collect();

        info!(
            "Classified as: {} (confidence: {:.2})",
            primary.topic, confidence
        );

        TopicClassification {
            primary_topic: Some(primary.topic.clone()),
            topics,
            confidence: round2(confidence),
        }
    }
}

/// Two decimals, rounded from the exact binary value (`0.425` is stored as 0.42499.. and gives 0.42).
fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classifier() -> Classifier {
        Classifier::standard().unwrap()
    }

    fn titled(title: &str) -> PageMetadata {
        PageMetadata {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn with_keywords(keywords: &[&str]) -> PageMetadata {
        PageMetadata {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn apple_software_update_is_technology() {
        let c = classifier().classify(&titled("Apple unveils new iPhone software update"));
        assert_eq!(c.primary_topic.as_deref(), Some("Technology"));
        assert!(c.topics.contains(&"Technology".to_string()));
        assert!(c.confidence > 0.3);
    }

    #[test]
    fn no_text_gives_empty_classification() {
        let c = classifier().classify(&PageMetadata::default());
        assert_eq!(c.primary_topic, None);
        assert!(c.topics.is_empty());
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn text_without_keywords_gives_empty_classification() {
        let c = classifier().classify(&titled("Lorem ipsum dolor sit amet"));
        assert_eq!(c, TopicClassification::default());
    }

    #[test]
    fn confidence_from_share_plus_floor() {
        // Technology 2, Sports 1: 2/3 + 0.3 = 0.9666..
        let c = classifier().classify(&with_keywords(&["software", "software", "game"]));
        assert_eq!(c.primary_topic.as_deref(), Some("Technology"));
        assert_eq!(c.topics, vec!["Technology", "Sports"]);
        assert_eq!(c.confidence, 0.97);
    }

    #[test]
    fn confidence_capped_at_one() {
        // title counts three times: Technology 3 of 3
        let c = classifier().classify(&titled("software"));
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn ties_resolve_to_canonical_order() {
        let a = classifier().classify(&with_keywords(&["software", "politics"]));
        let b = classifier().classify(&with_keywords(&["politics", "software"]));
        assert_eq!(a.primary_topic.as_deref(), Some("Technology"));
        assert_eq!(a, b);
        assert_eq!(a.topics, vec!["Technology", "Politics"]);
        assert_eq!(a.confidence, 0.8);
    }

    #[test]
    fn shared_keyword_counts_for_both_topics() {
        let c = classifier().classify(&with_keywords(&["nature"]));
        assert_eq!(c.primary_topic.as_deref(), Some("Science"));
        assert_eq!(c.topics, vec!["Science", "Outdoor"]);
    }

    #[test]
    fn weak_topics_below_threshold_are_dropped() {
        // Technology 10 -> threshold 3. Sports 3 stays, Health 2 goes.
        let mut kws = vec!["software"; 10];
        kws.extend(["game", "team", "player", "doctor", "hospital"]);
        let c = classifier().classify(&with_keywords(&kws));
        assert_eq!(c.topics, vec!["Technology", "Sports"]);
    }

    #[test]
    fn at_most_five_topics() {
        let kws = ["software", "election", "stock", "soccer", "movie", "doctor", "physics"];
        let c = classifier().classify(&with_keywords(&kws));
        assert_eq!(
            c.topics,
            vec!["Technology", "Politics", "Business", "Sports", "Entertainment"]
        );
        // total counts all seven topics, not just the top five
        assert_eq!(c.confidence, round2(1.0 / 7.0 + 0.3));
    }

    #[test]
    fn confidence_rounds_the_stored_value() {
        // eight topics, one hit each: 1/8 + 0.3 is just below 0.425
        let kws = ["software", "election", "stock", "soccer", "movie", "doctor", "physics", "travel"];
        let c = classifier().classify(&with_keywords(&kws));
        assert_eq!(c.primary_topic.as_deref(), Some("Technology"));
        assert_eq!(c.confidence, 0.42);

        assert_eq!(round2(5.0 / 40.0 + 0.3), 0.42);
        assert_eq!(round2(7.0 / 40.0 + 0.3), 0.47);
        assert_eq!(round2(2.0 / 3.0 + 0.3), 0.97);
    }

    #[test]
    fn field_weights_shift_the_winner() {
        // description x2 beats a single keyword
        let m = PageMetadata {
            description: Some("a football story".into()),
            keywords: vec!["software".into()],
            ..Default::default()
        };
        let c = classifier().classify(&m);
        assert_eq!(c.primary_topic.as_deref(), Some("Sports"));

        // h1 x2 plus h2 x1 for the same word
        let m = PageMetadata {
            h1_tags: vec!["climate".into()],
            h2_tags: vec!["climate".into(), "recipe".into()],
            ..Default::default()
        };
        let scores = classifier().score(&m.weighted_text());
        assert_eq!(scores[0], TopicScore { topic: "Science".into(), matches: 3 });
    }

    #[test]
    fn score_lists_only_matching_topics() {
        let scores = classifier().score("cloud data and a stock market");
        assert_eq!(
            scores,
            vec![
                TopicScore { topic: "Technology".into(), matches: 2 },
                TopicScore { topic: "Business".into(), matches: 2 },
            ]
        );
    }

    fn text_field() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-z ]{0,60}")
    }

    fn vocab() -> impl Strategy<Value = Vec<String>> {
        let words = vec![
            "software", "election", "stock", "soccer", "movie", "doctor", "physics", "travel",
            "cart", "hiking", "nature", "ai", "lorem", "ipsum",
        ];
        proptest::collection::vec(proptest::sample::select(words).prop_map(String::from), 0..12)
    }

    proptest! {
        #[test]
        fn confidence_is_bounded_and_rounded(
            title in text_field(),
            description in text_field(),
            keywords in vocab(),
            h1 in vocab(),
        ) {
            let m = PageMetadata { title, description, keywords, h1_tags: h1, ..Default::default() };
            let c = classifier().classify(&m);
            prop_assert!((0.0..=1.0).contains(&c.confidence));
            prop_assert!(((c.confidence * 100.0).round() - c.confidence * 100.0).abs() < 1e-6);
            prop_assert!(c.topics.len() <= MAX_TOPICS);
            match &c.primary_topic {
                Some(p) => prop_assert_eq!(c.topics.first(), Some(p)),
                None => prop_assert!(c.topics.is_empty() && c.confidence == 0.0),
            }
            let mut dedup = c.topics.clone();
            dedup.sort();
            dedup.dedup();
            prop_assert_eq!(dedup.len(), c.topics.len());
            prop_assert_eq!(classifier().classify(&m), c);
        }

        #[test]
        fn more_title_hits_never_lower_rank(keywords in vocab(), extra in 0usize..4) {
            let rank = |title: String| {
                let m = PageMetadata { title: Some(title), keywords: keywords.clone(), ..Default::default() };
                classifier()
                    .score(&m.weighted_text())
                    .iter()
                    .position(|s| s.topic == "Health")
            };
            let base = rank("doctor".to_string());
            let boosted = rank(vec!["doctor"; 1 + extra].join(" "));
            prop_assert!(boosted <= base);
        }
    }
}
