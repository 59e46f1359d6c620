//! Query builder: maps a freeform topic string to source-specific queries
//!
//! Pure functions, no state, no I/O. The X query builder uses quoted phrases,
//! OR chaining, known community handles, and negative spam filters. Sources
//! whose search endpoints take free text (Hacker News, Bluesky) get plain
//! comma-split terms instead.

/// Spam/noise operators appended to every X query
const NEGATIVE_FILTERS: &[&str] = &[
    "-is:retweet",
    "-giveaway",
    "-airdrop",
    "-whitelist",
    "-presale",
    "-NFT",
    "-\"join our\"",
    "-\"dm me\"",
    "-\"sign up\"",
    "-is:nullcast",
];

/// Topic keyword -> known community handles
const COMMUNITY_HANDLES: &[(&str, &[&str])] = &[
    ("local ai", &["@ggerganov", "@ollama", "@LMStudioAI"]),
    ("llama", &["@ggerganov", "@MetaAI"]),
    ("ollama", &["@ollama"]),
    ("mlx", &["@ml_explore"]),
    ("stable diffusion", &["@StabilityAI"]),
    ("flux", &["@bfl_ml"]),
    ("comfyui", &["@comfyanonymous"]),
    ("image generation", &["@StabilityAI", "@bfl_ml"]),
];

/// Words too generic to search on their own
const FILLER: &[&str] = &[
    "and",
    "the",
    "for",
    "with",
    "including",
    "models",
    "model",
    "such",
    "like",
    "also",
    "about",
    "from",
    "that",
    "this",
    "into",
    "using",
    "based",
    "their",
    "other",
    "these",
    "image",
    "generation",
];

fn is_filler(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    FILLER.iter().any(|f| *f == lower)
}

/// Parse a topic string into multi-word phrases and single keywords
///
/// Splits on commas first to get phrase-level chunks, then classifies each
/// chunk as a quoted phrase (multi-word) or a single keyword.
fn extract_phrases_and_keywords(topic: &str) -> (Vec<String>, Vec<String>) {
    let mut phrases = Vec::new();
    let mut keywords = Vec::new();

    for chunk in topic.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let words: Vec<&str> = chunk.split_whitespace().collect();
        let mut cleaned: Vec<&str> = words
            .iter()
            .copied()
            .filter(|w| !is_filler(w) || words.len() <= 2)
            .collect();
        if cleaned.is_empty() {
            cleaned = words.clone();
        }

        if cleaned.len() >= 2 {
            phrases.push(cleaned.join(" "));
        } else if cleaned.len() == 1 && cleaned[0].len() > 2 {
            keywords.push(cleaned[0].to_string());
        }
    }

    // No comma-separated chunks produced anything: fall back to word level
    if phrases.is_empty() && keywords.is_empty() {
        for word in topic.split_whitespace() {
            let word = word.trim_end_matches(',');
            if word.len() > 2 && !is_filler(word) {
                keywords.push(word.to_string());
            }
        }
    }

    (phrases, keywords)
}

/// Find community handles relevant to the topic terms
fn find_community_handles(phrases: &[String], keywords: &[String]) -> Vec<&'static str> {
    let mut handles: Vec<&'static str> = Vec::new();
    let terms: Vec<String> = phrases
        .iter()
        .chain(keywords)
        .map(|t| t.to_ascii_lowercase())
        .collect();

    for term in &terms {
        for (key, accounts) in COMMUNITY_HANDLES {
            if term.contains(key) || key.contains(term.as_str()) {
                for account in *accounts {
                    if !handles.contains(account) {
                        handles.push(account);
                    }
                }
            }
        }
    }

    handles.sort_unstable();
    handles
}

/// Build X search queries from a freeform topic string
///
/// Strategy:
/// 1. Broad sweep: all phrases and keywords OR'd together
/// 2. Top terms paired with signal words (release, benchmark, ...)
/// 3. Known community accounts anchored to topic terms
/// 4. Fallback: the quoted topic itself
///
/// Deterministic for a given topic.
pub fn build_twitter_queries(topic: &str) -> Vec<String> {
    let (phrases, keywords) = extract_phrases_and_keywords(topic);
    let handles = find_community_handles(&phrases, &keywords);
    let negative = NEGATIVE_FILTERS.join(" ");

    let all_terms: Vec<String> = phrases
        .iter()
        .chain(keywords.iter())
        .map(|t| format!("\"{}\"", t))
        .collect();

    let mut queries = Vec::new();

    if !all_terms.is_empty() {
        let or_chain = all_terms[..all_terms.len().min(10)].join(" OR ");
        queries.push(format!("({}) {}", or_chain, negative));
    }

    let top_terms = &all_terms[..all_terms.len().min(5)];
    if !top_terms.is_empty() {
        let or_top = top_terms.join(" OR ");
        let signal = "\"release\" OR \"new\" OR \"benchmark\" OR \"comparison\" OR \"update\" OR \"workflow\" OR \"tutorial\" OR \"guide\"";
        queries.push(format!("({}) ({}) {}", or_top, signal, negative));
    }

    if !handles.is_empty() && !all_terms.is_empty() {
        let handle_or = handles[..handles.len().min(6)]
            .iter()
            .map(|h| format!("from:{}", h.trim_start_matches('@')))
            .collect::<Vec<_>>()
            .join(" OR ");
        // Anchor with topic terms so we don't pull the accounts' whole feed
        let anchor = all_terms[..all_terms.len().min(3)].join(" OR ");
        queries.push(format!("({}) ({}) {}", handle_or, anchor, negative));
    }

    if queries.is_empty() {
        queries.push(format!("\"{}\" {}", topic, negative));
    }

    queries
}

/// Build plain search terms for sources without query operators
///
/// Comma-split; the whole topic becomes a single term when it has no commas.
pub fn build_search_terms(topic: &str) -> Vec<String> {
    let terms: Vec<String> = topic
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    if terms.is_empty() {
        vec![topic.to_string()]
    } else {
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_queries_are_deterministic() {
        let topic = "local llms, quantization, llama";
        assert_eq!(build_twitter_queries(topic), build_twitter_queries(topic));
    }

    #[test]
    fn twitter_queries_carry_negative_filters() {
        let queries = build_twitter_queries("robotics");
        assert!(!queries.is_empty());
        for query in &queries {
            assert!(query.contains("-is:retweet"), "missing filters: {}", query);
            assert!(query.contains("-giveaway"));
        }
    }

    #[test]
    fn multi_word_chunks_become_quoted_phrases() {
        let queries = build_twitter_queries("stable diffusion, flux");
        assert!(queries[0].contains("\"stable diffusion\""));
        assert!(queries[0].contains("\"flux\""));
        assert!(queries[0].contains(" OR "));
    }

    #[test]
    fn known_topics_get_a_community_query() {
        let queries = build_twitter_queries("ollama");
        assert!(queries.iter().any(|q| q.contains("from:ollama")));
    }

    #[test]
    fn unknown_topics_skip_the_community_query() {
        let queries = build_twitter_queries("robotics");
        assert!(queries.iter().all(|q| !q.contains("from:")));
    }

    #[test]
    fn filler_only_topic_falls_back_to_quoted_topic() {
        let queries = build_twitter_queries("");
        assert_eq!(queries.len(), 1);
        assert!(queries[0].starts_with("\"\""));
    }

    #[test]
    fn search_terms_split_on_commas() {
        assert_eq!(
            build_search_terms("local llms, quantization , llama"),
            vec!["local llms", "quantization", "llama"]
        );
        assert_eq!(build_search_terms("robotics"), vec!["robotics"]);
    }
}
