//! Prompt construction for the brief-generation LLM call
//!
//! The user payload is a pure function of the post set: posts are sorted by
//! `(source, id)` before serialization and no run metadata (pull time, query
//! list) is embedded, so replaying a saved post file reproduces the exact
//! payload of the run that wrote it.

use serde::Serialize;

use crate::model::Post;

/// Focus used when no topic is given, for both the system prompt and the
/// source queries
pub const DEFAULT_FOCUS: &str =
    "local AI: running LLMs and image models on consumer hardware, \
     quantization, inference engines, and open-weight model releases";

/// Build the fixed system prompt describing the brief's tone and structure
pub fn build_system_prompt(topic: Option<&str>) -> String {
    let focus = topic.unwrap_or(DEFAULT_FOCUS);

    format!(
        "You are an intelligence analyst writing a daily scouting brief.\n\
         Focus area: {focus}\n\n\
         You will receive a JSON payload of recent posts collected from \
         social platforms and link aggregators. Write a brief with these \
         sections:\n\
         1. HEADLINES — the 3-5 most significant developments, one line each\n\
         2. DETAILS — a short paragraph per headline with context and why it \
         matters\n\
         3. SIGNALS — smaller items, rumors, and early indicators worth \
         watching\n\n\
         Rules:\n\
         - Cite the permalink URL for every claim\n\
         - Prefer primary announcements over commentary\n\
         - Ignore spam, engagement bait, and off-topic posts\n\
         - If the payload is thin, say so rather than padding\n\
         - Plain Markdown, no preamble"
    )
}

#[derive(Serialize)]
struct PostDigest<'a> {
    post_count: usize,
    posts: Vec<&'a Post>,
}

/// Render the user message embedding the collected posts
pub fn build_user_payload(posts: &[Post]) -> String {
    let mut ordered: Vec<&Post> = posts.iter().collect();
    ordered.sort_by(|a, b| (a.source, &a.id).cmp(&(b.source, &b.id)));

    let digest = PostDigest {
        post_count: ordered.len(),
        posts: ordered,
    };

    // Serialization of our own types cannot fail
    let json = serde_json::to_string_pretty(&digest).unwrap_or_default();
    format!("Brief me.\n\n{}", json)
}
