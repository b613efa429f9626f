//! Human-readable cluster labels from member titles and abstracts.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use grouper_core::types::ArticleRecord;

/// Multilingual stop-word set (English + Portuguese) dropped from label
/// candidates.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "of", "for", "to", "in", "on", "with", "using",
    "um", "uma", "de", "da", "do", "para", "em",
];

const PUNCTUATION: &[char] = &['.', ',', ':', ';', '(', ')', '[', ']'];

const LABEL_TOKENS: usize = 4;

/// Label one cluster: the 4 most frequent non-stop-word tokens across
/// member titles and abstracts, joined by " / ". Frequency ties break
/// toward the token encountered first. Falls back to `cluster_<id>`
/// when nothing survives filtering.
pub(crate) fn label_cluster(
    cid: usize,
    members: &[String],
    by_id: &FxHashMap<&str, &ArticleRecord>,
) -> String {
    // token -> (count, first-encounter rank)
    let mut counts: FxHashMap<String, (usize, usize)> = FxHashMap::default();
    let mut rank = 0usize;

    for member in members {
        let Some(article) = by_id.get(member.as_str()) else {
            continue;
        };
        for source in [&article.title, &article.abstract_text] {
            for raw in source.to_lowercase().split_whitespace() {
                let token = raw.trim_matches(PUNCTUATION);
                if token.chars().count() <= 2 || STOP_WORDS.contains(&token) {
                    continue;
                }
                counts
                    .entry(token.to_string())
                    .and_modify(|(count, _)| *count += 1)
                    .or_insert_with(|| {
                        rank += 1;
                        (1, rank)
                    });
            }
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, rank_a)), (_, (count_b, rank_b))| {
        count_b.cmp(count_a).then(rank_a.cmp(rank_b))
    });

    let top: SmallVec<[String; LABEL_TOKENS]> = ranked
        .into_iter()
        .take(LABEL_TOKENS)
        .map(|(token, _)| token)
        .collect();

    if top.is_empty() {
        format!("cluster_{cid}")
    } else {
        top.join(" / ")
    }
}
