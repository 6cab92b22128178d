use super::types::RelatedQueries;

/// Served when no region produced interest data.
pub const FALLBACK_TRENDS: [&str; 10] = [
    "뉴스", "날씨", "음악", "영화", "주식", "부동산", "게임", "스포츠", "쇼핑", "건강",
];

/// Keywords eligible for bundled sample related queries.
pub const COMMON_KEYWORDS: [&str; 10] = [
    "날씨", "뉴스", "코로나", "주식", "연예", "게임", "쇼핑", "여행", "부동산", "스포츠",
];

pub fn fallback_trends() -> Vec<String> {
    FALLBACK_TRENDS.iter().map(|k| k.to_string()).collect()
}

pub fn is_common_keyword(keyword: &str) -> bool {
    COMMON_KEYWORDS.contains(&keyword)
}

// TODO: bundle per-keyword sample tables for COMMON_KEYWORDS; until then
// the sample fallback is indistinguishable from "no data".
pub fn sample_related_queries(keyword: &str) -> RelatedQueries {
    tracing::debug!("No bundled sample related queries for '{}'", keyword);
    RelatedQueries::default()
}
