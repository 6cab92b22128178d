use super::fallback;
use super::types::{InterestOverTime, Payload};
use super::{RegionAttempt, TrendsService};

pub const REALTIME_REGIONS: [&str; 4] = ["KR", "US", "GB", "JP"];

/// High-volume keywords used both as the comparison set and as padding.
pub const CANDIDATE_KEYWORDS: [&str; 10] = [
    "코로나", "날씨", "주식", "부동산", "뉴스", "스포츠", "연예", "게임", "쇼핑", "여행",
];

/// Google Trends compares at most five keywords per payload.
pub const MAX_PAYLOAD_KEYWORDS: usize = 5;

pub const REALTIME_TIMEFRAME: &str = "now 7-d";

pub const TREND_COUNT: usize = 10;

impl TrendsService {
    pub async fn fetch_realtime_trends(&self) -> Vec<String> {
        tracing::info!("Fetching realtime trends");

        for region in REALTIME_REGIONS {
            match self.attempt_realtime(region).await {
                RegionAttempt::Found(trends) => {
                    tracing::info!("Got interest over time for {}", region);
                    return trends;
                }
                RegionAttempt::Empty => {
                    tracing::warn!("No interest data for {}", region);
                }
                RegionAttempt::Failed(e) => {
                    tracing::error!("Realtime trends attempt for {} failed: {}", region, e);
                }
            }
        }

        tracing::warn!("All regions failed, serving fallback trends");
        fallback::fallback_trends()
    }

    async fn attempt_realtime(&self, region: &str) -> RegionAttempt<Vec<String>> {
        self.pause().await;

        let keywords = CANDIDATE_KEYWORDS[..MAX_PAYLOAD_KEYWORDS]
            .iter()
            .map(|k| k.to_string())
            .collect();
        let payload = Payload::new(keywords, REALTIME_TIMEFRAME, region);

        match self.provider.interest_over_time(&payload).await {
            Ok(interest) if interest.is_empty() => RegionAttempt::Empty,
            Ok(interest) => RegionAttempt::Found(rank_latest(&interest, &CANDIDATE_KEYWORDS)),
            Err(e) => RegionAttempt::Failed(e),
        }
    }
}

/// Order keywords by their value in the most recent row, then pad with
/// unused candidates until [`TREND_COUNT`] is reached.
pub fn rank_latest(interest: &InterestOverTime, candidates: &[&str]) -> Vec<String> {
    let mut trends: Vec<String> = Vec::with_capacity(TREND_COUNT);

    if let Some(latest) = interest.rows.last() {
        let mut ranked: Vec<(&String, i64)> = interest
            .keywords
            .iter()
            .zip(latest.values.iter().copied())
            .collect();
        // stable: ties keep request order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        for (keyword, _) in ranked {
            if !trends.contains(keyword) {
                trends.push(keyword.clone());
            }
        }
    }

    for candidate in candidates {
        if trends.len() >= TREND_COUNT {
            break;
        }
        if !trends.iter().any(|t| t == candidate) {
            trends.push(candidate.to_string());
        }
    }

    trends.truncate(TREND_COUNT);
    trends
}
