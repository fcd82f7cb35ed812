//! Placeholder results served when the upstream is disabled or failing.

use chrono::{Duration, Local, Utc};
use rand::Rng;

use crate::{
    models::{SearchResponse, Video},
    normalize::DISPLAY_DATE_FORMAT,
};

const ADJECTIVES: [&str; 8] = [
    "Complete",
    "Ultimate",
    "Beginner's",
    "Advanced",
    "Professional",
    "Quick",
    "In-Depth",
    "Essential",
];

const CHANNELS: [&str; 8] = [
    "TechMaster",
    "LearnHub",
    "ProTutorials",
    "SkillForge",
    "MasterClass",
    "ExpertGuide",
    "QuickLearn",
    "DeepDive",
];

const THUMBNAIL_WIDTH: u32 = 480;
const THUMBNAIL_HEIGHT: u32 = 270;
const MAX_AGE_DAYS: i64 = 365;

/// Builds exactly `count` demo videos for `query`. Titles, channels and
/// thumbnails depend only on the query and position; ids and dates change on
/// every call.
pub fn generate(query: &str, count: usize) -> SearchResponse {
    let seed = query_hash(query);
    let mut rng = rand::thread_rng();
    let videos: Vec<Video> = (0..count)
        .map(|index| Video {
            id: Some(format!("demo-{index}-{}", Utc::now().timestamp_millis())),
            title: Some(format!(
                "{} {query} Tutorial - Part {}",
                ADJECTIVES[index % ADJECTIVES.len()],
                index + 1
            )),
            thumbnail: Some(format!(
                "https://picsum.photos/seed/{seed}{index}/{THUMBNAIL_WIDTH}/{THUMBNAIL_HEIGHT}"
            )),
            channel: Some(CHANNELS[index % CHANNELS.len()].to_string()),
            description: Some(format!(
                "Learn everything about {query} in this comprehensive video tutorial. \
                 Perfect for beginners and intermediate learners alike."
            )),
            published_at: Some(random_recent_date(&mut rng)),
            duration: None,
            view_count: None,
        })
        .collect();

    let total = videos.len() as u64;
    SearchResponse::new(videos, query, total)
}

fn random_recent_date(rng: &mut impl Rng) -> String {
    let days_ago = rng.gen_range(0..MAX_AGE_DAYS);
    (Local::now() - Duration::days(days_ago))
        .format(DISPLAY_DATE_FORMAT)
        .to_string()
}

/// 32-bit polynomial hash over UTF-16 code units (`h = 31 * h + c`), so the
/// thumbnail seed for a query is the same in every process.
fn query_hash(query: &str) -> i32 {
    query
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn produces_requested_count() {
        let response = generate("cats", 5);
        assert_eq!(response.videos.len(), 5);
        assert_eq!(response.total_results, 5);
        assert_eq!(response.query, "cats");
        assert!(response.next_page_token.is_none());

        assert!(generate("cats", 0).videos.is_empty());
    }

    #[test]
    fn titles_and_channels_cycle_independently() {
        let response = generate("python", 10);
        let titles: Vec<_> = response
            .videos
            .iter()
            .map(|video| video.title.clone().unwrap())
            .collect();
        assert_eq!(titles[0], "Complete python Tutorial - Part 1");
        assert_eq!(titles[1], "Ultimate python Tutorial - Part 2");
        assert_eq!(titles[2], "Beginner's python Tutorial - Part 3");
        assert_eq!(titles[7], "Essential python Tutorial - Part 8");
        assert_eq!(titles[8], "Complete python Tutorial - Part 9");

        assert_eq!(response.videos[0].channel.as_deref(), Some("TechMaster"));
        assert_eq!(response.videos[7].channel.as_deref(), Some("DeepDive"));
        assert_eq!(response.videos[9].channel.as_deref(), Some("LearnHub"));
    }

    #[test]
    fn repeated_calls_share_structure() {
        let first = generate("cats", 5);
        let second = generate("cats", 5);
        for (a, b) in first.videos.iter().zip(&second.videos) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.channel, b.channel);
            assert_eq!(a.thumbnail, b.thumbnail);
            assert_eq!(a.description, b.description);
        }
    }

    #[test]
    fn ids_carry_index_and_timestamp() {
        let before = Utc::now().timestamp_millis();
        let response = generate("cats", 3);
        let after = Utc::now().timestamp_millis();

        for (index, video) in response.videos.iter().enumerate() {
            let id = video.id.as_deref().unwrap();
            let rest = id
                .strip_prefix(&format!("demo-{index}-"))
                .expect("demo id prefix");
            let millis: i64 = rest.parse().unwrap();
            assert!(millis >= before && millis <= after);
        }
    }

    #[test]
    fn thumbnail_uses_query_hash_seed() {
        assert_eq!(query_hash(""), 0);
        assert_eq!(query_hash("cats"), 3_046_237);

        let response = generate("cats", 2);
        assert_eq!(
            response.videos[1].thumbnail.as_deref(),
            Some("https://picsum.photos/seed/30462371/480/270")
        );
    }

    #[test]
    fn query_hash_wraps() {
        let long = "programming tutorials for everyone";
        let expected = long
            .encode_utf16()
            .fold(0i64, |hash, unit| (hash * 31 + i64::from(unit)) as i32 as i64);
        assert_eq!(i64::from(query_hash(long)), expected);
    }

    #[test]
    fn description_embeds_query() {
        let response = generate("rust lifetimes", 1);
        assert_eq!(
            response.videos[0].description.as_deref(),
            Some(
                "Learn everything about rust lifetimes in this comprehensive video tutorial. \
                 Perfect for beginners and intermediate learners alike."
            )
        );
    }

    #[test]
    fn dates_fall_within_the_last_year() {
        let today = Local::now().date_naive();
        let response = generate("cats", 20);
        for video in &response.videos {
            let raw = video.published_at.as_deref().unwrap();
            let date = NaiveDate::parse_from_str(raw, DISPLAY_DATE_FORMAT).unwrap();
            assert!(date <= today);
            assert!(date > today - Duration::days(MAX_AGE_DAYS + 1));
        }
    }
}
