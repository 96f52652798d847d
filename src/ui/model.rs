use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

pub const DEFAULT_ANNOUNCEMENT: &str = "Welcome! Grab a coffee and enjoy the reading.";
const EXCERPT_CHARS: usize = 120;

fn opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Signed(number) => number.to_string(),
        RawId::Unsigned(number) => number.to_string(),
    })
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Announcement {
    pub content: String,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub nickname: String,
    pub avatar: Option<String>,
    pub signature: String,
    pub github: Option<String>,
    pub email: Option<String>,
    pub blog_count: u32,
    pub category_count: u32,
    pub tag_count: u32,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct BlogSummary {
    #[serde(deserialize_with = "opaque_id")]
    pub blog_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: u32,
    pub create_time: String,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct BlogPage {
    pub records: Vec<BlogSummary>,
    pub total: u32,
    pub current: u32,
    pub size: u32,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct BlogDetail {
    #[serde(deserialize_with = "opaque_id")]
    pub blog_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: u32,
    pub create_time: String,
    #[serde(default)]
    pub update_time: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct LatestComment {
    #[serde(deserialize_with = "opaque_id")]
    pub comment_id: String,
    pub content: String,
    pub commenter_email: String,
    #[serde(deserialize_with = "opaque_id")]
    pub blog_id: String,
    pub blog_title: String,
    pub create_time: String,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "opaque_id")]
    pub category_id: String,
    pub category_name: String,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct CategoryBlogCount {
    #[serde(deserialize_with = "opaque_id")]
    pub category_id: String,
    pub blog_count: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CategoryStat {
    pub category_id: String,
    pub name: String,
    pub blog_count: u32,
}

/// The `getImageUrl` resolver: opaque image ids become URLs under the API.
pub fn image_url(api_base: &str, image_id: &str) -> String {
    let image_id = image_id.trim();
    if image_id.starts_with("http://") || image_id.starts_with("https://") {
        return image_id.to_string();
    }

    format!("{}/image/{}", api_base.trim_end_matches('/'), image_id.trim_start_matches('/'))
}

pub fn category_stats(categories: &[Category], counts: &[CategoryBlogCount]) -> Vec<CategoryStat> {
    let by_id: HashMap<&str, u32> = counts
        .iter()
        .map(|count| (count.category_id.as_str(), count.blog_count))
        .collect();

    let mut stats: Vec<CategoryStat> = categories
        .iter()
        .map(|category| CategoryStat {
            category_id: category.category_id.clone(),
            name: category.category_name.clone(),
            blog_count: by_id.get(category.category_id.as_str()).copied().unwrap_or(0),
        })
        .collect();

    stats.sort_by(|a, b| b.blog_count.cmp(&a.blog_count).then_with(|| a.name.cmp(&b.name)));
    stats
}

pub fn collect_tags(blogs: &[BlogSummary]) -> Vec<(String, u32)> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for tag in blogs.iter().flat_map(|blog| blog.tags.iter()) {
        let tag = tag.trim();
        if !tag.is_empty() {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags
}

pub fn sort_comments_newest_first(comments: &mut [LatestComment]) {
    // Timestamps arrive as ISO-like strings, which order lexically.
    comments.sort_by(|a, b| b.create_time.cmp(&a.create_time));
}

/// `2024-05-01T12:30:00` or `2024-05-01 12:30:00` becomes `2024-05-01`.
pub fn display_date(timestamp: &str) -> &str {
    let trimmed = timestamp.trim();
    trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or(trimmed)
}

pub fn commenter_name(email: &str) -> &str {
    email
        .split('@')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("anonymous")
}

pub fn excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= EXCERPT_CHARS {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(EXCERPT_CHARS).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64, tags: &[&str]) -> BlogSummary {
        BlogSummary {
            blog_id: id.to_string(),
            title: format!("post {id}"),
            description: String::new(),
            cover_image: None,
            category_name: None,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            views: 0,
            create_time: "2024-01-01T00:00:00".to_string(),
        }
    }

    #[test]
    fn latest_comments_deserialize_from_api_shape() {
        let json = r#"[{
            "comment_id": 7,
            "content": "Nice post",
            "commenter_email": "reader@example.com",
            "blog_id": 3,
            "blog_title": "Hello",
            "create_time": "2024-05-01T12:30:00"
        }]"#;

        let comments: Vec<LatestComment> = serde_json::from_str(json).expect("valid comments");
        assert_eq!(comments[0].comment_id, "7");
        assert_eq!(comments[0].blog_id, "3");
        assert_eq!(commenter_name(&comments[0].commenter_email), "reader");
        assert_eq!(display_date(&comments[0].create_time), "2024-05-01");
    }

    #[test]
    fn user_info_tolerates_missing_fields() {
        let info: UserInfo = serde_json::from_str(r#"{"nickname":"ink"}"#).expect("valid user info");
        assert_eq!(info.nickname, "ink");
        assert_eq!(info.blog_count, 0);
        assert!(info.avatar.is_none());
    }

    #[test]
    fn image_ids_resolve_under_api_base() {
        assert_eq!(image_url("/api/", "abc123"), "/api/image/abc123");
        assert_eq!(image_url("/api", "/abc123"), "/api/image/abc123");
        assert_eq!(image_url("/api", "https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
    }

    #[test]
    fn category_stats_join_counts_and_sort() {
        let categories = vec![
            Category {
                category_id: "1".to_string(),
                category_name: "Rust".to_string(),
            },
            Category {
                category_id: "2".to_string(),
                category_name: "Life".to_string(),
            },
            Category {
                category_id: "3".to_string(),
                category_name: "Art".to_string(),
            },
        ];
        let counts = vec![
            CategoryBlogCount {
                category_id: "2".to_string(),
                blog_count: 4,
            },
            CategoryBlogCount {
                category_id: "1".to_string(),
                blog_count: 4,
            },
        ];

        let stats = category_stats(&categories, &counts);
        let names: Vec<&str> = stats.iter().map(|stat| stat.name.as_str()).collect();
        assert_eq!(names, ["Life", "Rust", "Art"]);
        assert_eq!(stats[2].blog_count, 0);
    }

    #[test]
    fn tags_are_counted_across_blogs() {
        let blogs = vec![summary(1, &["rust", "wasm"]), summary(2, &["rust", " "]), summary(3, &["yew"])];
        let tags = collect_tags(&blogs);
        assert_eq!(tags[0], ("rust".to_string(), 2));
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn comments_sort_newest_first() {
        let mut comments: Vec<LatestComment> = ["2024-01-02", "2024-03-01", "2023-12-31"]
            .iter()
            .enumerate()
            .map(|(index, time)| LatestComment {
                comment_id: index.to_string(),
                content: String::new(),
                commenter_email: String::new(),
                blog_id: "0".to_string(),
                blog_title: String::new(),
                create_time: time.to_string(),
            })
            .collect();

        sort_comments_newest_first(&mut comments);
        let ids: Vec<&str> = comments.iter().map(|comment| comment.comment_id.as_str()).collect();
        assert_eq!(ids, ["1", "0", "2"]);
        assert_eq!(commenter_name(&comments[0].commenter_email), "anonymous");
    }

    #[test]
    fn excerpt_truncates_long_text() {
        let long = "word ".repeat(60);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 1);
        assert!(cut.ends_with('…'));
        assert_eq!(excerpt("  short \n text "), "short text");
    }

    #[test]
    fn non_numeric_ids_do_not_sink_the_whole_list() {
        let json = r#"[
            {"comment_id": "c-9f2", "content": "a", "commenter_email": "x@y.z",
             "blog_id": "intro-post", "blog_title": "Intro", "create_time": "2024-05-02"},
            {"comment_id": 12, "content": "b", "commenter_email": "x@y.z",
             "blog_id": 4, "blog_title": "Four", "create_time": "2024-05-01"}
        ]"#;

        let comments: Vec<LatestComment> = serde_json::from_str(json).expect("mixed ids decode");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].blog_id, "intro-post");
        assert_eq!(comments[1].comment_id, "12");
    }
}
