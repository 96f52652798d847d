use crate::ui::model::{
    self, Announcement, BlogDetail, BlogPage, Category, CategoryBlogCount, LatestComment, UserInfo,
};
use gloo_net::http::Request;
use js_sys::encode_uri_component;
use serde::de::DeserializeOwned;
use std::fmt;

pub const API_BASE: &str = "/api";
pub const PAGE_SIZE: u32 = 8;

#[derive(Debug)]
pub enum FetchError {
    Network(gloo_net::Error),
    Status(u16),
    Decode(gloo_net::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(error) => write!(f, "network error: {error}"),
            Self::Status(status) => write!(f, "unexpected status {status}"),
            Self::Decode(error) => write!(f, "invalid response body: {error}"),
        }
    }
}

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, FetchError> {
    let response = Request::get(&format!("{API_BASE}{path}"))
        .send()
        .await
        .map_err(FetchError::Network)?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    response.json::<T>().await.map_err(FetchError::Decode)
}

fn log_fetch_failure(what: &str, error: &FetchError) {
    web_sys::console::warn_1(&format!("failed to load {what}: {error}").into());
}

async fn get_or_log<T: DeserializeOwned>(what: &str, path: &str) -> Option<T> {
    match get_json::<T>(path).await {
        Ok(value) => Some(value),
        Err(error) => {
            log_fetch_failure(what, &error);
            None
        }
    }
}

pub async fn fetch_announcement() -> String {
    get_or_log::<Announcement>("announcement", "/announcement")
        .await
        .map(|announcement| announcement.content)
        .filter(|content| !content.trim().is_empty())
        .unwrap_or_else(|| model::DEFAULT_ANNOUNCEMENT.to_string())
}

pub async fn fetch_latest_comments() -> Vec<LatestComment> {
    let mut comments = get_or_log::<Vec<LatestComment>>("latest comments", "/comments/latest")
        .await
        .unwrap_or_default();
    model::sort_comments_newest_first(&mut comments);
    comments
}

pub async fn fetch_user_info() -> Option<UserInfo> {
    get_or_log("user info", "/user/info").await
}

pub async fn fetch_blog_page(page: u32, category_id: Option<&str>) -> Option<BlogPage> {
    let mut path = format!("/blogs?page={page}&size={PAGE_SIZE}");
    if let Some(category_id) = category_id {
        path.push_str(&format!("&category_id={}", encode_uri_component(category_id)));
    }

    get_or_log("blog list", &path).await
}

pub async fn fetch_blog(blog_id: &str) -> Option<BlogDetail> {
    get_or_log("blog", &format!("/blog/{}", encode_uri_component(blog_id))).await
}

pub async fn fetch_categories() -> Vec<Category> {
    get_or_log("categories", "/categories").await.unwrap_or_default()
}

pub async fn fetch_category_counts() -> Vec<CategoryBlogCount> {
    get_or_log("category counts", "/categories/blog-count")
        .await
        .unwrap_or_default()
}

pub fn get_image_url(image_id: &str) -> String {
    model::image_url(API_BASE, image_id)
}
