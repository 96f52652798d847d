#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Route {
    Home,
    Blog(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["blog", id] => Self::Blog((*id).to_string()),
            _ => Self::NotFound,
        }
    }
}

pub fn blog_href(blog_id: &str) -> String {
    format!("/blog/{blog_id}")
}
