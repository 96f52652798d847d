use super::api;
use super::toc_modal::TocModal;
use crate::ui::model::{display_date, excerpt, BlogDetail, BlogSummary};
use crate::ui::request::RequestToken;
use crate::ui::route::blog_href;
use crate::ui::toc::{
    active_anchor, extract_entries, ACTIVE_OFFSET_PX, ARTICLE_BODY_ID, HEADING_SELECTOR,
};
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Element};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct BlogCardProps {
    pub blog: BlogSummary,
}

#[function_component(BlogCard)]
pub fn blog_card(props: &BlogCardProps) -> Html {
    let blog = &props.blog;
    let href = blog_href(&blog.blog_id);

    html! {
        <article class="card blog-card">
            {blog.cover_image.as_deref().map(|cover| html! {
                <a class="blog-cover" href={href.clone()} target="_blank" rel="noopener noreferrer" tabindex="-1">
                    <img src={api::get_image_url(cover)} alt="" loading="lazy" />
                </a>
            })}
            <div class="blog-card-copy">
                <h3 class="blog-title">
                    <a href={href} target="_blank" rel="noopener noreferrer">{blog.title.clone()}</a>
                </h3>
                <p class="blog-meta">
                    <time datetime={blog.create_time.clone()}>{display_date(&blog.create_time).to_string()}</time>
                    {blog.category_name.as_ref().map(|name| html! { <span class="blog-category">{name.clone()}</span> })}
                    <span class="blog-views">{format!("{} views", blog.views)}</span>
                </p>
                <p class="blog-description">{excerpt(&blog.description)}</p>
                <ul class="blog-tags">
                    {for blog.tags.iter().map(|tag| html! { <li class="tag">{format!("#{tag}")}</li> })}
                </ul>
            </div>
        </article>
    }
}

// Entries and DOM nodes are both in document order, so the n-th entry names
// the n-th heading.
fn assign_heading_ids(anchor_ids: &[String]) {
    let Some(headings) = window()
        .and_then(|win| win.document())
        .and_then(|document| document.get_element_by_id(ARTICLE_BODY_ID))
        .and_then(|body| body.query_selector_all(HEADING_SELECTOR).ok())
    else {
        return;
    };

    for (index, anchor_id) in anchor_ids.iter().enumerate() {
        if let Some(heading) = headings
            .item(index as u32)
            .and_then(|node| node.dyn_into::<Element>().ok())
        {
            heading.set_id(anchor_id);
        }
    }
}

fn heading_positions(anchor_ids: &[String]) -> Vec<(String, f64)> {
    let Some(document) = window().and_then(|win| win.document()) else {
        return Vec::new();
    };

    anchor_ids
        .iter()
        .filter_map(|anchor_id| {
            let top = document.get_element_by_id(anchor_id)?.get_bounding_client_rect().top();
            Some((anchor_id.clone(), top))
        })
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct ArticlePageProps {
    pub blog_id: String,
}

#[function_component(ArticlePage)]
pub fn article_page(props: &ArticlePageProps) -> Html {
    let blog = use_state(|| None::<Option<BlogDetail>>);
    let toc_open = use_state(|| false);
    let active_id = use_state_eq(|| None::<AttrValue>);

    {
        let blog = blog.clone();
        use_effect_with(props.blog_id.clone(), move |blog_id| {
            let blog_id = blog_id.clone();
            let token = RequestToken::new();
            let task_token = token.clone();
            spawn_local(async move {
                let detail = api::fetch_blog(&blog_id).await;
                if task_token.is_current() {
                    blog.set(Some(detail));
                }
            });
            move || token.supersede()
        });
    }

    let content = (*blog)
        .as_ref()
        .and_then(Option::as_ref)
        .map(|detail| detail.content.clone())
        .unwrap_or_default();
    let entries = use_memo(content, |content| extract_entries(content));

    {
        let active_id = active_id.clone();
        let anchor_ids: Vec<String> = entries.iter().map(|entry| entry.anchor_id.clone()).collect();
        use_effect_with(anchor_ids, move |anchor_ids| {
            assign_heading_ids(anchor_ids);

            let anchor_ids = anchor_ids.clone();
            let track = move || {
                let positions = heading_positions(&anchor_ids);
                active_id.set(
                    active_anchor(&positions, ACTIVE_OFFSET_PX)
                        .map(|anchor| AttrValue::from(anchor.to_string())),
                );
            };
            track();

            let listener = window().map(|win| EventListener::new(&win, "scroll", move |_| track()));
            move || drop(listener)
        });
    }

    let open_toc = {
        let toc_open = toc_open.clone();
        Callback::from(move |_: MouseEvent| toc_open.set(true))
    };
    let close_toc = {
        let toc_open = toc_open.clone();
        Callback::from(move |_: ()| toc_open.set(false))
    };

    let detail = match &*blog {
        None => {
            return html! { <p class="muted page-status">{"Loading article…"}</p> };
        }
        Some(None) => {
            return html! {
                <div class="page-status">
                    <p>{"This article could not be loaded."}</p>
                    <a class="link" href="/">{"Back to home"}</a>
                </div>
            };
        }
        Some(Some(detail)) => detail,
    };

    html! {
        <article class="article">
            <header class="article-header">
                <h1>{detail.title.clone()}</h1>
                <p class="blog-meta">
                    <time datetime={detail.create_time.clone()}>{display_date(&detail.create_time).to_string()}</time>
                    {detail.update_time.as_deref().map(|updated| html! {
                        <span class="blog-updated">{format!("updated {}", display_date(updated))}</span>
                    })}
                    {detail.category_name.as_ref().map(|name| html! { <span class="blog-category">{name.clone()}</span> })}
                    <span class="blog-views">{format!("{} views", detail.views)}</span>
                </p>
                {detail.cover_image.as_deref().map(|cover| html! {
                    <img class="article-cover" src={api::get_image_url(cover)} alt="" />
                })}
            </header>
            <div id={ARTICLE_BODY_ID} class="article-body">
                {Html::from_html_unchecked(AttrValue::from(detail.content.clone()))}
            </div>
            <ul class="blog-tags">
                {for detail.tags.iter().map(|tag| html! { <li class="tag">{format!("#{tag}")}</li> })}
            </ul>
            <button type="button" class="toc-toggle" aria-label="Open table of contents" onclick={open_toc}>
                {"☰"}
            </button>
            <TocModal
                open={*toc_open}
                items={(*entries).clone()}
                active_id={(*active_id).clone()}
                on_close={close_toc}
            />
        </article>
    }
}

#[derive(Properties, PartialEq)]
pub struct BlogListProps {
    pub blogs: Option<Vec<BlogSummary>>,
}

#[function_component(BlogList)]
pub fn blog_list(props: &BlogListProps) -> Html {
    match props.blogs.as_deref() {
        None => html! { <p class="muted page-status">{"Loading posts…"}</p> },
        Some([]) => html! { <p class="muted page-status">{"No posts here yet."}</p> },
        Some(blogs) => html! {
            <div class="blog-list">
                {for blogs.iter().map(|blog| html! {
                    <BlogCard key={blog.blog_id.clone()} blog={blog.clone()} />
                })}
            </div>
        },
    }
}
