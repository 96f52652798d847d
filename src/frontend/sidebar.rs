use super::api;
use super::widgets::Clock;
use crate::ui::model::{
    category_stats, commenter_name, display_date, excerpt, CategoryStat, LatestComment, UserInfo,
};
use crate::ui::request::RequestToken;
use crate::ui::route::blog_href;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AuthorCardProps {
    pub user: Option<UserInfo>,
}

#[function_component(AuthorCard)]
pub fn author_card(props: &AuthorCardProps) -> Html {
    let Some(user) = props.user.as_ref() else {
        return html! {
            <section class="card author-card is-placeholder" aria-busy="true">
                <p class="muted">{"Loading author…"}</p>
            </section>
        };
    };

    let avatar = user
        .avatar
        .as_deref()
        .map(api::get_image_url)
        .unwrap_or_else(|| "/images/avatar.svg".to_string());

    html! {
        <section class="card author-card" aria-labelledby="author-name">
            <img class="author-avatar" src={avatar} alt={format!("{} avatar", user.nickname)} />
            <h2 id="author-name">{user.nickname.clone()}</h2>
            <p class="author-signature">{user.signature.clone()}</p>
            <dl class="author-stats">
                <div><dt>{"Posts"}</dt><dd>{user.blog_count}</dd></div>
                <div><dt>{"Categories"}</dt><dd>{user.category_count}</dd></div>
                <div><dt>{"Tags"}</dt><dd>{user.tag_count}</dd></div>
            </dl>
            <ul class="author-links">
                {user.github.as_ref().map(|github| html! {
                    <li><a class="link" href={github.clone()} target="_blank" rel="noopener noreferrer">{"GitHub"}</a></li>
                })}
                {user.email.as_ref().map(|email| html! {
                    <li><a class="link" href={format!("mailto:{email}")}>{"Email"}</a></li>
                })}
            </ul>
            <Clock />
        </section>
    }
}

#[function_component(AnnouncementCard)]
pub fn announcement_card() -> Html {
    let content = use_state(|| None::<String>);

    {
        let content = content.clone();
        use_effect_with((), move |_| {
            let token = RequestToken::new();
            let task_token = token.clone();
            spawn_local(async move {
                let announcement = api::fetch_announcement().await;
                if task_token.is_current() {
                    content.set(Some(announcement));
                }
            });
            move || token.supersede()
        });
    }

    html! {
        <section class="card announcement" aria-labelledby="announcement-heading">
            <h2 id="announcement-heading">{"Announcement"}</h2>
            {match content.as_deref() {
                Some(text) => html! { <p>{text.to_string()}</p> },
                None => html! { <p class="muted">{"Loading…"}</p> },
            }}
        </section>
    }
}

#[function_component(LatestComments)]
pub fn latest_comments() -> Html {
    let comments = use_state(|| None::<Vec<LatestComment>>);

    {
        let comments = comments.clone();
        use_effect_with((), move |_| {
            let token = RequestToken::new();
            let task_token = token.clone();
            spawn_local(async move {
                let latest = api::fetch_latest_comments().await;
                if task_token.is_current() {
                    comments.set(Some(latest));
                }
            });
            move || token.supersede()
        });
    }

    let body = match comments.as_deref() {
        None => html! { <p class="muted">{"Loading…"}</p> },
        Some([]) => html! { <p class="muted">{"No comments yet"}</p> },
        Some(list) => html! {
            <ul class="comment-list">
                {for list.iter().map(|comment| html! {
                    <li key={comment.comment_id.clone()} class="comment-item">
                        <p class="comment-meta">
                            <span class="comment-author">{commenter_name(&comment.commenter_email).to_string()}</span>
                            <time datetime={comment.create_time.clone()}>{display_date(&comment.create_time).to_string()}</time>
                        </p>
                        <p class="comment-content">{excerpt(&comment.content)}</p>
                        <a class="link comment-blog" href={blog_href(&comment.blog_id)} target="_blank" rel="noopener noreferrer">
                            {comment.blog_title.clone()}
                        </a>
                    </li>
                })}
            </ul>
        },
    };

    html! {
        <section class="card latest-comments" aria-labelledby="comments-heading">
            <h2 id="comments-heading">{"Latest comments"}</h2>
            {body}
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct CategoryListProps {
    pub selected: Option<String>,
    pub on_select: Callback<Option<String>>,
}

#[function_component(CategoryList)]
pub fn category_list(props: &CategoryListProps) -> Html {
    let stats = use_state(Vec::<CategoryStat>::new);

    {
        let stats = stats.clone();
        use_effect_with((), move |_| {
            let token = RequestToken::new();
            let task_token = token.clone();
            spawn_local(async move {
                let categories = api::fetch_categories().await;
                let counts = api::fetch_category_counts().await;
                if task_token.is_current() {
                    stats.set(category_stats(&categories, &counts));
                }
            });
            move || token.supersede()
        });
    }

    if stats.is_empty() {
        return html! {};
    }

    let select = |category: Option<String>| {
        let on_select = props.on_select.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(category.clone()))
    };

    html! {
        <section class="card categories" aria-labelledby="categories-heading">
            <h2 id="categories-heading">{"Categories"}</h2>
            <ul class="category-list">
                <li>
                    <button
                        type="button"
                        class={classes!("category-item", props.selected.is_none().then_some("is-active"))}
                        onclick={select(None)}
                    >
                        {"All"}
                    </button>
                </li>
                {for stats.iter().map(|stat| html! {
                    <li key={stat.category_id.clone()}>
                        <button
                            type="button"
                            class={classes!("category-item", (props.selected.as_deref() == Some(stat.category_id.as_str())).then_some("is-active"))}
                            onclick={select(Some(stat.category_id.clone()))}
                        >
                            <span>{stat.name.clone()}</span>
                            <span class="category-count">{stat.blog_count}</span>
                        </button>
                    </li>
                })}
            </ul>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct TagCloudProps {
    pub tags: Vec<(String, u32)>,
}

#[function_component(TagCloud)]
pub fn tag_cloud(props: &TagCloudProps) -> Html {
    if props.tags.is_empty() {
        return html! {};
    }

    html! {
        <section class="card tags" aria-labelledby="tags-heading">
            <h2 id="tags-heading">{"Tags"}</h2>
            <ul class="tag-cloud">
                {for props.tags.iter().map(|(tag, count)| html! {
                    <li key={tag.clone()} class="tag" title={format!("{count} posts")}>
                        {format!("#{tag}")}
                    </li>
                })}
            </ul>
        </section>
    }
}
