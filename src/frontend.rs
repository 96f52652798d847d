mod api;
mod article;
mod pagination;
mod sidebar;
mod toc_modal;
mod viewport;
mod widgets;

use crate::ui::model::{collect_tags, BlogSummary, UserInfo};
use crate::ui::pagination::total_pages;
use crate::ui::request::RequestToken;
use crate::ui::route::Route;
use article::{ArticlePage, BlogList};
use pagination::Pagination;
use sidebar::{AnnouncementCard, AuthorCard, CategoryList, LatestComments, TagCloud};
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use widgets::{BackToTop, BlurBackground, Typewriter};
use yew::prelude::*;

const BACKGROUND_IMAGE: &str = "/images/background.jpg";

fn current_route() -> Route {
    window()
        .and_then(|win| win.location().pathname().ok())
        .map(|path| Route::parse(&path))
        .unwrap_or(Route::Home)
}

fn hero_lines() -> Vec<String> {
    [
        "Notes on code, coffee and everything between.",
        "Write it down before it slips away.",
        "Small programs, long walks.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Clone, PartialEq)]
struct ListQuery {
    page: u32,
    category_id: Option<String>,
}

#[derive(Properties, PartialEq)]
struct HomePageProps {
    user: Option<UserInfo>,
}

#[function_component(HomePage)]
fn home_page(props: &HomePageProps) -> Html {
    let query = use_state(|| ListQuery {
        page: 1,
        category_id: None,
    });
    let blogs = use_state(|| None::<Vec<BlogSummary>>);
    let page_count = use_state(|| 1_u32);

    {
        let blogs = blogs.clone();
        let page_count = page_count.clone();
        use_effect_with((*query).clone(), move |query| {
            let query = query.clone();
            let token = RequestToken::new();
            let task_token = token.clone();
            blogs.set(None);
            spawn_local(async move {
                let page = api::fetch_blog_page(query.page, query.category_id.as_deref()).await;
                if !task_token.is_current() {
                    return;
                }
                match page {
                    Some(page) => {
                        page_count.set(total_pages(page.total, page.size.max(1)));
                        blogs.set(Some(page.records));
                    }
                    None => {
                        page_count.set(1);
                        blogs.set(Some(Vec::new()));
                    }
                }
            });
            move || token.supersede()
        });
    }

    let on_page_change = {
        let query = query.clone();
        Callback::from(move |page: u32| {
            query.set(ListQuery {
                page,
                category_id: query.category_id.clone(),
            });
        })
    };

    let on_category = {
        let query = query.clone();
        Callback::from(move |category_id: Option<String>| {
            query.set(ListQuery {
                page: 1,
                category_id,
            });
        })
    };

    let tags = (*blogs).as_deref().map(collect_tags).unwrap_or_default();

    html! {
        <>
            <header class="hero">
                <h1 class="hero-title">
                    {props.user.as_ref().map(|user| user.nickname.clone()).unwrap_or_else(|| "Blog".to_string())}
                </h1>
                <p class="hero-subtitle">
                    <Typewriter texts={hero_lines()} type_speed={120} erase_speed={60} delay_between={1_800} />
                </p>
            </header>
            <div class="layout">
                <main id="content" class="layout-main">
                    <BlogList blogs={(*blogs).clone()} />
                    <Pagination
                        current={query.page}
                        total_pages={*page_count}
                        on_change={on_page_change}
                    />
                </main>
                <aside class="layout-side">
                    <AuthorCard user={props.user.clone()} />
                    <AnnouncementCard />
                    <CategoryList selected={query.category_id.clone()} on_select={on_category} />
                    <TagCloud {tags} />
                    <LatestComments />
                </aside>
            </div>
        </>
    }
}

#[function_component(App)]
fn app() -> Html {
    let route = use_state(current_route);
    let user = use_state(|| None::<UserInfo>);

    {
        let user = user.clone();
        use_effect_with((), move |_| {
            let token = RequestToken::new();
            let task_token = token.clone();
            spawn_local(async move {
                let info = api::fetch_user_info().await;
                if task_token.is_current() {
                    user.set(info);
                }
            });
            move || token.supersede()
        });
    }

    let page = match &*route {
        Route::Home => html! { <HomePage user={(*user).clone()} /> },
        Route::Blog(blog_id) => html! {
            <main id="content" class="layout-article">
                <ArticlePage blog_id={blog_id.clone()} />
            </main>
        },
        Route::NotFound => html! {
            <main id="content" class="page-status">
                <h1>{"404"}</h1>
                <p>{"Nothing lives at this address."}</p>
                <a class="link" href="/">{"Back to home"}</a>
            </main>
        },
    };

    html! {
        <>
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            <BlurBackground image={BACKGROUND_IMAGE} />
            <div class="page-shell">
                {page}
            </div>
            <BackToTop />
        </>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
