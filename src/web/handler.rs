use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::favorites::CreateFavorite;
use crate::handler::AppState;
use crate::model::FavoriteId;
use crate::render::render_html;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub preview_link: Option<String>,
    pub image_url: Option<String>,
    pub q: Option<String>,
}

// 303, so the browser follows up with a GET.
fn back_to(q: Option<&str>) -> Redirect {
    match q.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => Redirect::to(&format!("/?q={}", urlencoding::encode(q))),
        None => Redirect::to("/"),
    }
}

pub async fn index(State(state): State<AppState>, Query(params): Query<PageQuery>) -> Html<String> {
    let view = state.app.page(params.q.as_deref()).await;
    Html(render_html(&view))
}

pub async fn add_favorite(State(state): State<AppState>, Form(form): Form<AddFavoriteForm>) -> Response {
    let favorite = CreateFavorite {
        title: form.title,
        author: form.author,
        preview_link: form.preview_link,
        image_url: form.image_url,
    };
    let Some(record) = favorite.into_record() else {
        return (StatusCode::BAD_REQUEST, "title is required").into_response();
    };

    state.app.add_favorite(record).await;
    back_to(form.q.as_deref()).into_response()
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PageQuery>,
) -> Redirect {
    state.app.remove_favorite(&FavoriteId::from(id)).await;
    back_to(form.q.as_deref())
}

pub async fn toggle_theme(State(state): State<AppState>, Form(form): Form<PageQuery>) -> Redirect {
    state.app.toggle_theme().await;
    back_to(form.q.as_deref())
}
