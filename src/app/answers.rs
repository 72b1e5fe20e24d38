use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use strum::IntoEnumIterator;

use crate::cache::{Category, NameCache, Selection};

use super::AppError;
use super::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/answers", get(answers_page))
        .route("/answers.txt", get(answers_text))
        .route("/refresh", post(refresh))
        .with_state(state)
}

struct CategoryCount {
    name: String,
    count: usize,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    categories: Vec<CategoryCount>,
    status: String,
    updated: String,
}

#[derive(Template)]
#[template(path = "answers.html")]
struct AnswersTemplate {
    groups: Vec<String>,
    query: String,
    answers: Vec<String>,
}

/// The selected answers in a stable order, so typing them out is repeatable.
fn sorted(names: &NameCache, selection: &Selection) -> Vec<String> {
    let mut answers: Vec<String> = names.select(selection).into_iter().collect();
    answers.sort();
    answers
}

async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let library = state.library.read().await;
    let template = IndexTemplate {
        categories: Category::iter()
            .map(|category| CategoryCount {
                name: category.to_string(),
                count: library.names.len(category),
            })
            .collect(),
        status: library.status.to_string(),
        updated: library
            .updated
            .map_or("never".to_string(), |at| at.format("%Y-%m-%d %H:%M UTC").to_string()),
    };
    Ok(Html(template.render()?))
}

async fn answers_page(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> Result<impl IntoResponse, AppError> {
    let library = state.library.read().await;
    let template = AnswersTemplate {
        groups: selection
            .groups()
            .iter()
            .map(|category| category.to_string())
            .collect(),
        query: query_of(&selection),
        answers: sorted(&library.names, &selection),
    };
    Ok(Html(template.render()?))
}

/// One answer per line, for whatever types them into the game.
async fn answers_text(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> String {
    let library = state.library.read().await;
    sorted(&library.names, &selection).join("\n")
}

async fn refresh(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.refresh().await?;
    Ok(Redirect::to("/"))
}

fn query_of(selection: &Selection) -> String {
    let flags = [
        ("champion", selection.champion),
        ("item", selection.item),
        ("skin", selection.skin),
        ("ability", selection.ability),
        (
            "keystone_rune_and_summoner_spell",
            selection.keystone_rune_and_summoner_spell,
        ),
        ("nonkeystone_rune", selection.nonkeystone_rune),
    ];
    flags
        .iter()
        .filter(|(_, on)| *on)
        .map(|(flag, _)| format!("{flag}=true"))
        .collect::<Vec<_>>()
        .join("&")
}
