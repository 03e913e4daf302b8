//! Web handlers for cafe records
//!
//! Each handler performs a single store call and renders a page or
//! redirects back to the cards view.

use actix_web::{http::header, web, HttpResponse};
use log::{info, warn};
use serde_json::json;

use crate::error::Result;
use crate::web::handlers::pages::{page_context, render};
use crate::web::models::{CafeForm, FormView};
use crate::web::server::AppState;

/// Where successful writes send the browser
pub const CARDS_PATH: &str = "/cafe-cards";

fn redirect_to_cards() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, CARDS_PATH))
        .finish()
}

fn render_form(form: FormView) -> Result<HttpResponse> {
    let context = page_context("Add a Cafe", json!({ "form": form }));
    render(HttpResponse::Ok(), "add", &context)
}

/// Show the empty add form
pub async fn add_form(data: web::Data<AppState>) -> Result<HttpResponse> {
    render_form(FormView::empty(data.csrf.issue()))
}

/// Validate and store a submitted cafe
pub async fn add_cafe(data: web::Data<AppState>, form: web::Form<CafeForm>) -> Result<HttpResponse> {
    let form = form.into_inner();
    match (data.csrf.verify(&form.csrf_token), form.validate()) {
        (Ok(()), Ok(new_cafe)) => {
            let cafe = data.store.insert(&new_cafe).await?;
            info!("Cafe '{}' stored with id {}", cafe.name, cafe.id);
            Ok(redirect_to_cards())
        }
        (token, fields) => {
            let mut errors = fields.err().unwrap_or_default();
            if let Err(message) = token {
                errors.entry("csrf_token").or_default().push(message);
            }
            warn!("Rejected cafe submission: {:?}", errors.keys().collect::<Vec<_>>());
            render_form(FormView::new(form, errors, data.csrf.issue()))
        }
    }
}

/// All cafes as a table
pub async fn cafe_list(data: web::Data<AppState>) -> Result<HttpResponse> {
    let cafes = data.store.all().await?;
    let context = page_context("All Cafes", json!({ "cafes": cafes }));
    render(HttpResponse::Ok(), "cafe_list", &context)
}

/// All cafes as cards
pub async fn cafe_cards(data: web::Data<AppState>) -> Result<HttpResponse> {
    let cafes = data.store.all().await?;
    let context = page_context("Cafes", json!({ "cafes": cafes }));
    render(HttpResponse::Ok(), "cafe_cards", &context)
}

/// Remove one cafe; unknown ids render the 404 page
pub async fn delete_cafe(data: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let id = path.into_inner();
    data.store.delete(id).await?;
    Ok(redirect_to_cards())
}
