use actix_web::{HttpResponse, HttpResponseBuilder, Responder};
use chrono::{Datelike, Utc};
use handlebars::Handlebars;
use log::error;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::Result;

/// Templates compiled into the binary, as (name, source)
const TEMPLATES: [(&str, &str); 5] = [
    ("index", include_str!("../templates/index.hbs")),
    ("add", include_str!("../templates/add.hbs")),
    ("cafe_list", include_str!("../templates/cafe_list.hbs")),
    ("cafe_cards", include_str!("../templates/cafe_cards.hbs")),
    ("404", include_str!("../templates/404.hbs")),
];

const PARTIALS: [(&str, &str); 2] = [
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
];

/// Shared handlebars instance
lazy_static::lazy_static! {
    static ref HBS: Arc<Handlebars<'static>> = {
        let mut hbs = Handlebars::new();
        for (name, source) in PARTIALS {
            if let Err(e) = hbs.register_partial(name, source) {
                error!("Error registering partial {}: {}", name, e);
            }
        }
        for (name, source) in TEMPLATES {
            if let Err(e) = hbs.register_template_string(name, source) {
                error!("Error registering template {}: {}", name, e);
            }
        }
        Arc::new(hbs)
    };
}

/// Build a template context with the fields every page uses
pub fn page_context(title: &str, extra: Value) -> Value {
    let mut context = json!({
        "title": format!("{} | Cafe Finder", title),
        "year": Utc::now().year(),
    });
    if let (Some(base), Value::Object(extra)) = (context.as_object_mut(), extra) {
        base.extend(extra);
    }
    context
}

/// Render `template` with `context` into an HTML response
pub fn render(mut builder: HttpResponseBuilder, template: &str, context: &Value) -> Result<HttpResponse> {
    let body = HBS.render(template, context)?;
    Ok(builder.content_type("text/html; charset=utf-8").body(body))
}

/// Serve the index/home page
pub async fn index() -> Result<HttpResponse> {
    let context = page_context("Home", json!({}));
    render(HttpResponse::Ok(), "index", &context)
}

/// 404 Not Found handler
pub async fn not_found() -> impl Responder {
    not_found_response()
}

/// The 404 page, falling back to plain text if it cannot be rendered
pub fn not_found_response() -> HttpResponse {
    let context = page_context("Page Not Found", json!({}));
    match render(HttpResponse::NotFound(), "404", &context) {
        Ok(response) => response,
        Err(e) => {
            error!("Template rendering error: {}", e);
            HttpResponse::NotFound().body("Not Found")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_context_merges_fields() {
        let context = page_context("Cafes", json!({ "cafes": [] }));
        assert_eq!(context["title"], "Cafes | Cafe Finder");
        assert!(context["year"].as_i64().unwrap() >= 2024);
        assert!(context["cafes"].is_array());
    }

    #[test]
    fn test_all_templates_render() {
        let context = page_context("Test", json!({ "cafes": [], "form": {} }));
        for (name, _) in TEMPLATES {
            let html = HBS.render(name, &context).unwrap();
            assert!(html.contains("</html>"), "template {}", name);
        }
    }
}
