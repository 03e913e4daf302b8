use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::cafes::model::{is_seat_choice, NewCafe, SEAT_CHOICES};

const REQUIRED: &str = "This field is required.";
const INVALID_URL: &str = "Invalid URL.";
const INVALID_CHOICE: &str = "Not a valid choice.";

/// Per-field validation messages, keyed by form field name
pub type FormErrors = BTreeMap<&'static str, Vec<&'static str>>;

/// Add-cafe form as submitted by the browser
///
/// Fields missing from the request body deserialize as empty so that they
/// surface as validation errors instead of a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CafeForm {
    pub name: String,
    pub location: String,
    pub map_url: String,
    pub img_url: String,
    pub coffee_price: String,
    pub seats: String,
    // Checkboxes are only sent when ticked
    pub has_wifi: Option<String>,
    pub has_sockets: Option<String>,
    pub has_toilet: Option<String>,
    pub can_take_calls: Option<String>,
    /// Signed token issued with the form
    pub csrf_token: String,
}

impl CafeForm {
    /// Check the submission and convert it into a record ready to store
    pub fn validate(&self) -> Result<NewCafe, FormErrors> {
        let mut errors = FormErrors::new();

        let name = required(&mut errors, "name", &self.name);
        let location = required(&mut errors, "location", &self.location);
        let map_url = required(&mut errors, "map_url", &self.map_url);
        let img_url = required(&mut errors, "img_url", &self.img_url);
        let coffee_price = required(&mut errors, "coffee_price", &self.coffee_price);
        let seats = required(&mut errors, "seats", &self.seats);

        if !map_url.is_empty() && !is_valid_url(map_url) {
            errors.entry("map_url").or_default().push(INVALID_URL);
        }
        if !seats.is_empty() && !is_seat_choice(seats) {
            errors.entry("seats").or_default().push(INVALID_CHOICE);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewCafe {
            name: name.to_string(),
            map_url: map_url.to_string(),
            img_url: img_url.to_string(),
            location: location.to_string(),
            has_sockets: checked(&self.has_sockets),
            has_toilet: checked(&self.has_toilet),
            has_wifi: checked(&self.has_wifi),
            can_take_calls: checked(&self.can_take_calls),
            seats: seats.to_string(),
            coffee_price: coffee_price.to_string(),
        })
    }
}

fn required<'a>(errors: &mut FormErrors, field: &'static str, value: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        errors.entry(field).or_default().push(REQUIRED);
    }
    value
}

/// Present and not `""` or `"false"` means ticked
fn checked(value: &Option<String>) -> bool {
    !matches!(value.as_deref(), None | Some("") | Some("false"))
}

/// Absolute http(s) URL whose host is an IP or a dotted domain
pub fn is_valid_url(value: &str) -> bool {
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.');
            match domain.rsplit_once('.') {
                Some((rest, tld)) => {
                    !rest.is_empty()
                        && tld.len() >= 2
                        && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                }
                None => false,
            }
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

/// One option of the seat-count select
#[derive(Debug, Serialize)]
pub struct SeatOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Field values and messages handed to the add template
#[derive(Debug, Serialize)]
pub struct FormView {
    pub values: CafeForm,
    pub errors: FormErrors,
    pub seat_options: Vec<SeatOption>,
    pub csrf_token: String,
}

impl FormView {
    pub fn new(values: CafeForm, errors: FormErrors, csrf_token: String) -> Self {
        let seat_options = SEAT_CHOICES
            .iter()
            .enumerate()
            .map(|(i, &value)| SeatOption {
                value,
                selected: if values.seats.is_empty() { i == 0 } else { values.seats == value },
            })
            .collect();
        Self { values, errors, seat_options, csrf_token }
    }

    pub fn empty(csrf_token: String) -> Self {
        Self::new(CafeForm::default(), FormErrors::new(), csrf_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CafeForm {
        CafeForm {
            name: "Lighthaus".to_string(),
            location: "Islington".to_string(),
            map_url: "https://goo.gl/maps/2EvhB4oq4gyUXKXx9".to_string(),
            img_url: "https://example.com/lighthaus.jpg".to_string(),
            coffee_price: "£2.60".to_string(),
            seats: "20-30".to_string(),
            has_wifi: Some("y".to_string()),
            has_sockets: None,
            has_toilet: Some("on".to_string()),
            can_take_calls: None,
            csrf_token: String::new(),
        }
    }

    #[test]
    fn test_valid_form() {
        let cafe = valid_form().validate().unwrap();
        assert_eq!(cafe.name, "Lighthaus");
        assert!(cafe.has_wifi);
        assert!(!cafe.has_sockets);
        assert!(cafe.has_toilet);
        assert!(!cafe.can_take_calls);
        assert_eq!(cafe.seats, "20-30");
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut form = valid_form();
        form.name = "  Lighthaus  ".to_string();
        assert_eq!(form.validate().unwrap().name, "Lighthaus");
    }

    #[test]
    fn test_missing_fields_reported() {
        let errors = CafeForm::default().validate().unwrap_err();
        for field in ["name", "location", "map_url", "img_url", "coffee_price", "seats"] {
            assert_eq!(errors.get(field), Some(&vec![REQUIRED]), "field {}", field);
        }
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut form = valid_form();
        form.coffee_price = "   ".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("coffee_price"));
    }

    #[test]
    fn test_invalid_map_url() {
        let mut form = valid_form();
        form.map_url = "not a url".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("map_url"), Some(&vec![INVALID_URL]));
    }

    #[test]
    fn test_unknown_seat_bucket() {
        let mut form = valid_form();
        form.seats = "100+".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("seats"), Some(&vec![INVALID_CHOICE]));
    }

    #[test]
    fn test_url_rules() {
        assert!(is_valid_url("https://www.google.com/maps/place/x"));
        assert!(is_valid_url("http://192.168.0.1:8080/map"));
        assert!(!is_valid_url("https://localhost/map"));
        assert!(!is_valid_url("www.google.com"));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("javascript://example.com/%0aalert(1)"));
        assert!(!is_valid_url("ftp://files.example.com/map"));
    }

    #[test]
    fn test_checkbox_values() {
        assert!(!checked(&None));
        assert!(!checked(&Some(String::new())));
        assert!(!checked(&Some("false".to_string())));
        assert!(checked(&Some("y".to_string())));
        assert!(checked(&Some("off".to_string())));
        assert!(checked(&Some("0".to_string())));
    }

    #[test]
    fn test_form_view_selects_first_seat_by_default() {
        let view = FormView::empty("token".to_string());
        assert!(view.seat_options[0].selected);
        assert_eq!(view.seat_options.iter().filter(|o| o.selected).count(), 1);
    }
}
