//! Server-rendered HTML pages.

use serde::Serialize;
use tera::{Context, Tera};

use advisora_core::models::consultancy::ConsultancyType;
use advisora_core::models::focus::FocusArea;
use advisora_core::models::strictness::Strictness;

use crate::state::Settings;

const INDEX: &str = "index.html";
const PAYMENT_RETURN: &str = "payment_return.html";

#[derive(Serialize)]
struct TypeOption {
    value: &'static str,
    title: &'static str,
}

#[derive(Serialize)]
struct FocusOption {
    field: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct StrictnessOption {
    value: &'static str,
    label: String,
    selected: bool,
}

/// Focus checkboxes, keyed by their form field names.
const FOCUS_FIELDS: [(&str, FocusArea); 4] = [
    ("focus_strategy", FocusArea::Strategy),
    ("focus_operations", FocusArea::Operations),
    ("focus_marketing", FocusArea::Marketing),
    ("focus_customer", FocusArea::Customer),
];

#[derive(Debug)]
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (INDEX, include_str!("../templates/index.html.tera")),
            (PAYMENT_RETURN, include_str!("../templates/payment_return.html.tera")),
        ])?;
        Ok(Self { tera })
    }

    /// The order form.
    pub fn index(&self, settings: &Settings) -> Result<String, tera::Error> {
        let consultancy_types: Vec<TypeOption> = ConsultancyType::ALL
            .iter()
            .map(|t| TypeOption {
                value: t.slug(),
                title: t.title(),
            })
            .collect();
        let focus_areas: Vec<FocusOption> = FOCUS_FIELDS
            .iter()
            .map(|(field, area)| FocusOption {
                field: *field,
                label: area.label(),
            })
            .collect();
        let strictness_options: Vec<StrictnessOption> = Strictness::ALL
            .iter()
            .map(|s| StrictnessOption {
                value: s.slug(),
                label: capitalize(s.slug()),
                selected: *s == Strictness::default(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("consultancy_types", &consultancy_types);
        context.insert("focus_areas", &focus_areas);
        context.insert("strictness_options", &strictness_options);
        context.insert("stripe_key", settings.publishable_key.as_deref().unwrap_or_default());
        context.insert("bypass_payment", &settings.bypass_payment);
        context.insert("price", &format_price(settings.price_cents, &settings.currency));
        self.tera.render(INDEX, &context)
    }

    /// Landing page after checkout. It polls `/payment-success` until the
    /// report is ready.
    pub fn payment_return(&self, session_id: Option<&str>, settings: &Settings) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("session_id", session_id.unwrap_or_default());
        context.insert("stripe_key", settings.publishable_key.as_deref().unwrap_or_default());
        self.tera.render(PAYMENT_RETURN, &context)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `1999, "usd"` → `"$19.99"`; other currencies use their code.
pub fn format_price(cents: u64, currency: &str) -> String {
    let amount = format!("{}.{:02}", cents / 100, cents % 100);
    if currency.eq_ignore_ascii_case("usd") {
        format!("${amount}")
    } else {
        format!("{amount} {}", currency.to_uppercase())
    }
}
