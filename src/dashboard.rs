//! Server-rendered loan dashboard page.

use std::fmt::Write;

use crate::models::{Field, RawApplication};

/// Select options offered for the categorical fields.
const EDUCATION_OPTIONS: &[&str] = &["Graduate", "Not Graduate"];
const SELF_EMPLOYED_OPTIONS: &[&str] = &["No", "Yes"];

/// Form label shown next to each field.
fn field_label(field: Field) -> &'static str {
    match field {
        Field::NoOfDependents => "Number of Dependents",
        Field::Education => "Education",
        Field::SelfEmployed => "Self Employed",
        Field::IncomeAnnum => "Annual Income",
        Field::LoanAmount => "Loan Amount",
        Field::LoanTerm => "Loan Term (years)",
        Field::CibilScore => "CIBIL Score",
        Field::ResidentialAssetsValue => "Residential Assets Value",
        Field::CommercialAssetsValue => "Commercial Assets Value",
        Field::LuxuryAssetsValue => "Luxury Assets Value",
        Field::BankAssetValue => "Bank Asset Value",
    }
}

/// Renders the dashboard with an optional result banner and the previously
/// submitted values filled back into the form.
pub fn render_dashboard(result: Option<&str>, input: Option<&RawApplication>) -> String {
    let mut fields_html = String::new();
    for field in Field::ALL {
        let value = input.map(|raw| raw.get(field)).unwrap_or("");
        let _ = write!(
            fields_html,
            r#"
        <div class="field">
            <label for="{name}">{label}</label>
            {control}
        </div>"#,
            name = field.as_str(),
            label = field_label(field),
            control = field_control(field, value),
        );
    }

    let result_html = match result {
        Some(message) => format!(
            r#"<div class="result {class}">{message}</div>"#,
            class = result_class(message),
            message = escape_html(message),
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Loan Approval Dashboard</title>
    <style>
        body {{ font-family: sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }}
        form {{ display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem 1.5rem; }}
        .field {{ display: flex; flex-direction: column; }}
        label {{ font-weight: bold; margin-bottom: 0.25rem; }}
        button {{ grid-column: span 2; padding: 0.6rem; font-size: 1rem; }}
        .result {{ margin: 1rem 0; padding: 0.75rem; border-radius: 4px; font-weight: bold; }}
        .approved {{ background: #e3f6e5; color: #1b5e20; }}
        .rejected {{ background: #fdecea; color: #b71c1c; }}
        .error {{ background: #fff4e5; color: #8a4b00; }}
    </style>
</head>
<body>
    <h1>Loan Approval Prediction</h1>
    {result_html}
    <form method="post" action="/predict">{fields_html}
        <button type="submit">Predict</button>
    </form>
</body>
</html>
"#
    )
}

fn field_control(field: Field, value: &str) -> String {
    let options = match field {
        Field::Education => EDUCATION_OPTIONS,
        Field::SelfEmployed => SELF_EMPLOYED_OPTIONS,
        _ => {
            return format!(
                r#"<input type="text" inputmode="numeric" id="{name}" name="{name}" value="{value}">"#,
                name = field.as_str(),
                value = escape_html(value),
            )
        }
    };

    let mut html = format!(r#"<select id="{name}" name="{name}">"#, name = field.as_str());
    html.push_str(r#"<option value="">--</option>"#);
    let mut matched = value.is_empty();
    for option in options {
        let selected = *option == value;
        matched |= selected;
        let _ = write!(
            html,
            r#"<option value="{option}"{selected}>{option}</option>"#,
            selected = if selected { " selected" } else { "" },
        );
    }
    // Keep values outside the option list (e.g. numeric codes) so they are
    // redisplayed verbatim.
    if !matched {
        let _ = write!(
            html,
            r#"<option value="{value}" selected>{value}</option>"#,
            value = escape_html(value),
        );
    }
    html.push_str("</select>");
    html
}

fn result_class(message: &str) -> &'static str {
    match message {
        "Approved" => "approved",
        "Rejected" => "rejected",
        _ => "error",
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
