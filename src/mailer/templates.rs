use once_cell::sync::Lazy;
use tera::{Context, Tera};

use crate::error::AppError;

use super::{EmailData, EmailTemplate};

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            "email/layout.html",
            include_str!("../../templates/email/layout.html.tera"),
        ),
        (
            "email/registration.html",
            include_str!("../../templates/email/registration.html.tera"),
        ),
        (
            "email/admission.html",
            include_str!("../../templates/email/admission.html.tera"),
        ),
        (
            "email/rejection.html",
            include_str!("../../templates/email/rejection.html.tera"),
        ),
    ])
    .expect("email templates are valid");
    tera.autoescape_on(vec![".html"]);
    tera
});

fn template_name(template: EmailTemplate) -> String {
    format!("email/{}.html", template.as_str())
}

pub fn render(template: EmailTemplate, data: &EmailData) -> Result<String, AppError> {
    let context = Context::from_serialize(data)?;
    let html = TEMPLATES.render(&template_name(template), &context)?;
    Ok(html)
}
