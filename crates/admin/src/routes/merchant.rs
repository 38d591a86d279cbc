//! Merchant administration page.
//!
//! The one gated view: requires a session token (else the extractor
//! redirects to login), fetches the merchant list, renders the table, and
//! offers create and logout actions. Create failures keep the dialog open
//! with an inline message; only a successful create redirects, forcing a
//! full re-fetch.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use typhoonx_core::{Merchant, MerchantStatus, NewMerchant};

use crate::filters;
use crate::middleware::RequireToken;
use crate::state::AppState;

/// Merchant create form data.
#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub merchant_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub status: String,
}

/// Merchant page template.
///
/// `error` is the page-level failure state; `dialog_error` is the inline
/// message inside the create dialog. The two never render together.
#[derive(Template, WebTemplate)]
#[template(path = "merchant/index.html")]
pub struct MerchantsTemplate {
    pub merchants: Vec<Merchant>,
    pub error: Option<String>,
    pub dialog_open: bool,
    pub dialog_error: Option<String>,
    pub form_name: String,
    pub form_domain: String,
    pub form_status: String,
    pub show_create: bool,
    pub show_domain: bool,
}

impl MerchantsTemplate {
    /// The ready state: a fetched table, dialog closed.
    fn ready(state: &AppState, merchants: Vec<Merchant>) -> Self {
        Self {
            merchants,
            error: None,
            dialog_open: false,
            dialog_error: None,
            form_name: String::new(),
            form_domain: String::new(),
            form_status: MerchantStatus::default().to_string(),
            show_create: state.config().features.merchant_create,
            show_domain: state.config().features.merchant_domain,
        }
    }

    /// The page-level error state; the message is surfaced verbatim.
    fn failed(state: &AppState, message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::ready(state, Vec::new())
        }
    }

    /// Re-open the create dialog with an inline message, preserving what
    /// the user typed.
    fn dialog(state: &AppState, merchants: Vec<Merchant>, form: &CreateForm, message: String) -> Self {
        Self {
            dialog_open: true,
            dialog_error: Some(message),
            form_name: form.merchant_name.clone(),
            form_domain: form.domain.clone(),
            form_status: form.status.clone(),
            ..Self::ready(state, merchants)
        }
    }
}

/// Display the merchant table.
pub async fn index(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
) -> impl IntoResponse {
    match state.directory().list(&token).await {
        Ok(merchants) => MerchantsTemplate::ready(&state, merchants),
        Err(e) => {
            tracing::warn!("Merchant list failed: {e}");
            MerchantsTemplate::failed(&state, e.to_string())
        }
    }
}

/// Handle the create dialog submit.
///
/// Required-field checks short-circuit before the create call ever leaves
/// the process; a rejected create re-renders with the dialog open. Success
/// redirects back to the table, which re-fetches the full list.
pub async fn create(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    Form(form): Form<CreateForm>,
) -> Response {
    let name = form.merchant_name.trim();
    let domain = form.domain.trim();
    let domain_required = state.config().features.merchant_domain;

    if name.is_empty() {
        return dialog_response(&state, &token, &form, "Merchant name is required.").await;
    }
    if domain_required && domain.is_empty() {
        return dialog_response(&state, &token, &form, "Domain is required.").await;
    }

    let status = match form.status.parse::<MerchantStatus>() {
        Ok(status) => status,
        Err(_) => {
            return dialog_response(&state, &token, &form, "Choose a valid status.").await;
        }
    };

    let merchant = NewMerchant {
        merchant_name: name.to_owned(),
        domain: domain.to_owned(),
        status,
    };

    match state.directory().create(&token, &merchant).await {
        Ok(()) => Redirect::to("/admin/merchant").into_response(),
        Err(e) => {
            tracing::warn!("Merchant create failed: {e}");
            dialog_response(&state, &token, &form, e.to_string()).await
        }
    }
}

/// Render the page with the create dialog open and an inline message.
///
/// The table behind the dialog still needs rows, so the list is re-fetched;
/// the create call itself was never (or no longer) in flight. If even the
/// list fails, the page-level error state wins.
async fn dialog_response(
    state: &AppState,
    token: &str,
    form: &CreateForm,
    message: impl Into<String>,
) -> Response {
    match state.directory().list(token).await {
        Ok(merchants) => {
            MerchantsTemplate::dialog(state, merchants, form, message.into()).into_response()
        }
        Err(e) => {
            tracing::warn!("Merchant list failed: {e}");
            MerchantsTemplate::failed(state, e.to_string()).into_response()
        }
    }
}
