//! Turning a validated order into a request and the reply into an outcome.

use crate::api::{FormPayload, StoreApi};
use crate::draft::OrderDraft;
use crate::validation::{self, messages, FieldError, OrderFields};
use crate::OrderType;
use log::{info, warn};

/// Where and how the order is posted.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitContext {
    pub endpoint: String,
    pub csrf_token: String,
}

/// Final state of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Rejected locally; nothing was sent.
    Invalid(Vec<FieldError>),
    /// The server stored the order.
    Accepted { message: String },
    /// The server answered `success: false`.
    Rejected { message: String },
    /// Network failure, non-2xx status or an unreadable body.
    TransportFailed,
}

impl SubmitOutcome {
    /// Text for the shared form-level error region, if any.
    pub fn form_error(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Rejected { message } => Some(message),
            SubmitOutcome::TransportFailed => Some(messages::SUBMIT_FAILED),
            SubmitOutcome::Invalid(_) | SubmitOutcome::Accepted { .. } => None,
        }
    }
}

/// Serialize the form fields plus the tracked selections.
pub fn build_payload(draft: &OrderDraft, fields: &OrderFields, csrf_token: &str) -> FormPayload {
    let mut payload: FormPayload = vec![
        ("csrfmiddlewaretoken".into(), csrf_token.into()),
        ("name".into(), fields.name.trim().into()),
        ("phone".into(), fields.phone.trim().into()),
        ("order_type".into(), draft.order_type.as_str().into()),
        ("comment".into(), fields.comment.trim().into()),
    ];

    match draft.order_type {
        OrderType::Buy | OrderType::DoubleBuy => {
            let double_game_count = if draft.order_type == OrderType::DoubleBuy {
                2
            } else {
                draft.double_game_count
            };
            payload.push(("delivery_address".into(), fields.delivery_address.trim().into()));
            payload.push((
                "engraving".into(),
                if fields.engraving { "yes" } else { "no" }.into(),
            ));
            payload.push(("double_game_count".into(), double_game_count.to_string()));
        }
        OrderType::Rent => {
            if let Some(option) = draft.rent_option_id {
                payload.push(("rent_type".into(), option.to_string()));
            }
            payload.push(("rent_date".into(), fields.rent_date.trim().into()));
            payload.push(("rent_address".into(), fields.rent_address.trim().into()));
        }
        OrderType::Unset => {}
    }

    payload.extend(
        draft
            .tracked_selection()
            .into_iter()
            .map(|(key, id)| (key.to_string(), id.to_string())),
    );
    payload
}

/// Validate and, if the order is complete, post it.
///
/// No request is made when validation fails.
pub async fn submit_order<A: StoreApi + ?Sized>(
    api: &A,
    draft: &OrderDraft,
    fields: &OrderFields,
    ctx: &SubmitContext,
) -> SubmitOutcome {
    let errors = validation::validate(draft, fields);
    if !errors.is_empty() {
        return SubmitOutcome::Invalid(errors);
    }

    let payload = build_payload(draft, fields, &ctx.csrf_token);
    match api.submit_order(&ctx.endpoint, &ctx.csrf_token, &payload).await {
        Ok(response) if response.success => {
            info!("Order accepted");
            SubmitOutcome::Accepted {
                message: response
                    .message
                    .unwrap_or_else(|| messages::ORDER_ACCEPTED.to_string()),
            }
        }
        Ok(response) => {
            warn!("Order rejected by server: {:?}", response.message);
            SubmitOutcome::Rejected {
                message: response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| messages::SUBMIT_FAILED.to_string()),
            }
        }
        Err(e) => {
            warn!("Order submission failed: {}", e);
            SubmitOutcome::TransportFailed
        }
    }
}
