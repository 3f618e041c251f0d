//! Defines the route handler and views for the cash drawer form.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, endpoints,
    drawer::{
        confirmation::confirmation_view,
        draft::{Draft, Field, PayOutSlot},
        edit_endpoint::field_name,
        session::{FormSession, FormSessions, FormState},
        totals::DerivedTotals,
        validation::{ErrorKey, ValidationErrors},
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, SECTION_HEADER_STYLE, SECTION_STYLE, base, dollar_input_styles,
        format_currency, loading_spinner,
    },
    identity::CurrentUser,
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed to view and edit the form.
#[derive(Debug, Clone)]
pub struct DrawerState {
    /// The form session of every user.
    pub sessions: FormSessions,
    /// The local timezone as a canonical timezone name, e.g. "America/Puerto_Rico".
    pub local_timezone: String,
}

impl FromRef<AppState> for DrawerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The element the form is rendered into and that submissions replace.
pub const FORM_ID: &str = "drawer-form";
pub const SUBMISSION_ERROR_ID: &str = "submission-error";

const BILLS_SUBTOTAL_ID: &str = "bills-subtotal";
const COINS_SUBTOTAL_ID: &str = "coins-subtotal";
const PAY_OUT_SUBTOTAL_ID: &str = "pay-out-subtotal";
const ATH_SUBTOTAL_ID: &str = "ath-subtotal";
const LECTURE_SUBTOTAL_ID: &str = "lecture-subtotal";
const PETTY_CASH_SUBTOTAL_ID: &str = "petty-cash-subtotal";
const NET_TOTAL_ID: &str = "net-total";

// Edits and submissions for the form are queued so a submit always sees the
// last edit.
const SYNC: &str = "#drawer-form:queue all";

const BILLS: [(Field, &str); 4] = [
    (Field::Bill20, "$20 bills"),
    (Field::Bill10, "$10 bills"),
    (Field::Bill5, "$5 bills"),
    (Field::Bill1, "$1 bills"),
];

const COINS: [(Field, &str); 4] = [
    (Field::Coin25, "Quarters"),
    (Field::Coin10, "Dimes"),
    (Field::Coin5, "Nickels"),
    (Field::Coin1, "Pennies"),
];

/// The amount shown in each subtotal element. Deductions are shown as negative.
fn displayed_subtotals(totals: &DerivedTotals) -> [(&'static str, f64); 7] {
    [
        (BILLS_SUBTOTAL_ID, totals.bills_subtotal),
        (COINS_SUBTOTAL_ID, totals.coins_subtotal),
        (PAY_OUT_SUBTOTAL_ID, -totals.pay_out_subtotal),
        (ATH_SUBTOTAL_ID, totals.ath_subtotal),
        (LECTURE_SUBTOTAL_ID, totals.lecture_subtotal),
        (PETTY_CASH_SUBTOTAL_ID, -totals.petty_cash_subtotal),
        (NET_TOTAL_ID, totals.net_total),
    ]
}

fn subtotal(totals: &DerivedTotals, id: &str) -> Markup {
    let amount = displayed_subtotals(totals)
        .into_iter()
        .find_map(|(subtotal_id, amount)| (subtotal_id == id).then_some(amount))
        .unwrap_or_default();

    amount_span(id, amount, false)
}

fn amount_span(id: &str, amount: f64, out_of_band: bool) -> Markup {
    html! {
        span
            id=(id)
            hx-swap-oob=[out_of_band.then_some("true")]
            class="font-mono"
        {
            (format_currency(amount))
        }
    }
}

fn error_message(errors: &ValidationErrors, key: ErrorKey) -> Markup {
    html! {
        p id=(key.element_id()) class=(FORM_ERROR_STYLE)
        {
            @if let Some(message) = errors.get(key) {
                (message)
            }
        }
    }
}

/// The response to a field edit: every subtotal and the net total, plus the
/// emptied error message for `cleared_error`, as out-of-band swaps.
pub fn totals_partial(totals: &DerivedTotals, cleared_error: Option<ErrorKey>) -> Markup {
    html! {
        @for (id, amount) in displayed_subtotals(totals) {
            (amount_span(id, amount, true))
        }

        @if let Some(key) = cleared_error {
            p id=(key.element_id()) hx-swap-oob="true" class=(FORM_ERROR_STYLE) {}
        }
    }
}

/// The banner describing a failed submission, or an empty placeholder.
pub fn submission_banner(message: Option<&str>) -> Markup {
    html! {
        div id=(SUBMISSION_ERROR_ID)
        {
            @if let Some(message) = message {
                div
                    role="alert"
                    class="p-4 rounded-lg border text-red-800 bg-red-50 border-red-300
                        dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
                {
                    div class="flex justify-between items-start gap-4"
                    {
                        p { (message) }

                        button
                            type="button"
                            hx-post=(endpoints::DISMISS_ERROR)
                            hx-target={ "#" (SUBMISSION_ERROR_ID) }
                            hx-swap="outerHTML"
                            class="text-sm underline"
                        {
                            "Dismiss"
                        }
                    }
                }
            }
        }
    }
}

fn input_id(field: Field) -> String {
    match field {
        Field::PayOutDescription(slot) | Field::PayOutAmount(slot) => {
            format!("{}-{slot}", field_name(field))
        }
        _ => field_name(field).to_owned(),
    }
}

/// The `hx-vals` that identify `field` to the edit endpoint.
fn field_vals(field: Field) -> String {
    match field {
        Field::PayOutDescription(slot) | Field::PayOutAmount(slot) => {
            serde_json::json!({ "field": field_name(field), "index": slot.index() })
        }
        _ => serde_json::json!({ "field": field_name(field) }),
    }
    .to_string()
}

#[derive(Clone, Copy)]
enum InputKind {
    Date,
    Text,
    Count,
    Money,
}

fn field_input(
    draft: &Draft,
    field: Field,
    label: &str,
    kind: InputKind,
    is_disabled: bool,
) -> Markup {
    let id = input_id(field);
    let value = draft.display_value(field);
    let (input_type, step, input_mode) = match kind {
        InputKind::Date => ("date", None, None),
        InputKind::Text => ("text", None, None),
        InputKind::Count => ("number", Some("1"), Some("numeric")),
        InputKind::Money => ("number", Some("0.01"), Some("decimal")),
    };

    let input = html! {
        input
            id=(id)
            name="value"
            type=(input_type)
            value=(value)
            min=[step.map(|_| "0")]
            step=[step]
            inputmode=[input_mode]
            disabled[is_disabled]
            hx-post=(endpoints::DRAFT_FIELD)
            hx-trigger="input changed delay:300ms"
            hx-vals=(field_vals(field))
            hx-swap="none"
            hx-sync=(SYNC)
            class=(FORM_TEXT_INPUT_STYLE);
    };

    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }

            @if matches!(kind, InputKind::Money) {
                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full" { (input) }
            } @else {
                (input)
            }
        }
    }
}

fn section_header(title: &str, subtotal: Markup) -> Markup {
    html! {
        h3 class=(SECTION_HEADER_STYLE)
        {
            span { (title) }
            (subtotal)
        }
    }
}

/// The editable form for `session`, including its errors and banner.
pub fn drawer_form(session: &FormSession) -> Markup {
    let draft = session.draft();
    let totals = session.totals();
    let errors = session.errors();
    let is_submitting = session.state() == FormState::Submitting;
    let spinner = loading_spinner();

    html! {
        div
            id=(FORM_ID)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Cash Drawer Count" }

            (submission_banner(session.submission_error()))

            section class=(SECTION_STYLE)
            {
                (field_input(draft, Field::SaleDate, "Sale Date", InputKind::Date, is_submitting))
                (error_message(errors, ErrorKey::SaleDate))
                (error_message(errors, ErrorKey::General))
            }

            section class=(SECTION_STYLE)
            {
                (section_header("Bills", subtotal(totals, BILLS_SUBTOTAL_ID)))

                div class="grid grid-cols-2 gap-4"
                {
                    @for (field, label) in BILLS {
                        (field_input(draft, field, label, InputKind::Count, is_submitting))
                    }
                }
            }

            section class=(SECTION_STYLE)
            {
                (section_header("Coins", subtotal(totals, COINS_SUBTOTAL_ID)))

                div class="grid grid-cols-2 gap-4"
                {
                    @for (field, label) in COINS {
                        (field_input(draft, field, label, InputKind::Count, is_submitting))
                    }
                }
            }

            section class=(SECTION_STYLE)
            {
                (section_header("Pay Outs", subtotal(totals, PAY_OUT_SUBTOTAL_ID)))

                @for slot in PayOutSlot::all() {
                    div class="grid grid-cols-3 gap-4"
                    {
                        div class="col-span-2"
                        {
                            (field_input(
                                draft,
                                Field::PayOutDescription(slot),
                                &format!("Pay out #{} description", slot.index() + 1),
                                InputKind::Text,
                                is_submitting,
                            ))
                        }

                        (field_input(draft, Field::PayOutAmount(slot), "Amount", InputKind::Money, is_submitting))
                    }

                    (error_message(errors, ErrorKey::PayOutDescription(slot)))
                }
            }

            section class=(SECTION_STYLE)
            {
                (section_header("ATH Payment", subtotal(totals, ATH_SUBTOTAL_ID)))

                div class="grid grid-cols-2 gap-4"
                {
                    (field_input(draft, Field::AthAmount, "Amount", InputKind::Money, is_submitting))
                    (field_input(draft, Field::AthReference, "Reference", InputKind::Text, is_submitting))
                }
            }

            section class=(SECTION_STYLE)
            {
                (section_header("Lecture Total", subtotal(totals, LECTURE_SUBTOTAL_ID)))
                (field_input(draft, Field::LectureTotal, "Amount", InputKind::Money, is_submitting))
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "For information only, not included in the Net Total."
                }
            }

            section class=(SECTION_STYLE)
            {
                (section_header("Petty Cash", subtotal(totals, PETTY_CASH_SUBTOTAL_ID)))
                (field_input(draft, Field::PettyCash, "Amount", InputKind::Money, is_submitting))
            }

            section class=(SECTION_STYLE)
            {
                (section_header("Net Total", subtotal(totals, NET_TOTAL_ID)))
            }

            button
                type="button"
                id="submit-button"
                tabindex="0"
                hx-post=(endpoints::SUBMIT)
                hx-target={ "#" (FORM_ID) }
                hx-swap="outerHTML"
                hx-sync=(SYNC)
                hx-disabled-elt="this"
                hx-indicator="#indicator"
                disabled[is_submitting]
                class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (spinner)
                }
                " Complete Transaction"
            }
        }
    }
}

fn form_page_view(user: &CurrentUser, session: &FormSession) -> Markup {
    let nav_bar = NavBar::new(endpoints::FORM_VIEW, user).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            @if session.state() == FormState::Submitted {
                (confirmation_view(session))
            } @else {
                (drawer_form(session))
            }
        }
    };

    base("Cash Drawer", &[dollar_input_styles()], &content)
}

/// Renders the form for the current user, or the confirmation once their
/// transaction has been submitted.
pub async fn get_form_page(
    State(state): State<DrawerState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    match state
        .sessions
        .with_session(user.name(), || today, |session| session.clone())
    {
        Ok(session) => form_page_view(&user, &session).into_response(),
        Err(error) => error.into_response(),
    }
}
