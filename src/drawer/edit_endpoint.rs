//! Defines the endpoint for updating a single field of the draft.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::{
    Error,
    drawer::{
        draft::{Field, PayOutSlot},
        form_page::{DrawerState, totals_partial},
    },
    identity::CurrentUser,
    timezone::local_today,
};

/// The form data for a single field edit.
#[derive(Debug, Deserialize)]
pub struct FieldEditForm {
    /// The name of the field, e.g. "bill20" or "payOutDesc".
    pub field: String,
    /// The pay-out slot for "payOutDesc" and "payOutAmount".
    ///
    /// Kept as text so a malformed index is reported as a bad slot rather
    /// than a form rejection.
    #[serde(default)]
    pub index: Option<String>,
    /// The raw input value.
    #[serde(default)]
    pub value: String,
}

impl TryFrom<&FieldEditForm> for Field {
    type Error = Error;

    fn try_from(form: &FieldEditForm) -> Result<Self, Self::Error> {
        let slot = || {
            form.index
                .as_deref()
                .and_then(|index| index.trim().parse::<usize>().ok())
                .and_then(PayOutSlot::new)
                .ok_or_else(|| Error::InvalidPayOutSlot(form.index.clone()))
        };

        let field = match form.field.as_str() {
            "saleDate" => Field::SaleDate,
            "bill20" => Field::Bill20,
            "bill10" => Field::Bill10,
            "bill5" => Field::Bill5,
            "bill1" => Field::Bill1,
            "coin25" => Field::Coin25,
            "coin10" => Field::Coin10,
            "coin5" => Field::Coin5,
            "coin1" => Field::Coin1,
            "payOutDesc" => Field::PayOutDescription(slot()?),
            "payOutAmount" => Field::PayOutAmount(slot()?),
            "athAmount" => Field::AthAmount,
            "athReference" => Field::AthReference,
            "lectureTotal" => Field::LectureTotal,
            "pettyCash" => Field::PettyCash,
            name => return Err(Error::UnknownField(name.to_owned())),
        };

        Ok(field)
    }
}

/// The name used for `field` in [FieldEditForm].
pub fn field_name(field: Field) -> &'static str {
    match field {
        Field::SaleDate => "saleDate",
        Field::Bill20 => "bill20",
        Field::Bill10 => "bill10",
        Field::Bill5 => "bill5",
        Field::Bill1 => "bill1",
        Field::Coin25 => "coin25",
        Field::Coin10 => "coin10",
        Field::Coin5 => "coin5",
        Field::Coin1 => "coin1",
        Field::PayOutDescription(_) => "payOutDesc",
        Field::PayOutAmount(_) => "payOutAmount",
        Field::AthAmount => "athAmount",
        Field::AthReference => "athReference",
        Field::LectureTotal => "lectureTotal",
        Field::PettyCash => "pettyCash",
    }
}

/// A route handler for updating one field of the user's draft.
///
/// Responds with out-of-band swaps for every subtotal, the net total, and the
/// edited field's error message if the edit cleared it.
pub async fn edit_field_endpoint(
    State(state): State<DrawerState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<FieldEditForm>,
) -> Response {
    let field = match Field::try_from(&form) {
        Ok(field) => field,
        Err(error) => {
            tracing::warn!("Rejected edit {form:?} from {}: {error}", user.name());
            return error.into_alert_response();
        }
    };

    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let outcome = state
        .sessions
        .with_session(user.name(), || today, |session| {
            session
                .edit(field, &form.value)
                .map(|cleared_error| (*session.totals(), cleared_error))
        })
        .and_then(|outcome| outcome);

    match outcome {
        Ok((totals, cleared_error)) => totals_partial(&totals, cleared_error).into_response(),
        Err(error) => {
            tracing::warn!("Could not edit {field:?} for {}: {error}", user.name());
            error.into_alert_response()
        }
    }
}
