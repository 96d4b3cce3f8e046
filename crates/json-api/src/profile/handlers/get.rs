//! Get Profile Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use driftworks_app::domain::profiles::records::ProfileRecord;

use crate::{
    details::{ContactBody, ShippingAddressBody},
    extensions::*,
    profile::errors::into_status_error,
    state::State,
};

/// Profile Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileResponse {
    /// Contact details from the latest order
    pub contact: ContactBody,

    /// Last shipping address used
    pub shipping: Option<ShippingAddressBody>,

    /// The date and time the details were last saved
    pub updated_at: String,
}

impl From<ProfileRecord> for ProfileResponse {
    fn from(record: ProfileRecord) -> Self {
        Self {
            contact: record.contact.into(),
            shipping: record.shipping.map(ShippingAddressBody::from),
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// Get Profile Handler
///
/// Returns the contact and shipping details saved from the caller's latest
/// order, for prefilling the next checkout.
#[endpoint(
    tags("profile"),
    summary = "Get Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Saved details"),
        (status_code = StatusCode::NOT_FOUND, description = "Nothing saved yet"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let profile = state
        .app
        .profiles
        .get_profile(principal.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}
