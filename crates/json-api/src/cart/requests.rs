//! Cart line payloads

use std::collections::BTreeMap;

use driftworks::catalog::{AddonUuid, ProductUuid};
use driftworks_app::checkout::{LineChoice, RequestedLine};
use jiff::civil::Date;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extensions::*;

/// Line kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LineKindBody {
    Physical,
    Experience,
}

/// Cart Line Request
///
/// A line of the client-held cart. Prices are always resolved server-side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineRequest {
    /// Product to buy
    pub product_uuid: Uuid,

    /// Must match the product's kind
    pub kind: LineKindBody,

    /// Units, 1 to 10
    pub quantity: u32,

    /// Option name -> value, physical lines only
    #[serde(default)]
    pub options: BTreeMap<String, String>,

    /// Selected addon UUIDs, experience lines only
    #[serde(default)]
    pub addons: Vec<Uuid>,

    /// Preferred experience date (`YYYY-MM-DD`)
    #[serde(default)]
    pub preferred_date: Option<String>,

    /// Name printed on the voucher, at most 16 characters
    #[serde(default)]
    pub recipient_name: Option<String>,
}

impl TryFrom<CartLineRequest> for RequestedLine {
    type Error = StatusError;

    fn try_from(line: CartLineRequest) -> Result<Self, Self::Error> {
        let choice = match line.kind {
            LineKindBody::Physical => {
                if !line.addons.is_empty()
                    || line.preferred_date.is_some()
                    || line.recipient_name.is_some()
                {
                    return Err(StatusError::bad_request()
                        .brief("physical lines take options only"));
                }

                LineChoice::Physical {
                    options: line.options,
                }
            }
            LineKindBody::Experience => {
                if !line.options.is_empty() {
                    return Err(StatusError::bad_request()
                        .brief("experience lines take no options"));
                }

                LineChoice::Experience {
                    addons: line.addons.into_iter().map(AddonUuid::from_uuid).collect(),
                    preferred_date: line
                        .preferred_date
                        .as_deref()
                        .map(str::parse::<Date>)
                        .transpose()
                        .or_400("preferred_date must be formatted as YYYY-MM-DD")?,
                    recipient_name: line.recipient_name,
                }
            }
        };

        Ok(Self {
            product: ProductUuid::from_uuid(line.product_uuid),
            quantity: line.quantity,
            choice,
        })
    }
}

/// Convert every requested line, failing on the first malformed one.
pub(crate) fn into_requested_lines(
    lines: Vec<CartLineRequest>,
) -> Result<Vec<RequestedLine>, StatusError> {
    lines.into_iter().map(RequestedLine::try_from).collect()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn experience(preferred_date: Option<&str>) -> CartLineRequest {
        CartLineRequest {
            product_uuid: Uuid::new_v4(),
            kind: LineKindBody::Experience,
            quantity: 1,
            options: BTreeMap::new(),
            addons: vec![Uuid::new_v4()],
            preferred_date: preferred_date.map(str::to_string),
            recipient_name: Some("Mika".to_string()),
        }
    }

    #[test]
    fn experience_line_parses_date() -> TestResult {
        let line = RequestedLine::try_from(experience(Some("2025-06-01")))?;

        let LineChoice::Experience {
            preferred_date,
            recipient_name,
            ..
        } = line.choice
        else {
            return Err("expected an experience choice".into());
        };

        assert_eq!(preferred_date, Some(date(2025, 6, 1)));
        assert_eq!(recipient_name.as_deref(), Some("Mika"));

        Ok(())
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(RequestedLine::try_from(experience(Some("June 1st"))).is_err());
    }

    #[test]
    fn physical_line_with_addons_is_rejected() {
        let mut line = experience(None);

        line.kind = LineKindBody::Physical;
        line.recipient_name = None;

        assert!(RequestedLine::try_from(line).is_err());
    }
}
