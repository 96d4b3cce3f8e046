//! Staff-only routes.

use salvo::prelude::*;

use crate::extensions::*;

/// Reject callers that are not staff.
#[salvo::handler]
pub(crate) async fn require_staff(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.principal_or_401() {
        Ok(principal) if principal.is_staff() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_customer) => {
            res.render(StatusError::forbidden().brief("Staff access required"));
        }
        Err(error) => res.render(error),
    }
}
