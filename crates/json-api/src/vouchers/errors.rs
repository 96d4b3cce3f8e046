//! Errors

use driftworks::vouchers::VoucherStateError;
use salvo::http::StatusError;
use tracing::error;

use driftworks_app::domain::vouchers::VouchersServiceError;

pub(crate) fn into_status_error(error: VouchersServiceError) -> StatusError {
    match error {
        VouchersServiceError::NotFound | VouchersServiceError::State(VoucherStateError::NotFound) => {
            StatusError::not_found().brief("Voucher not found")
        }
        VouchersServiceError::State(VoucherStateError::AlreadyRedeemed) => {
            StatusError::conflict().brief("Voucher already redeemed")
        }
        VouchersServiceError::State(VoucherStateError::Expired) => {
            StatusError::gone().brief("Voucher has expired")
        }
        VouchersServiceError::State(VoucherStateError::NotActive) => {
            StatusError::conflict().brief("Voucher has no confirmed date yet")
        }
        VouchersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Voucher already exists")
        }
        VouchersServiceError::NotAnExperience => {
            StatusError::unprocessable_entity().brief("Order item is not an experience")
        }
        VouchersServiceError::NoDate => {
            StatusError::unprocessable_entity().brief("Order item has no date to confirm")
        }
        VouchersServiceError::DateInPast => {
            StatusError::unprocessable_entity().brief("Date lies in the past")
        }
        VouchersServiceError::InvalidDate(source) => {
            error!("voucher expiry out of range: {source}");

            StatusError::unprocessable_entity().brief("Date is out of range")
        }
        VouchersServiceError::InvalidReference
        | VouchersServiceError::MissingRequiredData
        | VouchersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid voucher payload")
        }
        VouchersServiceError::Sql(source) => {
            error!("voucher storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
