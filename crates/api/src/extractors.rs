//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use obrix_core::quotation::{MAX_AMOUNT, MAX_RATE};
use obrix_shared::AppError;

use crate::error::ApiError;

/// JSON body that has passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(AppError::Validation(rejection.body_text())))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Amount or quantity that fits a `NUMERIC(19, 4)` column: `0 <= value < 10^15`.
pub fn amount(value: &Decimal) -> Result<(), ValidationError> {
    in_range(value, MAX_AMOUNT, "amount")
}

/// Rate that fits a `NUMERIC(9, 6)` column: `0 <= value < 1000`.
pub fn rate(value: &Decimal) -> Result<(), ValidationError> {
    in_range(value, MAX_RATE, "rate")
}

/// Strictly positive amount: `0 < value < 10^15`.
pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("positive"));
    }
    amount(value)
}

fn in_range(value: &Decimal, max: Decimal, code: &'static str) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    if *value >= max {
        return Err(ValidationError::new(code).with_message(format!("must be less than {max}").into()));
    }
    Ok(())
}
