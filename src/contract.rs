//! Contract Agreement
//!
//! The terms-of-service agreement a creator signs before payouts. A
//! submission is a plain record: identity and address fields plus a
//! signature, which is either typed text or a drawn PNG image encoded as
//! a data URL. Validated submissions are persisted through the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::{Gateway, GatewayError, UserId};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// How the agreement was signed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Signature {
    /// Name typed by the signer
    Typed { text: String },
    /// Drawn signature as a `data:image/png;base64,...` URL
    Drawn { data_url: String },
}

impl Signature {
    pub fn method(&self) -> &'static str {
        match self {
            Signature::Typed { .. } => "typed",
            Signature::Drawn { .. } => "drawn",
        }
    }
}

/// A filled-in contract agreement form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSubmission {
    pub legal_name: String,
    pub street_address: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    pub signature: Signature,
}

impl ContractSubmission {
    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), ContractError> {
        let fields = [
            ("legal_name", &self.legal_name),
            ("street_address", &self.street_address),
            ("city", &self.city),
            ("state_province", &self.state_province),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ContractError::MissingField(name));
            }
        }

        match &self.signature {
            Signature::Typed { text } if text.trim().is_empty() => {
                Err(ContractError::MissingField("signature"))
            }
            Signature::Drawn { data_url } => {
                let payload = data_url
                    .strip_prefix(PNG_DATA_URL_PREFIX)
                    .ok_or(ContractError::InvalidSignature)?;
                if payload.trim().is_empty() {
                    return Err(ContractError::InvalidSignature);
                }
                Ok(())
            }
            Signature::Typed { .. } => Ok(()),
        }
    }

    /// Copy with surrounding whitespace removed from text fields
    pub fn normalized(&self) -> Self {
        let signature = match &self.signature {
            Signature::Typed { text } => Signature::Typed {
                text: text.trim().to_string(),
            },
            drawn => drawn.clone(),
        };

        Self {
            legal_name: self.legal_name.trim().to_string(),
            street_address: self.street_address.trim().to_string(),
            city: self.city.trim().to_string(),
            state_province: self.state_province.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
            signature,
        }
    }
}

/// Confirmation of a stored agreement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractReceipt {
    pub id: String,
    pub signed_at: DateTime<Utc>,
    pub method: String,
}

/// Validate and persist a contract agreement for `user`
pub async fn submit(
    gateway: &dyn Gateway,
    user: &UserId,
    submission: &ContractSubmission,
    signed_at: DateTime<Utc>,
) -> Result<ContractReceipt, ContractError> {
    submission.validate()?;
    let submission = submission.normalized();

    let id = gateway.save_contract(user, &submission, signed_at).await?;

    tracing::info!(
        user = %user,
        contract_id = %id,
        method = submission.signature.method(),
        "Contract agreement stored"
    );

    Ok(ContractReceipt {
        id,
        signed_at,
        method: submission.signature.method().to_string(),
    })
}

/// Errors that can occur when submitting a contract
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Drawn signature must be a PNG data URL")]
    InvalidSignature,

    #[error("Failed to store contract: {0}")]
    Gateway(#[from] GatewayError),
}
