//! Resource/operation dispatch table.
//!
//! Every supported (resource, operation) pair resolves to one [`Action`]
//! variant, and every variant has exactly one HTTP method and path.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiRequest;
use crate::error::{Error, Result};

/// Top-level category of API capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    #[default]
    PersonEmail,
    CompanyEmails,
    DecisionMaker,
    LinkedinEmail,
    EmailVerification,
    AccountInfo,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::AccountInfo,
        Resource::CompanyEmails,
        Resource::DecisionMaker,
        Resource::EmailVerification,
        Resource::LinkedinEmail,
        Resource::PersonEmail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::PersonEmail => "personEmail",
            Resource::CompanyEmails => "companyEmails",
            Resource::DecisionMaker => "decisionMaker",
            Resource::LinkedinEmail => "linkedinEmail",
            Resource::EmailVerification => "emailVerification",
            Resource::AccountInfo => "accountInfo",
        }
    }

    /// The single operation each resource currently offers.
    pub fn default_operation(&self) -> Operation {
        match self {
            Resource::PersonEmail | Resource::DecisionMaker | Resource::LinkedinEmail => {
                Operation::FindEmail
            }
            Resource::CompanyEmails => Operation::FindEmails,
            Resource::EmailVerification => Operation::VerifyEmail,
            Resource::AccountInfo => Operation::GetInfo,
        }
    }

    /// Whether this resource looks up by domain or company name.
    pub fn needs_company_identifier(&self) -> bool {
        matches!(
            self,
            Resource::PersonEmail | Resource::CompanyEmails | Resource::DecisionMaker
        )
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specific action within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    FindEmail,
    FindEmails,
    VerifyEmail,
    GetInfo,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FindEmail => "findEmail",
            Operation::FindEmails => "findEmails",
            Operation::VerifyEmail => "verifyEmail",
            Operation::GetInfo => "getInfo",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain and/or company name; at least one is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyIdentifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_name: Option<String>,
}

impl CompanyIdentifier {
    /// Returns `MissingIdentifier` when both parts are absent.
    pub fn new(
        domain: Option<String>,
        company_name: Option<String>,
        item_index: usize,
    ) -> Result<Self> {
        if domain.is_none() && company_name.is_none() {
            return Err(Error::MissingIdentifier { item_index });
        }
        Ok(Self {
            domain,
            company_name,
        })
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }
}

/// How a person is identified to the person lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PersonName {
    Split {
        first_name: String,
        last_name: String,
    },
    Full {
        full_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonLookup {
    #[serde(flatten)]
    pub name: PersonName,
    #[serde(flatten)]
    pub company: CompanyIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyLookup {
    #[serde(flatten)]
    pub company: CompanyIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionMakerLookup {
    #[serde(flatten)]
    pub company: CompanyIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedinLookup {
    pub linkedin_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailVerification {
    pub email: String,
}

/// A fully validated call to the Anymailfinder API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FindPersonEmail(PersonLookup),
    FindCompanyEmails(CompanyLookup),
    FindDecisionMakerEmail(DecisionMakerLookup),
    FindLinkedinEmail(LinkedinLookup),
    VerifyEmail(EmailVerification),
    GetAccountInfo,
}

impl Action {
    pub fn resource(&self) -> Resource {
        match self {
            Action::FindPersonEmail(_) => Resource::PersonEmail,
            Action::FindCompanyEmails(_) => Resource::CompanyEmails,
            Action::FindDecisionMakerEmail(_) => Resource::DecisionMaker,
            Action::FindLinkedinEmail(_) => Resource::LinkedinEmail,
            Action::VerifyEmail(_) => Resource::EmailVerification,
            Action::GetAccountInfo => Resource::AccountInfo,
        }
    }

    pub fn operation(&self) -> Operation {
        self.resource().default_operation()
    }

    pub fn method(&self) -> Method {
        match self {
            Action::GetAccountInfo => Method::GET,
            _ => Method::POST,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Action::FindPersonEmail(_) => "/v5.1/find-email/person",
            Action::FindCompanyEmails(_) => "/v5.1/find-email/company",
            Action::FindDecisionMakerEmail(_) => "/v5.1/find-email/decision-maker",
            Action::FindLinkedinEmail(_) => "/v5.1/find-email/linkedin-url",
            Action::VerifyEmail(_) => "/v5.1/verify-email",
            Action::GetAccountInfo => "/v5.0/meta/account.json",
        }
    }

    /// JSON body for the request; `None` for bodiless calls.
    pub fn body(&self) -> Result<Option<Value>> {
        let body = match self {
            Action::FindPersonEmail(lookup) => serde_json::to_value(lookup)?,
            Action::FindCompanyEmails(lookup) => serde_json::to_value(lookup)?,
            Action::FindDecisionMakerEmail(lookup) => serde_json::to_value(lookup)?,
            Action::FindLinkedinEmail(lookup) => serde_json::to_value(lookup)?,
            Action::VerifyEmail(verification) => serde_json::to_value(verification)?,
            Action::GetAccountInfo => return Ok(None),
        };
        Ok(Some(body))
    }

    pub fn to_request(&self) -> Result<ApiRequest> {
        Ok(ApiRequest {
            method: self.method(),
            path: self.path(),
            body: self.body()?,
        })
    }
}
