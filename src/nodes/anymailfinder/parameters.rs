//! Node parameters and their resolution into an [`Action`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::action::{
    Action, CompanyIdentifier, CompanyLookup, DecisionMakerLookup, EmailVerification,
    LinkedinLookup, Operation, PersonLookup, PersonName, Resource,
};
use crate::error::{Error, Result};

/// Default for `additionalFields.limit`.
pub const DEFAULT_LIMIT: u32 = 50;

/// Parameters for one item, after template rendering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeParameters {
    #[serde(default)]
    pub resource: Resource,
    #[serde(default)]
    pub operation: Option<Operation>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub additional_fields: AdditionalFields,
}

/// Optional fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFields {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, deserialize_with = "deserialize_limit")]
    pub limit: Option<i64>,
}

/// Accept a limit as a number, a numeric string, or empty.
fn deserialize_limit<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("limit must be an integer, got {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("limit must be an integer, got '{}'", s))),
        other => Err(serde::de::Error::custom(format!(
            "limit must be an integer, got {}",
            other
        ))),
    }
}

/// The value as given, or `None` when it is blank.
fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl NodeParameters {
    /// Parse the parameter bag for one item.
    pub fn from_value(value: Value, item_index: usize) -> Result<Self> {
        let value = match value {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        serde_json::from_value(value)
            .map_err(|e| Error::Parameter(format!("Invalid parameters: {}", e)).at_item(item_index))
    }

    /// Resolved operation (explicit or the resource's default).
    pub fn operation(&self) -> Operation {
        self.operation
            .unwrap_or_else(|| self.resource.default_operation())
    }

    fn company_identifier(&self, item_index: usize) -> Result<CompanyIdentifier> {
        CompanyIdentifier::new(
            non_empty(&self.domain),
            non_empty(&self.company_name),
            item_index,
        )
    }

    fn person_name(&self, item_index: usize) -> Result<PersonName> {
        let extra = &self.additional_fields;
        match (non_empty(&extra.first_name), non_empty(&extra.last_name)) {
            (Some(first_name), Some(last_name)) => Ok(PersonName::Split {
                first_name,
                last_name,
            }),
            _ => non_empty(&self.full_name)
                .map(|full_name| PersonName::Full { full_name })
                .ok_or_else(|| {
                    Error::validation(
                        item_index,
                        "Either full name or first and last name must be provided",
                    )
                }),
        }
    }

    fn limit(&self, item_index: usize) -> Result<Option<u32>> {
        match self.additional_fields.limit {
            None => Ok(None),
            Some(limit) if limit < 1 => Err(Error::validation(
                item_index,
                format!("Limit must be at least 1, got {}", limit),
            )),
            Some(limit) => {
                let limit = u32::try_from(limit).map_err(|_| {
                    Error::validation(item_index, format!("Limit {} is too large", limit))
                })?;
                Ok((limit != DEFAULT_LIMIT).then_some(limit))
            }
        }
    }

    /// Validate the parameters and map them onto the dispatch table.
    pub fn into_action(self, item_index: usize) -> Result<Action> {
        let operation = self.operation();
        let extra = &self.additional_fields;

        match (self.resource, operation) {
            (Resource::PersonEmail, Operation::FindEmail) => {
                let company = self.company_identifier(item_index)?;
                let name = self.person_name(item_index)?;
                Ok(Action::FindPersonEmail(PersonLookup {
                    name,
                    company,
                    position: non_empty(&extra.position),
                    department: non_empty(&extra.department),
                }))
            }
            (Resource::CompanyEmails, Operation::FindEmails) => {
                let company = self.company_identifier(item_index)?;
                Ok(Action::FindCompanyEmails(CompanyLookup {
                    company,
                    department: non_empty(&extra.department),
                    limit: self.limit(item_index)?,
                }))
            }
            (Resource::DecisionMaker, Operation::FindEmail) => {
                let company = self.company_identifier(item_index)?;
                Ok(Action::FindDecisionMakerEmail(DecisionMakerLookup {
                    company,
                    department: non_empty(&extra.department),
                }))
            }
            (Resource::LinkedinEmail, Operation::FindEmail) => {
                let linkedin_url = non_empty(&self.linkedin_url).ok_or_else(|| {
                    Error::validation(item_index, "LinkedIn URL must be provided")
                })?;
                Ok(Action::FindLinkedinEmail(LinkedinLookup { linkedin_url }))
            }
            (Resource::EmailVerification, Operation::VerifyEmail) => {
                let email = non_empty(&self.email)
                    .ok_or_else(|| Error::validation(item_index, "Email must be provided"))?;
                Ok(Action::VerifyEmail(EmailVerification { email }))
            }
            (Resource::AccountInfo, Operation::GetInfo) => Ok(Action::GetAccountInfo),
            (resource, operation) => Err(Error::Unsupported {
                item_index,
                resource: resource.to_string(),
                operation: operation.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(params: Value) -> Result<Action> {
        NodeParameters::from_value(params, 0)?.into_action(0)
    }

    fn body(params: Value) -> Value {
        resolve(params).unwrap().body().unwrap().unwrap()
    }

    #[test]
    fn test_missing_identifier_for_lookups() {
        for resource in ["personEmail", "companyEmails", "decisionMaker"] {
            let err = NodeParameters::from_value(
                json!({"resource": resource, "fullName": "Jane Doe", "domain": "  "}),
                6,
            )
            .unwrap()
            .into_action(6)
            .unwrap_err();
            assert!(
                matches!(err, Error::MissingIdentifier { item_index: 6 }),
                "{}: {:?}",
                resource,
                err
            );
        }
    }

    #[test]
    fn test_split_name_takes_precedence() {
        let body = body(json!({
            "resource": "personEmail",
            "operation": "findEmail",
            "fullName": "Johnny D",
            "domain": "acme.com",
            "additionalFields": {"firstName": "John", "lastName": "Doe"}
        }));
        assert_eq!(
            body,
            json!({"first_name": "John", "last_name": "Doe", "domain": "acme.com"})
        );
    }

    #[test]
    fn test_full_name_when_split_incomplete() {
        let body = body(json!({
            "resource": "personEmail",
            "fullName": "John Doe",
            "companyName": "Acme Inc",
            "additionalFields": {"firstName": "John", "lastName": ""}
        }));
        assert_eq!(
            body,
            json!({"full_name": "John Doe", "company_name": "Acme Inc"})
        );
    }

    #[test]
    fn test_person_requires_some_name() {
        let err = resolve(json!({"resource": "personEmail", "domain": "acme.com"})).unwrap_err();
        assert!(matches!(err, Error::Validation { item_index: 0, .. }));
        assert!(err.to_string().contains("full name"));
    }

    #[test]
    fn test_person_optional_fields() {
        let with_extras = body(json!({
            "resource": "personEmail",
            "fullName": "Jane Doe",
            "domain": "acme.com",
            "additionalFields": {"position": "CTO", "department": "engineering"}
        }));
        assert_eq!(with_extras["position"], "CTO");
        assert_eq!(with_extras["department"], "engineering");

        let plain = body(json!({
            "resource": "personEmail",
            "fullName": "Jane Doe",
            "domain": "acme.com",
            "additionalFields": {"position": "", "department": "   "}
        }));
        assert_eq!(plain, json!({"full_name": "Jane Doe", "domain": "acme.com"}));
    }

    #[test]
    fn test_values_sent_as_given() {
        let body = body(json!({
            "resource": "personEmail",
            "fullName": " Jane Doe ",
            "domain": "acme.com ",
            "additionalFields": {"position": "  CTO"}
        }));
        assert_eq!(
            body,
            json!({"full_name": " Jane Doe ", "domain": "acme.com ", "position": "  CTO"})
        );
    }

    #[test]
    fn test_company_limit_only_when_not_default() {
        let with_limit = body(json!({
            "resource": "companyEmails",
            "domain": "acme.com",
            "additionalFields": {"limit": 10, "department": "sales"}
        }));
        assert_eq!(
            with_limit,
            json!({"domain": "acme.com", "department": "sales", "limit": 10})
        );

        let default_limit = body(json!({
            "resource": "companyEmails",
            "domain": "acme.com",
            "additionalFields": {"limit": 50}
        }));
        assert_eq!(default_limit, json!({"domain": "acme.com"}));
    }

    #[test]
    fn test_limit_from_rendered_string() {
        let body = body(json!({
            "resource": "companyEmails",
            "domain": "acme.com",
            "additionalFields": {"limit": "25"}
        }));
        assert_eq!(body["limit"], 25);
    }

    #[test]
    fn test_limit_below_one_rejected() {
        let err = resolve(json!({
            "resource": "companyEmails",
            "domain": "acme.com",
            "additionalFields": {"limit": 0}
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_decision_maker_ignores_limit() {
        let body = body(json!({
            "resource": "decisionMaker",
            "companyName": "Acme Inc",
            "additionalFields": {"department": "it", "limit": 5}
        }));
        assert_eq!(body, json!({"company_name": "Acme Inc", "department": "it"}));
    }

    #[test]
    fn test_linkedin_body() {
        let body = body(json!({
            "resource": "linkedinEmail",
            "operation": "findEmail",
            "linkedinUrl": "https://linkedin.com/in/x"
        }));
        assert_eq!(body, json!({"linkedin_url": "https://linkedin.com/in/x"}));
    }

    #[test]
    fn test_linkedin_and_email_required() {
        assert!(matches!(
            resolve(json!({"resource": "linkedinEmail"})).unwrap_err(),
            Error::Validation { .. }
        ));
        assert!(matches!(
            resolve(json!({"resource": "emailVerification", "email": ""})).unwrap_err(),
            Error::Validation { .. }
        ));
    }

    #[test]
    fn test_verify_email_body() {
        let body = body(json!({"resource": "emailVerification", "email": "jane@acme.com"}));
        assert_eq!(body, json!({"email": "jane@acme.com"}));
    }

    #[test]
    fn test_operation_defaults_per_resource() {
        let action = resolve(json!({"resource": "accountInfo"})).unwrap();
        assert_eq!(action, Action::GetAccountInfo);

        let params = NodeParameters::from_value(json!({"resource": "companyEmails"}), 0).unwrap();
        assert_eq!(params.operation(), Operation::FindEmails);

        let params = NodeParameters::from_value(Value::Null, 0).unwrap();
        assert_eq!(params.resource, Resource::PersonEmail);
    }

    #[test]
    fn test_mismatched_operation_is_unsupported() {
        let err = NodeParameters::from_value(
            json!({"resource": "accountInfo", "operation": "findEmail"}),
            3,
        )
        .unwrap()
        .into_action(3)
        .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
        assert_eq!(err.item_index(), Some(3));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_unknown_resource_is_validation_error() {
        let err = NodeParameters::from_value(json!({"resource": "phoneNumber"}), 2).unwrap_err();
        assert!(matches!(err, Error::Validation { item_index: 2, .. }));
    }
}
