//! Static node metadata: resources, operations, properties.
//!
//! Hosts use this to render the node's form and to label executions.

use serde::Serialize;
use serde_json::{json, Value};

use super::action::{Operation, Resource};
use super::parameters::DEFAULT_LIMIT;
use crate::config::DEFAULT_BASE_URL;
use crate::credentials::CREDENTIAL_NAME;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub group: Vec<&'static str>,
    pub version: u32,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub credentials: Vec<CredentialDescription>,
    pub request_defaults: RequestDefaults,
    pub resources: Vec<ResourceDescription>,
    pub properties: Vec<PropertyDescription>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialDescription {
    pub name: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDefaults {
    #[serde(rename = "baseURL")]
    pub base_url: &'static str,
    pub headers: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDescription {
    pub name: &'static str,
    pub value: Resource,
    pub description: &'static str,
    pub operations: Vec<OperationDescription>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationDescription {
    pub name: &'static str,
    pub value: Operation,
    pub description: &'static str,
    pub action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    pub default: Value,
    pub description: &'static str,
    /// Resources this property is shown for
    pub show_for: Vec<Resource>,
}

fn resource_description(resource: Resource) -> ResourceDescription {
    let (name, description, op_name, op_description, action) = match resource {
        Resource::AccountInfo => (
            "Account Info",
            "Get account details and credits",
            "Get Info",
            "Get account details and remaining credits",
            "Get account information",
        ),
        Resource::CompanyEmails => (
            "Company Email",
            "Find all emails at a company",
            "Find Emails",
            "Find all emails at a company",
            "Find company emails",
        ),
        Resource::DecisionMaker => (
            "Decision Maker",
            "Find decision maker's email",
            "Find Email",
            "Find decision maker's email",
            "Find decision maker email",
        ),
        Resource::EmailVerification => (
            "Email Verification",
            "Verify if an email is valid",
            "Verify Email",
            "Verify if an email address is valid",
            "Verify email address",
        ),
        Resource::LinkedinEmail => (
            "LinkedIn Email",
            "Find email by LinkedIn URL",
            "Find Email",
            "Find email by LinkedIn profile URL",
            "Find email by LinkedIn URL",
        ),
        Resource::PersonEmail => (
            "Person Email",
            "Find a person's email address",
            "Find Email",
            "Find a person's email by name and company",
            "Find a person's email",
        ),
    };

    ResourceDescription {
        name,
        value: resource,
        description,
        operations: vec![OperationDescription {
            name: op_name,
            value: resource.default_operation(),
            description: op_description,
            action,
        }],
    }
}

fn string_property(
    display_name: &'static str,
    name: &'static str,
    required: bool,
    description: &'static str,
    show_for: Vec<Resource>,
) -> PropertyDescription {
    PropertyDescription {
        display_name,
        name,
        kind: "string",
        required,
        default: json!(""),
        description,
        show_for,
    }
}

fn properties() -> Vec<PropertyDescription> {
    let lookups = vec![
        Resource::PersonEmail,
        Resource::CompanyEmails,
        Resource::DecisionMaker,
    ];

    vec![
        string_property(
            "Full Name",
            "fullName",
            true,
            "The full name of the person (e.g., \"John Doe\")",
            vec![Resource::PersonEmail],
        ),
        string_property(
            "Domain",
            "domain",
            false,
            "Company domain (e.g., \"example.com\"). Use either domain or company name.",
            lookups.clone(),
        ),
        string_property(
            "Company Name",
            "companyName",
            false,
            "Company name (e.g., \"Apple Inc\"). Use either domain or company name.",
            lookups.clone(),
        ),
        string_property(
            "LinkedIn URL",
            "linkedinUrl",
            true,
            "LinkedIn profile URL",
            vec![Resource::LinkedinEmail],
        ),
        string_property(
            "Email",
            "email",
            true,
            "Email address to verify",
            vec![Resource::EmailVerification],
        ),
        PropertyDescription {
            display_name: "Additional Fields",
            name: "additionalFields",
            kind: "collection",
            required: false,
            default: json!({
                "firstName": "",
                "lastName": "",
                "position": "",
                "department": "",
                "limit": DEFAULT_LIMIT,
            }),
            description: "Person: firstName, lastName, position, department. \
                Company and decision maker: department, limit (min 1).",
            show_for: lookups,
        },
    ]
}

/// Full node description.
pub fn describe() -> NodeDescription {
    NodeDescription {
        display_name: "Anymailfinder",
        name: super::NODE_TYPE,
        group: vec!["transform"],
        version: 1,
        subtitle: "={{$parameter[\"operation\"] + \": \" + $parameter[\"resource\"]}}",
        description: "Find and verify email addresses using Anymailfinder API",
        credentials: vec![CredentialDescription {
            name: CREDENTIAL_NAME,
            required: true,
        }],
        request_defaults: RequestDefaults {
            base_url: DEFAULT_BASE_URL,
            headers: json!({
                "Accept": "application/json",
                "Content-Type": "application/json",
            }),
        },
        resources: Resource::ALL.into_iter().map(resource_description).collect(),
        properties: properties(),
    }
}
