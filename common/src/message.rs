use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Browser-side metadata captured by the contact form at submission time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Members the form sent that are not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed view of one contact-form submission.
///
/// Every attribute is optional because the server requires none, and an
/// absent attribute stays absent when the record is serialized. The store
/// itself keeps the untyped [`Submission`], so this view never decides what
/// gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<ClientInfo>,
    /// ISO-8601 submission time, as reported by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Page the form was submitted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Unknown top-level members, kept so a record round-trips verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageRecord {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            subject: Some(subject.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_client_info(mut self, info: ClientInfo) -> Self {
        self.user_info = Some(info);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A contact submission exactly as it arrived: any JSON object.
///
/// The server stores submissions untouched, whatever the types of their
/// members. [`Submission::record`] gives a typed [`MessageRecord`] view for
/// callers that want one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(pub Map<String, Value>);

impl Submission {
    /// The member `key` when it holds a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// True when `name`, `email` and `message` are all non-blank strings,
    /// the same rule the contact form enforces before it submits.
    pub fn has_required_fields(&self) -> bool {
        ["name", "email", "message"]
            .iter()
            .all(|key| self.text(key).is_some_and(|v| !v.trim().is_empty()))
    }

    /// Typed view. Fails when a known member has an unexpected JSON type.
    pub fn record(&self) -> Result<MessageRecord, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

impl From<Map<String, Value>> for Submission {
    fn from(object: Map<String, Value>) -> Self {
        Self(object)
    }
}

impl From<MessageRecord> for Submission {
    fn from(record: MessageRecord) -> Self {
        match serde_json::to_value(record) {
            Ok(Value::Object(object)) => Self(object),
            _ => Self::default(),
        }
    }
}

impl From<Submission> for Value {
    fn from(submission: Submission) -> Self {
        Value::Object(submission.0)
    }
}
