use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ComponentConfig, ComponentKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    pub required: bool,
    pub options: Vec<String>,
}

impl Default for FormField {
    fn default() -> Self {
        Self {
            name: String::new(),
            field_type: "text".into(),
            label: String::new(),
            required: false,
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStyle {
    #[default]
    Modern,
    Classic,
    Minimal,
}

/// Lead-capture form. Submissions are tagged with `projectId`/`projectName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormConfig {
    pub title: String,
    pub fields: Vec<FormField>,
    pub submit_text: String,
    pub success_message: String,
    pub style: FormStyle,
    pub project_id: String,
    pub project_name: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        let field = |name: &str, field_type: &str, label: &str, required, options: &[&str]| FormField {
            name: name.into(),
            field_type: field_type.into(),
            label: label.into(),
            required,
            options: options.iter().map(|o| o.to_string()).collect(),
        };
        Self {
            title: "Get More Information".into(),
            fields: vec![
                field("name", "text", "Full Name", true, &[]),
                field("email", "email", "Email Address", true, &[]),
                field("phone", "tel", "Phone Number", true, &[]),
                field("property_type", "select", "Property Interest", false, &["Apartment", "House", "Commercial"]),
                field("budget", "select", "Budget Range", false, &["< 1M", "1M - 3M", "3M - 5M", "> 5M"]),
                field("message", "textarea", "Additional Message", false, &[]),
            ],
            submit_text: "Submit Inquiry".into(),
            success_message: "Thank you! We will contact you soon.".into(),
            style: FormStyle::Modern,
            project_id: "general_inquiries".into(),
            project_name: "Landing Page Inquiry".into(),
        }
    }
}

impl ComponentConfig for FormConfig {
    const KIND: ComponentKind = ComponentKind::Form;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    pub name: String,
    pub title: String,
    pub photo: String,
    pub phone: String,
    pub email: String,
    pub whatsapp: String,
    pub description: String,
    pub experience: String,
    pub specialization: String,
    pub office: String,
    pub schedule: String,
    pub rating: f64,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            name: "Sales Agent".into(),
            title: "Property Consultant".into(),
            photo: "/sales-avatar-fallback.jpg".into(),
            phone: "+62 812-0000-0000".into(),
            email: "sales@paramountland.co.id".into(),
            whatsapp: "+62 812-0000-0000".into(),
            description: "Professional property consultant ready to help you find your dream property."
                .into(),
            experience: "3+ tahun".into(),
            specialization: "Residential Properties".into(),
            office: "Paramount Land Office".into(),
            schedule: "Sen-Jum 09:00-17:00".into(),
            rating: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentLayout {
    #[default]
    Card,
    Banner,
    Minimal,
}

/// Contact card for a single sales agent.
///
/// Older pages stored a list under `agents`; see [`AgentContactConfig::migrate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentContactConfig {
    pub title: String,
    pub subtitle: String,
    pub agent: Agent,
    pub layout: AgentLayout,
    pub show_photo: bool,
    pub show_description: bool,
    pub show_experience: bool,
    pub show_specialization: bool,
    pub show_office: bool,
    pub show_schedule: bool,
    pub show_rating: bool,
    pub background_color: String,
    pub primary_color: String,
    pub cta_text: String,
    pub cta_whatsapp_text: String,
    pub cta_email_text: String,
}

impl Default for AgentContactConfig {
    fn default() -> Self {
        Self {
            title: "Hubungi Sales Terpercaya Kami".into(),
            subtitle: "Dapatkan konsultasi expert dari sales in-house terbaik".into(),
            agent: Agent::default(),
            layout: AgentLayout::Card,
            show_photo: true,
            show_description: true,
            show_experience: true,
            show_specialization: true,
            show_office: true,
            show_schedule: true,
            show_rating: true,
            background_color: "#ffffff".into(),
            primary_color: "#3b82f6".into(),
            cta_text: "Hubungi Sekarang".into(),
            cta_whatsapp_text: "WhatsApp".into(),
            cta_email_text: "Email".into(),
        }
    }
}

impl ComponentConfig for AgentContactConfig {
    const KIND: ComponentKind = ComponentKind::AgentContact;

    /// Converts `agents: [..]` into `agent`, keeping only the first entry.
    /// `position` becomes `title`. Configs that already carry an `agent`
    /// object are left alone.
    fn migrate(raw: &Value) -> Option<Value> {
        let config = raw.as_object()?;
        if config.get("agent").is_some_and(Value::is_object) {
            return None;
        }
        let legacy = config.get("agents")?.as_array()?.first()?.as_object()?;

        let mut agent: Map<String, Value> = legacy
            .iter()
            .filter(|(key, _)| key.as_str() != "position")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let title = [legacy.get("position"), legacy.get("title")]
            .into_iter()
            .flatten()
            .find(|v| v.as_str().is_some_and(|s| !s.is_empty()))
            .cloned()
            .unwrap_or_else(|| Value::from("Property Consultant"));
        agent.insert("title".into(), title);

        let mut migrated = config.clone();
        migrated.remove("agents");
        migrated.insert("agent".into(), Value::Object(agent));
        Some(Value::Object(migrated))
    }
}
