use serde::{Deserialize, Serialize};

use crate::spec::cell;

/// Vehicle marque a request is raised for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "ID_Marca", deserialize_with = "cell::string")]
    pub id: String,
    #[serde(rename = "Nombre_Marca", deserialize_with = "cell::string")]
    pub name: String,
    #[serde(rename = "Tipo_Materiales", default, deserialize_with = "cell::string")]
    pub materials_type: String,
}

impl Brand {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        materials_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            materials_type: materials_type.into(),
        }
    }

    /// Matches either the identifier or the display name, ignoring case.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key) || self.name.eq_ignore_ascii_case(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "Nombre_Modelo", deserialize_with = "cell::string")]
    pub name: String,
}

/// User record returned by the identity lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID_Usuario", deserialize_with = "cell::string")]
    pub id: String,
    #[serde(rename = "Nombre_Completo", deserialize_with = "cell::string")]
    pub full_name: String,
    #[serde(rename = "Email", default, deserialize_with = "cell::string")]
    pub email: String,
    #[serde(rename = "Rol", default, deserialize_with = "cell::string")]
    pub role: String,
    #[serde(rename = "Permisos", default, deserialize_with = "permissions")]
    pub permissions: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: String::new(),
            role: String::new(),
            permissions: Vec::new(),
        }
    }

    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or_default()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|granted| granted == permission)
    }
}

/// Permissions arrive either as a JSON list or as one comma-separated cell.
fn permissions<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    let list: Vec<String> = match value {
        Value::Array(items) => items.into_iter().filter_map(cell::text_of).collect(),
        other => cell::text_of(other)
            .map(|raw| raw.split(',').map(|item| item.trim().to_string()).collect())
            .unwrap_or_default(),
    };
    Ok(list.into_iter().filter(|item| !item.is_empty()).collect())
}
