//! Team dashboard over created requests: filtering, counters and status
//! transitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::catalog::User;
use crate::error::FormError;
use crate::spec::cell;

pub const ALL_BRANDS: &str = "TODAS";
pub const ALL_STATUSES: &str = "TODOS";

pub const STATUS_REQUESTED: &str = "Solicitado";
pub const STATUS_IN_REVIEW: &str = "En Revisión";
pub const STATUS_IN_DESIGN: &str = "En Diseño";
pub const STATUS_PUBLISHED: &str = "Publicado";

/// One row of `getSolicitudesEquipo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    #[serde(rename = "ID_Solicitud", deserialize_with = "cell::string")]
    pub id: String,
    #[serde(rename = "Numero_Solicitud", default, deserialize_with = "cell::string")]
    pub number: String,
    #[serde(rename = "Fecha_Solicitud", default, deserialize_with = "cell::string")]
    pub requested_at: String,
    #[serde(rename = "Nombre_Usuario", default, deserialize_with = "cell::string")]
    pub user_name: String,
    #[serde(rename = "Nombre_Marca", default, deserialize_with = "cell::string")]
    pub brand_name: String,
    #[serde(rename = "Estado_Actual", default, deserialize_with = "cell::string")]
    pub status: String,
    #[serde(rename = "Presupuesto", default, deserialize_with = "cell::string")]
    pub budget: String,
    #[serde(rename = "Texto_Anuncio", default, deserialize_with = "cell::string")]
    pub ad_text: String,
    #[serde(rename = "Comentarios", default, deserialize_with = "cell::string")]
    pub comments: String,
    #[serde(
        rename = "Activa",
        default,
        deserialize_with = "cell::flag",
        serialize_with = "cell::serialize_flag"
    )]
    pub active: bool,
}

impl RequestSummary {
    pub fn requested_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(self.requested_at.trim(), &Rfc3339).ok()
    }

    /// `dd/mm/yyyy`, or the raw cell when it is not a timestamp.
    pub fn requested_on(&self) -> String {
        match self.requested_at() {
            Some(at) => format!(
                "{:02}/{:02}/{}",
                at.day(),
                u8::from(at.month()),
                at.year()
            ),
            None => self.requested_at.clone(),
        }
    }
}

/// One row of `getEstados`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "ID_Estado", default, deserialize_with = "cell::string")]
    pub id: String,
    #[serde(rename = "Nombre_Estado", deserialize_with = "cell::string")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub brand: String,
    pub status: String,
    /// Case-insensitive substring of the request number; empty matches all.
    pub search: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            brand: ALL_BRANDS.to_string(),
            status: ALL_STATUSES.to_string(),
            search: String::new(),
        }
    }
}

impl Filters {
    pub fn matches(&self, request: &RequestSummary) -> bool {
        if !request.active {
            return false;
        }
        if self.brand != ALL_BRANDS && request.brand_name != self.brand {
            return false;
        }
        if self.status != ALL_STATUSES && request.status != self.status {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || request.number.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, requests: &'a [RequestSummary]) -> Vec<&'a RequestSummary> {
        requests
            .iter()
            .filter(|request| self.matches(request))
            .collect()
    }
}

/// Counters over active requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
}

impl RequestStats {
    pub fn collect(requests: &[RequestSummary]) -> Self {
        let mut stats = RequestStats::default();
        for request in requests.iter().filter(|request| request.active) {
            stats.total += 1;
            *stats.by_status.entry(request.status.clone()).or_default() += 1;
        }
        stats
    }

    pub fn count(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or_default()
    }

    pub fn requested(&self) -> usize {
        self.count(STATUS_REQUESTED)
    }

    pub fn in_progress(&self) -> usize {
        self.count(STATUS_IN_REVIEW) + self.count(STATUS_IN_DESIGN)
    }

    pub fn published(&self) -> usize {
        self.count(STATUS_PUBLISHED)
    }
}

/// `TODAS` followed by each brand in first-seen order.
pub fn brand_options(requests: &[RequestSummary]) -> Vec<String> {
    let mut options = vec![ALL_BRANDS.to_string()];
    for request in requests {
        if !options.contains(&request.brand_name) {
            options.push(request.brand_name.clone());
        }
    }
    options
}

pub fn status_options(statuses: &[Status]) -> Vec<String> {
    std::iter::once(ALL_STATUSES.to_string())
        .chain(statuses.iter().map(|status| status.name.clone()))
        .collect()
}

/// Payload of `actualizarEstado`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub id_solicitud: String,
    pub nuevo_estado: String,
    pub usuario: String,
    pub comentario: String,
}

impl StatusChange {
    pub fn new(request: &RequestSummary, new_status: &str, user: &User) -> Result<Self, FormError> {
        if request.status == new_status {
            return Err(FormError::UnchangedStatus(new_status.to_string()));
        }
        Ok(Self {
            id_solicitud: request.id.clone(),
            nuevo_estado: new_status.to_string(),
            usuario: user.full_name.clone(),
            comentario: format!("Cambio de estado de {} a {}", request.status, new_status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn requests() -> Vec<RequestSummary> {
        serde_json::from_value(json!([
            { "ID_Solicitud": 1, "Numero_Solicitud": "SOL-2025-001", "Nombre_Marca": "Ford",
              "Estado_Actual": "Solicitado", "Activa": "SI", "Fecha_Solicitud": "2025-03-04T10:00:00.000Z" },
            { "ID_Solicitud": 2, "Numero_Solicitud": "SOL-2025-002", "Nombre_Marca": "Kia",
              "Estado_Actual": "En Revisión", "Activa": "SI" },
            { "ID_Solicitud": 3, "Numero_Solicitud": "SOL-2025-003", "Nombre_Marca": "Ford",
              "Estado_Actual": "En Diseño", "Activa": "SI", "Presupuesto": 50000 },
            { "ID_Solicitud": 4, "Numero_Solicitud": "SOL-2025-004", "Nombre_Marca": "Mazda",
              "Estado_Actual": "Publicado", "Activa": "NO" }
        ]))
        .expect("rows should decode")
    }

    #[test]
    fn filters_skip_inactive_rows() {
        let rows = requests();
        assert_eq!(Filters::default().apply(&rows).len(), 3);

        let ford = Filters {
            brand: "Ford".into(),
            ..Filters::default()
        };
        assert_eq!(ford.apply(&rows).len(), 2);

        let search = Filters {
            search: "sol-2025-00".into(),
            status: "En Diseño".into(),
            ..Filters::default()
        };
        let found = search.apply(&rows);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].budget, "50000");
    }

    #[test]
    fn stats_count_active_rows_only() {
        let stats = RequestStats::collect(&requests());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.requested(), 1);
        assert_eq!(stats.in_progress(), 2);
        assert_eq!(stats.published(), 0);
    }

    #[test]
    fn brand_options_keep_first_seen_order() {
        assert_eq!(brand_options(&requests()), ["TODAS", "Ford", "Kia", "Mazda"]);
    }

    #[test]
    fn dates_render_day_first() {
        let rows = requests();
        assert_eq!(rows[0].requested_on(), "04/03/2025");
        assert_eq!(rows[1].requested_on(), "");
    }

    #[test]
    fn status_change_describes_transition() {
        let rows = requests();
        let user = User::new("U-1", "Ana Gómez");
        let change = StatusChange::new(&rows[0], "Aprobado", &user).unwrap();
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({
                "idSolicitud": "1",
                "nuevoEstado": "Aprobado",
                "usuario": "Ana Gómez",
                "comentario": "Cambio de estado de Solicitado a Aprobado"
            })
        );
        assert_eq!(
            StatusChange::new(&rows[0], "Solicitado", &user),
            Err(FormError::UnchangedStatus("Solicitado".into()))
        );
    }
}
