//! Appointment record data structure.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// One observation of the target service row.
///
/// Serialized field names match the keys used by the state files written
/// by earlier deployments of this watcher, so an existing `last_data.json`
/// remains readable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentRecord {
    /// Service name as printed in the first cell
    #[serde(rename = "servicio")]
    pub service_name: String,

    /// Date the service last opened appointments
    #[serde(rename = "ultima_apertura")]
    pub last_opened_date: String,

    /// Announced next opening (may be a "to be confirmed" placeholder)
    #[serde(rename = "proxima_apertura")]
    pub next_opening: String,

    /// Relative path of the appointment-request page
    #[serde(rename = "solicitud")]
    pub request_path: String,
}

impl AppointmentRecord {
    /// Whether all four fields are present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.service_name.trim().is_empty()
            && !self.last_opened_date.trim().is_empty()
            && !self.next_opening.trim().is_empty()
            && !self.request_path.trim().is_empty()
    }

    /// Resolve the relative request path against the site base URL.
    pub fn request_url(&self, base_url: &str) -> Result<Url> {
        let base = Url::parse(base_url)?;
        Ok(base.join(&self.request_path)?)
    }
}

impl fmt::Display for AppointmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "servicio: {}\nultima apertura: {}\nproxima apertura: {}\nsolicitud: {}",
            self.service_name, self.last_opened_date, self.next_opening, self.request_path
        )
    }
}
