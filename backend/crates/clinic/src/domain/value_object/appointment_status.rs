use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Appointment lifecycle. New appointments start as `Pending`.
///
/// Any status may be set from any other; the clinic corrects mistakes by
/// setting the status again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("done")]
    Done,
    #[display("cancelled")]
    Cancelled,
}

impl AppointmentStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Done => "done",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(AppointmentStatus::Pending),
            "done" => Some(AppointmentStatus::Done),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Pending);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(AppointmentStatus::from_code("done"), Some(AppointmentStatus::Done));
        assert_eq!(AppointmentStatus::from_code("canceled"), None);
    }
}
