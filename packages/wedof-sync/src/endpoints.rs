//! Catalog of Wedof list endpoints mirrored by the sync.

/// A paginated list endpoint: logical name and API path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub name: &'static str,
    pub path: &'static str,
}

impl Endpoint {
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self { name, path }
    }
}

pub const USERS: Endpoint = Endpoint::new("users", "/api/users");
pub const TRAININGS: Endpoint = Endpoint::new("trainings", "/api/trainings");
pub const SESSIONS: Endpoint = Endpoint::new("sessions", "/api/sessions");
pub const ATTENDEES: Endpoint = Endpoint::new("attendees", "/api/attendees");
pub const REGISTRATION_FOLDERS: Endpoint =
    Endpoint::new("registration_folders", "/api/registrationFolders");
pub const CERTIFICATION_FOLDERS: Endpoint =
    Endpoint::new("certification_folders", "/api/certificationFolders");
pub const ORGANISMS: Endpoint = Endpoint::new("organisms", "/api/organisms");
pub const ACTIVITIES: Endpoint = Endpoint::new("activities", "/api/activities");
pub const EVALUATIONS: Endpoint = Endpoint::new("evaluations", "/api/evaluations");
pub const INVOICES: Endpoint = Endpoint::new("invoices", "/api/invoices");
pub const PAYMENTS: Endpoint = Endpoint::new("payments", "/api/payments");

/// Every endpoint fetched by a full sync, in fetch order.
pub const WEDOF_ENDPOINTS: [Endpoint; 11] = [
    USERS,
    TRAININGS,
    SESSIONS,
    ATTENDEES,
    REGISTRATION_FOLDERS,
    CERTIFICATION_FOLDERS,
    ORGANISMS,
    ACTIVITIES,
    EVALUATIONS,
    INVOICES,
    PAYMENTS,
];
