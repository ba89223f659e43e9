use std::fmt;
use std::str::FromStr;

/// Role-gated test endpoints under `/api/test/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    All,
    Customer,
    Agent,
    Admin,
}

impl Endpoint {
    /// Button order on the form
    pub const ALL: [Endpoint; 4] = [
        Endpoint::All,
        Endpoint::Customer,
        Endpoint::Agent,
        Endpoint::Admin,
    ];

    /// Path segment after `/api/test/`
    pub fn segment(&self) -> &'static str {
        match self {
            Endpoint::All => "all",
            Endpoint::Customer => "customer",
            Endpoint::Agent => "agent",
            Endpoint::Admin => "admin",
        }
    }

    pub fn path(&self) -> String {
        format!("/api/test/{}", self.segment())
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::All => "Public Content",
            Endpoint::Customer => "Customer Content",
            Endpoint::Agent => "Agent Content",
            Endpoint::Admin => "Admin Content",
        }
    }

    pub fn denied_message(&self) -> String {
        format!("Access denied to {} endpoint", self.segment())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "public" => Ok(Endpoint::All),
            "customer" => Ok(Endpoint::Customer),
            "agent" => Ok(Endpoint::Agent),
            "admin" => Ok(Endpoint::Admin),
            other => Err(format!(
                "unknown endpoint '{}' (expected all, customer, agent or admin)",
                other
            )),
        }
    }
}
