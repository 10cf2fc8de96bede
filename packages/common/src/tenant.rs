use std::fmt;

/// One of the fixed set of participating universities whose content tables
/// are migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tenant {
    Nyu,
    Usc,
    Columbia,
    Cornell,
    Miuhub,
}

impl Tenant {
    /// All tenants, in migration order.
    pub const ALL: [Tenant; 5] = [
        Tenant::Nyu,
        Tenant::Usc,
        Tenant::Columbia,
        Tenant::Cornell,
        Tenant::Miuhub,
    ];

    /// Short code used in table names and storage paths.
    pub fn code(&self) -> &'static str {
        match self {
            Tenant::Nyu => "nyu",
            Tenant::Usc => "usc",
            Tenant::Columbia => "columbia",
            Tenant::Cornell => "cornell",
            Tenant::Miuhub => "miuhub",
        }
    }
}

impl fmt::Display for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
