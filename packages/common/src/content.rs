use crate::tenant::Tenant;

/// Content table families covered by the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Notices,
    LifeEvents,
    BoardPosts,
    Circles,
}

impl ContentType {
    /// All content types, in migration order.
    pub const ALL: [ContentType; 4] = [
        ContentType::Notices,
        ContentType::LifeEvents,
        ContentType::BoardPosts,
        ContentType::Circles,
    ];

    /// Table-name suffix; the full table is `{tenant}_{suffix}`.
    pub fn table_suffix(&self) -> &'static str {
        match self {
            ContentType::Notices => "notices",
            ContentType::LifeEvents => "life_events",
            ContentType::BoardPosts => "board_posts",
            ContentType::Circles => "circles",
        }
    }

    /// Canonical filename prefix. Life events share the `notice` prefix.
    pub fn filename_prefix(&self) -> &'static str {
        match self {
            ContentType::Notices | ContentType::LifeEvents => "notice",
            ContentType::BoardPosts => "board",
            ContentType::Circles => "circle",
        }
    }

    /// Whether a `{tenant}_{suffix}` table exists. miuhub never had notice
    /// or life-event tables.
    pub fn exists_for(&self, tenant: Tenant) -> bool {
        !(tenant == Tenant::Miuhub
            && matches!(self, ContentType::Notices | ContentType::LifeEvents))
    }

    pub fn table_name(&self, tenant: Tenant) -> String {
        format!("{}_{}", tenant.code(), self.table_suffix())
    }
}
