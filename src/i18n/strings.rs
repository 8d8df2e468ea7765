/// All localized user-facing strings for a language.
///
/// Every label the terminal UI renders comes from one of these tables, so
/// switching the active language re-labels the whole screen at once.
#[derive(Debug, Clone)]
pub struct UiStrings {
    // ==================== Header ====================
    /// Application title shown in the header bar
    pub app_title: &'static str,

    // ==================== Filter Bar and Table Columns ====================
    /// "Status" label (filter field and table column)
    pub status: &'static str,

    /// "Species" label (filter field and table column)
    pub species: &'static str,

    /// "Gender" table column
    pub gender: &'static str,

    /// "Sort by" filter field label
    pub sort_by: &'static str,

    /// "Origin" label (sort option and table column)
    pub origin: &'static str,

    /// "Name" label (sort option and table column)
    pub name: &'static str,

    // ==================== Selector Options ====================
    /// Status option matching every character
    pub all: &'static str,

    /// "Alive" status option
    pub alive: &'static str,

    /// "Dead" status option
    pub dead: &'static str,

    /// "Unknown" status option
    pub unknown: &'static str,

    /// Sort option that keeps arrival order
    pub none: &'static str,

    /// Placeholder shown in the empty species input
    pub enter_species: &'static str,

    // ==================== Status Line ====================
    /// Label shown next to the spinner while another page is fetched
    pub load_more: &'static str,

    /// Label shown while the first page is fetched
    pub loading: &'static str,

    /// Row counter for the status line
    /// Placeholders: {count}
    pub row_count: &'static str,

    /// Message shown when the first page cannot be fetched
    pub error: &'static str,

    // ==================== Footer ====================
    /// English language switch label
    pub english: &'static str,

    /// German language switch label
    pub german: &'static str,

    /// Key hints for moving between fields and committing values
    pub hint_navigation: &'static str,

    /// Key hint for quitting
    pub hint_quit: &'static str,
}

// ==================== English Strings ====================

/// English UI strings (canonical)
pub const ENGLISH_STRINGS: UiStrings = UiStrings {
    // Header
    app_title: "Rick and Morty Characters",

    // Filter bar and table columns
    status: "Status",
    species: "Species",
    gender: "Gender",
    sort_by: "Sort by",
    origin: "Origin",
    name: "Name",

    // Selector options
    all: "All",
    alive: "Alive",
    dead: "Dead",
    unknown: "Unknown",
    none: "None",
    enter_species: "Enter species",

    // Status line
    load_more: "Load more",
    loading: "Loading",
    row_count: "{count} characters loaded",
    error: "An error has occurred. Please try again.",

    // Footer
    english: "English",
    german: "German",
    hint_navigation: "Tab switch field · ←/→ change value · Enter apply",
    hint_quit: "q quit",
};

// ==================== German Strings ====================

/// German UI strings
pub const GERMAN_STRINGS: UiStrings = UiStrings {
    // Header
    app_title: "Rick und Morty Charaktere",

    // Filter bar and table columns
    status: "Status",
    species: "Spezies",
    gender: "Geschlecht",
    sort_by: "Sortieren nach",
    origin: "Herkunft",
    name: "Name",

    // Selector options
    all: "Alle",
    alive: "Lebendig",
    dead: "Tot",
    unknown: "Unbekannt",
    none: "Keine",
    enter_species: "Spezies eingeben",

    // Status line
    load_more: "Mehr laden",
    loading: "Lädt",
    row_count: "{count} Charaktere geladen",
    error: "Ein Fehler ist aufgetreten. Bitte versuchen Sie es erneut.",

    // Footer
    english: "Englisch",
    german: "Deutsch",
    hint_navigation: "Tab Feld wechseln · ←/→ Wert ändern · Enter übernehmen",
    hint_quit: "q beenden",
};
