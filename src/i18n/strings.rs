/// Fixed user-facing strings that do not come from the content store
///
/// Editable labels (portfolio label, section headings, ...) live in the
/// `portfolio_content` row. These are the fallbacks and status messages the
/// server itself produces.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Labels ====================
    /// Default brand label when the profile row has none
    pub portfolio_label: &'static str,

    /// Heading of the documentation listing
    pub docs_heading: &'static str,

    /// Text of a freshly added quick stat
    pub new_stat: &'static str,

    // ==================== Failure Messages ====================
    /// Generic failure when a page cannot be loaded
    pub load_page_failed: &'static str,

    /// Generic failure when sections cannot be loaded
    pub load_sections_failed: &'static str,

    /// Generic failure when an admin save does not go through
    pub save_failed: &'static str,

    /// Shown when a request needs a signed-in admin
    pub sign_in_required: &'static str,

    /// Shown when sign-in credentials are rejected
    pub sign_in_failed: &'static str,
}

impl LanguageStrings {
    /// Strings for a language code; unknown codes fall back to English.
    pub fn for_code(code: &str) -> &'static LanguageStrings {
        match code {
            "hy" => &ARMENIAN_STRINGS,
            "es" => &SPANISH_STRINGS,
            "ru" => &RUSSIAN_STRINGS,
            "fr" => &FRENCH_STRINGS,
            "de" => &GERMAN_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    portfolio_label: "Portfolio",
    docs_heading: "Welcome to Documentation",
    new_stat: "New Stat",

    load_page_failed: "Failed to load page",
    load_sections_failed: "Failed to load sections",
    save_failed: "Failed to save changes",
    sign_in_required: "Sign in required",
    sign_in_failed: "Invalid email or password",
};

// ==================== Armenian Strings ====================

pub const ARMENIAN_STRINGS: LanguageStrings = LanguageStrings {
    portfolio_label: "Պորտֆել",
    docs_heading: "Բարի գալուստ փաստաթղթեր",
    new_stat: "Նոր վիճակագրություն",

    load_page_failed: "Չհաջողվեց բեռնել էջը",
    load_sections_failed: "Չհաջողվեց բեռնել բաժինները",
    save_failed: "Չհաջողվեց պահպանել փոփոխությունները",
    sign_in_required: "Պահանջվում է մուտք",
    sign_in_failed: "Սխալ էլ. փոստ կամ գաղտնաբառ",
};

// ==================== Spanish Strings ====================

pub const SPANISH_STRINGS: LanguageStrings = LanguageStrings {
    portfolio_label: "Portafolio",
    docs_heading: "Bienvenido a la documentación",
    new_stat: "Nueva estadística",

    load_page_failed: "No se pudo cargar la página",
    load_sections_failed: "No se pudieron cargar las secciones",
    save_failed: "No se pudieron guardar los cambios",
    sign_in_required: "Es necesario iniciar sesión",
    sign_in_failed: "Correo electrónico o contraseña no válidos",
};

// ==================== Russian Strings ====================

pub const RUSSIAN_STRINGS: LanguageStrings = LanguageStrings {
    portfolio_label: "Портфолио",
    docs_heading: "Добро пожаловать в документацию",
    new_stat: "Новая статистика",

    load_page_failed: "Не удалось загрузить страницу",
    load_sections_failed: "Не удалось загрузить разделы",
    save_failed: "Не удалось сохранить изменения",
    sign_in_required: "Требуется вход",
    sign_in_failed: "Неверный адрес электронной почты или пароль",
};

// ==================== French Strings ====================

pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings {
    portfolio_label: "Portfolio",
    docs_heading: "Bienvenue dans la documentation",
    new_stat: "Nouvelle statistique",

    load_page_failed: "Impossible de charger la page",
    load_sections_failed: "Impossible de charger les sections",
    save_failed: "Impossible d'enregistrer les modifications",
    sign_in_required: "Connexion requise",
    sign_in_failed: "E-mail ou mot de passe invalide",
};

// ==================== German Strings ====================

pub const GERMAN_STRINGS: LanguageStrings = LanguageStrings {
    portfolio_label: "Portfolio",
    docs_heading: "Willkommen zur Dokumentation",
    new_stat: "Neue Statistik",

    load_page_failed: "Seite konnte nicht geladen werden",
    load_sections_failed: "Abschnitte konnten nicht geladen werden",
    save_failed: "Änderungen konnten nicht gespeichert werden",
    sign_in_required: "Anmeldung erforderlich",
    sign_in_failed: "Ungültige E-Mail-Adresse oder ungültiges Passwort",
};
