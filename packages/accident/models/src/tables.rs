//! Static code-to-label tables for every categorical attribute.
//!
//! The tables mirror the coding scheme of the French road-accident
//! (BAAC) files. Codes absent from a table resolve to
//! [`Label::Unlabeled`] rather than failing.

use crate::{Attribute, Label};

/// A raw code as read from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKey<'a> {
    /// Integer-coded columns (`grav`, `sexe`, `atm`, ...).
    Int(i32),
    /// String-coded columns (`typevehicules`).
    Text(&'a str),
}

#[derive(Debug, Clone, Copy)]
enum Entries {
    Int(&'static [(i32, &'static str)]),
    Text(&'static [(&'static str, &'static str)]),
}

/// Fixed mapping from one attribute's codes to display labels.
#[derive(Debug)]
pub struct CodeLabelTable {
    attribute: Attribute,
    entries: Entries,
}

impl CodeLabelTable {
    const fn int(attribute: Attribute, entries: &'static [(i32, &'static str)]) -> Self {
        Self {
            attribute,
            entries: Entries::Int(entries),
        }
    }

    const fn text(attribute: Attribute, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            attribute,
            entries: Entries::Text(entries),
        }
    }

    /// The attribute this table recodes.
    #[must_use]
    pub const fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Number of codes in the table.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self.entries {
            Entries::Int(entries) => entries.len(),
            Entries::Text(entries) => entries.len(),
        }
    }

    /// Whether the table has no codes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves a raw code to its label.
    ///
    /// A missing code, a code absent from the table, or a code of the wrong
    /// kind for this table all resolve to [`Label::Unlabeled`].
    #[must_use]
    pub fn lookup(&self, code: Option<CodeKey<'_>>) -> Label {
        let found = match (&self.entries, code) {
            (Entries::Int(entries), Some(CodeKey::Int(code))) => entries
                .iter()
                .find(|(key, _)| *key == code)
                .map(|(_, label)| *label),
            (Entries::Text(entries), Some(CodeKey::Text(code))) => {
                let code = code.trim();
                entries
                    .iter()
                    .find(|(key, _)| *key == code)
                    .map(|(_, label)| *label)
            }
            _ => None,
        };

        found.map_or(Label::Unlabeled, Label::Known)
    }

    /// All labels in table order.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        match self.entries {
            Entries::Int(entries) => entries.iter().map(|&(_, l)| Label::Known(l)).collect(),
            Entries::Text(entries) => entries.iter().map(|&(_, l)| Label::Known(l)).collect(),
        }
    }

    /// Finds the label whose display text equals `text`.
    ///
    /// [`UNLABELED_TEXT`](crate::UNLABELED_TEXT) resolves to
    /// [`Label::Unlabeled`].
    #[must_use]
    pub fn find_label(&self, text: &str) -> Option<Label> {
        if text == Label::Unlabeled.as_str() {
            return Some(Label::Unlabeled);
        }
        self.labels().into_iter().find(|l| l.as_str() == text)
    }
}

/// `grav`: injury outcome.
pub static SEVERITY: CodeLabelTable = CodeLabelTable::int(
    Attribute::Severity,
    &[
        (1, "Indemne"),
        (2, "Tué"),
        (3, "Blessé hospitalisé"),
        (4, "Blessé léger"),
    ],
);

/// `sexe`: sex of the person involved.
pub static SEX: CodeLabelTable = CodeLabelTable::int(
    Attribute::Sex,
    &[(-1, "Non renseigné"), (1, "Masculin"), (2, "Féminin")],
);

/// `atm`: atmospheric conditions.
pub static ATMOSPHERE: CodeLabelTable = CodeLabelTable::int(
    Attribute::Atmosphere,
    &[
        (-1, "Non renseigné"),
        (1, "Normale"),
        (2, "Pluie légère"),
        (3, "Pluie forte"),
        (4, "Neige - grêle"),
        (5, "Brouillard - fumée"),
        (6, "Vent fort - tempête"),
        (7, "Temps éblouissant"),
        (8, "Temps couvert"),
        (9, "Autre"),
    ],
);

/// `surf`: road surface condition.
pub static SURFACE: CodeLabelTable = CodeLabelTable::int(
    Attribute::Surface,
    &[
        (-1, "Non renseigné"),
        (1, "Normale"),
        (2, "Mouillée"),
        (3, "Flaques"),
        (4, "Inondée"),
        (5, "Enneigée"),
        (6, "Boue"),
        (7, "Verglacée"),
        (8, "Corps gras - huile"),
        (9, "Autre"),
    ],
);

/// `lum`: ambient lighting.
pub static LIGHT: CodeLabelTable = CodeLabelTable::int(
    Attribute::Light,
    &[
        (1, "Plein jour"),
        (2, "Crépuscule ou aube"),
        (3, "Nuit sans éclairage public"),
        (4, "Nuit avec éclairage public non allumé"),
        (5, "Nuit avec éclairage public allumé"),
    ],
);

/// `typevehicules`: vehicle category. Codes 4-6, 8, 9, 11, 12, 18 and 19
/// have been retired since 2006 but still appear in older years.
pub static VEHICLE_TYPE: CodeLabelTable = CodeLabelTable::text(
    Attribute::VehicleType,
    &[
        ("0", "Indéterminable"),
        ("1", "Bicyclette"),
        ("2", "Cyclomoteur <50cm3"),
        ("3", "Voiturette (Quadricycle à moteur carrossé)"),
        ("4", "Référence inutilisée depuis 2006 (scooter immatriculé)"),
        ("5", "Référence inutilisée depuis 2006 (motocyclette)"),
        ("6", "Référence inutilisée depuis 2006 (side-car)"),
        ("7", "VL seul"),
        ("8", "Référence inutilisée depuis 2006 (VL + caravane)"),
        ("9", "Référence inutilisée depuis 2006 (VL + remorque)"),
        ("10", "VU seul 1,5T <= PTAC <= 3,5T avec ou sans remorque"),
        ("11", "Référence inutilisée depuis 2006 (VU (10) + caravane)"),
        ("12", "Référence inutilisée depuis 2006 (VU (10) + remorque)"),
        ("13", "PL seul 3,5T <PTCA <= 7,5T"),
        ("14", "PL seul > 7,5T"),
        ("15", "PL > 3,5T + remorque"),
        ("16", "Tracteur routier seul"),
        ("17", "Tracteur routier + semi-remorque"),
        ("18", "Référence inutilisée depuis 2006 (transport en commun)"),
        ("19", "Référence inutilisée depuis 2006 (tramway)"),
        ("20", "Engin spécial"),
        ("21", "Tracteur agricole"),
        ("30", "Scooter < 50 cm3"),
        ("31", "Motocyclette > 50 cm3 et <= 125 cm3"),
        ("32", "Scooter > 50 cm3 et <= 125 cm3"),
        ("33", "Motocyclette > 125 cm3"),
        ("34", "Scooter > 125 cm3"),
        ("35", "Quad léger <= 50 cm3 (Quadricycle à moteur non carrossé)"),
        ("36", "Quad lourd > 50 cm3 (Quadricycle à moteur non carrossé)"),
        ("37", "Autobus"),
        ("38", "Autocar"),
        ("39", "Train"),
        ("40", "Tramway"),
        ("41", "3RM <= 50 cm3"),
        ("42", "3RM > 50 cm3 <= 125 cm3"),
        ("43", "3RM > 125 cm3"),
        ("50", "EDP à moteur"),
        ("60", "EDP sans moteur"),
        ("80", "VAE"),
        ("99", "Autre véhicule"),
    ],
);

/// `trajet`: purpose of the trip.
pub static TRIP_PURPOSE: CodeLabelTable = CodeLabelTable::int(
    Attribute::TripPurpose,
    &[
        (0, "Non renseigné"),
        (1, "Domicile - Travail"),
        (2, "Domicile - École"),
        (3, "Courses - Achats"),
        (4, "Utilisation professionnelle"),
        (5, "Promenade - Loisirs"),
        (9, "Autre"),
    ],
);
