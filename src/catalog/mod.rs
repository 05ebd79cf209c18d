//! Country catalog
//!
//! Fixed table mapping the short display keys used by clients to the long
//! canonical names sent to the model. Built once, never mutated.

#[cfg(test)]
mod tests;

use crate::error::{PulseError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// (short key, long canonical name), in catalog order.
const COUNTRIES: &[(&str, &str)] = &[
    // Americas (24)
    ("USA", "United States of America"),
    ("Canada", "Canada"),
    ("Mexico", "Mexico"),
    ("Guatemala", "Guatemala"),
    ("Honduras", "Honduras"),
    ("El Salvador", "El Salvador"),
    ("Nicaragua", "Nicaragua"),
    ("Costa Rica", "Costa Rica"),
    ("Panama", "Panama"),
    ("Cuba", "Cuba"),
    ("Haiti", "Haiti"),
    ("Dominican Republic", "Dominican Republic"),
    ("Jamaica", "Jamaica"),
    ("Trinidad and Tobago", "Trinidad and Tobago"),
    ("Colombia", "Colombia"),
    ("Venezuela", "Venezuela"),
    ("Ecuador", "Ecuador"),
    ("Peru", "Peru"),
    ("Bolivia", "Bolivia"),
    ("Paraguay", "Paraguay"),
    ("Uruguay", "Uruguay"),
    ("Argentina", "Argentina"),
    ("Chile", "Chile"),
    ("Brazil", "Brazil"),

    // Europe (24)
    ("United Kingdom", "United Kingdom"),
    ("Ireland", "Ireland"),
    ("France", "France"),
    ("Germany", "Germany"),
    ("Italy", "Italy"),
    ("Spain", "Spain"),
    ("Portugal", "Portugal"),
    ("Netherlands", "Netherlands"),
    ("Belgium", "Belgium"),
    ("Switzerland", "Switzerland"),
    ("Austria", "Austria"),
    ("Denmark", "Denmark"),
    ("Norway", "Norway"),
    ("Sweden", "Sweden"),
    ("Finland", "Finland"),
    ("Iceland", "Iceland"),
    ("Poland", "Poland"),
    ("Czech Republic", "Czechia"),
    ("Hungary", "Hungary"),
    ("Romania", "Romania"),
    ("Greece", "Greece"),
    ("Ukraine", "Ukraine"),
    ("Russia", "Russian Federation"),
    ("Serbia", "Serbia"),

    // Middle East & North Africa (14)
    ("Turkey", "Turkey"),
    ("Israel", "Israel"),
    ("Jordan", "Jordan"),
    ("Lebanon", "Lebanon"),
    ("Saudi Arabia", "Saudi Arabia"),
    ("United Arab Emirates", "United Arab Emirates"),
    ("Qatar", "Qatar"),
    ("Kuwait", "Kuwait"),
    ("Oman", "Oman"),
    ("Iraq", "Iraq"),
    ("Syria", "Syrian Arab Republic"),
    ("Iran", "Iran"),
    ("Egypt", "Egypt"),
    ("Morocco", "Morocco"),

    // Sub-Saharan Africa (18)
    ("South Africa", "South Africa"),
    ("Nigeria", "Nigeria"),
    ("Ghana", "Ghana"),
    ("Kenya", "Kenya"),
    ("Ethiopia", "Ethiopia"),
    ("Tanzania", "Tanzania, United Republic of"),
    ("Uganda", "Uganda"),
    ("Rwanda", "Rwanda"),
    ("Senegal", "Senegal"),
    ("Ivory Coast", "Côte d’Ivoire"),
    ("Cameroon", "Cameroon"),
    ("Angola", "Angola"),
    ("Zimbabwe", "Zimbabwe"),
    ("Zambia", "Zambia"),
    ("Mozambique", "Mozambique"),
    ("Botswana", "Botswana"),
    ("Namibia", "Namibia"),
    ("DR Congo", "Democratic Republic of the Congo"),

    // Asia (18)
    ("India", "India"),
    ("Pakistan", "Pakistan"),
    ("Bangladesh", "Bangladesh"),
    ("Sri Lanka", "Sri Lanka"),
    ("Nepal", "Nepal"),
    ("China", "China"),
    ("Mongolia", "Mongolia"),
    ("Japan", "Japan"),
    ("South Korea", "Korea, Republic of"),
    ("North Korea", "Korea, Democratic People's Republic of"),
    ("Taiwan", "Taiwan"),
    ("Malaysia", "Malaysia"),
    ("Singapore", "Singapore"),
    ("Indonesia", "Indonesia"),
    ("Philippines", "Philippines"),
    ("Thailand", "Thailand"),
    ("Vietnam", "Viet Nam"),
    ("Myanmar", "Myanmar"),

    // Oceania (2)
    ("Australia", "Australia"),
    ("New Zealand", "New Zealand"),
];

static CATALOG: Lazy<CountryCatalog> = Lazy::new(|| CountryCatalog::from_entries(COUNTRIES));

/// Immutable lookup from short key to long name
#[derive(Debug)]
pub struct CountryCatalog {
    entries: &'static [(&'static str, &'static str)],
    index: HashMap<&'static str, &'static str>,
}

impl CountryCatalog {
    /// The process-wide catalog
    pub fn global() -> &'static CountryCatalog {
        &CATALOG
    }

    fn from_entries(entries: &'static [(&'static str, &'static str)]) -> Self {
        let index = entries.iter().copied().collect();
        Self { entries, index }
    }

    /// Long canonical name for a short key
    pub fn long_name(&self, key: &str) -> Option<&'static str> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Short keys in catalog order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(short, _)| *short)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every key against the catalog.
    ///
    /// Unknown keys are reported together in a single error, in the order given.
    pub fn validate<S: AsRef<str>>(&self, keys: &[S]) -> Result<()> {
        let unknown: Vec<String> = keys
            .iter()
            .map(AsRef::as_ref)
            .filter(|key| !self.contains(key))
            .map(str::to_string)
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(PulseError::UnknownCountries(unknown))
        }
    }
}
